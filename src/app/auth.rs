use crate::accounts::{self, AccountError, Registration};
use crate::state;
use crate::templates;
use crate::types::{User, UserRole};

use axum::Json;
use axum::body::Body;
use axum::extract::Form;
use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::http::HeaderValue;
use axum::http::Request;
use axum::http::StatusCode;
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use serde::Serialize;

/// The signed-in user, attached to every request that passed
/// [`auth_middleware`].
#[derive(Debug, Clone)]
pub(crate) struct CurrentUser(pub(crate) User);

impl CurrentUser {
    pub(crate) fn is_manager(&self) -> bool {
        self.0.role == UserRole::Manager
    }

    /// Only call behind the middleware, which sends gym-less users to
    /// onboarding.
    pub(crate) fn gym_id(&self) -> &str {
        self.0.gym_id.as_deref().unwrap_or_default()
    }
}

#[derive(Serialize)]
struct AuthErrorResponse {
    error: &'static str,
}

fn api_error(status: StatusCode, error: &'static str) -> Response {
    (status, Json(AuthErrorResponse { error })).into_response()
}

pub(crate) async fn auth_middleware(
    State(state): State<state::AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();
    if is_auth_bypass_path(&path) {
        return next.run(req).await;
    }
    let is_api = path.starts_with("/api/");

    let user_id = auth_cookie(req.headers(), state.auth.cookie_name())
        .and_then(|token| state.auth.verify_token(token).ok());
    let user = match user_id {
        Some(user_id) => match accounts::find_user(&state.store, &user_id) {
            Ok(user) => user,
            Err(err) => {
                tracing::error!(error = %err, "failed to load session user");
                return (StatusCode::INTERNAL_SERVER_ERROR, "internal error").into_response();
            }
        },
        None => None,
    };

    let Some(user) = user else {
        if is_api {
            return api_error(StatusCode::UNAUTHORIZED, "unauthorized");
        }
        return Redirect::to("/login").into_response();
    };

    if user.gym_id.is_none() && path != "/onboarding" {
        if is_api {
            return api_error(StatusCode::FORBIDDEN, "onboarding required");
        }
        return Redirect::to("/onboarding").into_response();
    }

    req.extensions_mut().insert(CurrentUser(user));
    next.run(req).await
}

/// Layered on manager-only routes, inside [`auth_middleware`].
pub(crate) async fn require_manager(req: Request<Body>, next: Next) -> Response {
    let is_manager = req
        .extensions()
        .get::<CurrentUser>()
        .is_some_and(CurrentUser::is_manager);
    if is_manager {
        return next.run(req).await;
    }
    if req.uri().path().starts_with("/api/") {
        return api_error(StatusCode::FORBIDDEN, "forbidden");
    }
    Redirect::to("/dashboard").into_response()
}

fn is_auth_bypass_path(path: &str) -> bool {
    path == "/login"
        || path == "/register"
        || path == "/logout"
        || path == "/health"
        || path.starts_with("/static/")
}

fn auth_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    for header in headers.get_all(COOKIE).iter() {
        if let Ok(raw) = header.to_str()
            && let Some(value) = cookie_from_header(raw, name)
        {
            return Some(value);
        }
    }
    None
}

fn cookie_from_header<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    for part in header.split(';') {
        let trimmed = part.trim();
        if let Some((cookie_name, cookie_value)) = trimmed.split_once('=')
            && cookie_name == name
        {
            return Some(cookie_value);
        }
    }
    None
}

fn with_session_cookie(mut response: Response, cookie: &str) -> Response {
    response.headers_mut().append(
        SET_COOKIE,
        HeaderValue::from_str(cookie).expect("auth cookie header"),
    );
    response
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginQuery {
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LoginForm {
    email: String,
    password: String,
    next: Option<String>,
}

pub(crate) async fn login_form(
    State(state): State<state::AppState>,
    Query(query): Query<LoginQuery>,
) -> templates::LoginTemplate {
    templates::LoginTemplate {
        app_name: state.config.app_name,
        error: String::new(),
        email: String::new(),
        next: sanitize_next(query.next.as_deref()).unwrap_or_default(),
    }
}

pub(crate) async fn login_submit(
    State(state): State<state::AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Response, (StatusCode, templates::LoginTemplate)> {
    let next = sanitize_next(form.next.as_deref()).unwrap_or_default();
    let login_error = |status: StatusCode, error: &str| {
        (
            status,
            templates::LoginTemplate {
                app_name: state.config.app_name.clone(),
                error: error.to_string(),
                email: form.email.trim().to_string(),
                next: next.clone(),
            },
        )
    };

    if form.email.trim().is_empty() || form.password.is_empty() {
        return Err(login_error(
            StatusCode::BAD_REQUEST,
            "Email and password are required.",
        ));
    }

    let user = match accounts::authenticate(&state.store, &form.email, &form.password) {
        Ok(user) => user,
        Err(AccountError::InvalidCredentials) => {
            return Err(login_error(StatusCode::UNAUTHORIZED, "Invalid credentials."));
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to authenticate");
            return Err(login_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to sign in.",
            ));
        }
    };

    let token = state.auth.issue_token(&user.id).map_err(|err| {
        tracing::error!(error = %err, "failed to issue auth token");
        login_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to sign in.")
    })?;

    tracing::info!(user_id = %user.id, "signed in");
    let target = if user.gym_id.is_none() {
        "/onboarding".to_string()
    } else if next.is_empty() {
        "/dashboard".to_string()
    } else {
        next.clone()
    };
    Ok(with_session_cookie(
        Redirect::to(&target).into_response(),
        &state.auth.auth_cookie(&token),
    ))
}

pub(crate) async fn register_form(
    State(state): State<state::AppState>,
) -> templates::RegisterTemplate {
    templates::RegisterTemplate {
        app_name: state.config.app_name,
        error: String::new(),
        first_name: String::new(),
        last_name: String::new(),
        email: String::new(),
        is_manager: false,
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterForm {
    first_name: String,
    last_name: String,
    email: String,
    password: String,
    confirm_password: String,
    role: Option<String>,
}

pub(crate) async fn register_submit(
    State(state): State<state::AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, (StatusCode, templates::RegisterTemplate)> {
    let role = form
        .role
        .as_deref()
        .and_then(UserRole::parse)
        .unwrap_or(UserRole::Athlete);
    let register_error = |status: StatusCode, error: &str| {
        (
            status,
            templates::RegisterTemplate {
                app_name: state.config.app_name.clone(),
                error: error.to_string(),
                first_name: form.first_name.clone(),
                last_name: form.last_name.clone(),
                email: form.email.clone(),
                is_manager: role == UserRole::Manager,
            },
        )
    };

    let result = accounts::validate_new_password(&form.password, &form.confirm_password).and_then(
        |()| {
            accounts::register(
                &state.store,
                Registration {
                    first_name: form.first_name.clone(),
                    last_name: form.last_name.clone(),
                    email: form.email.clone(),
                    password: form.password.clone(),
                    role,
                },
                state.clock.now(),
            )
        },
    );
    let user = match result {
        Ok(user) => user,
        Err(AccountError::Validation(message)) => {
            return Err(register_error(StatusCode::BAD_REQUEST, message));
        }
        Err(AccountError::EmailTaken) => {
            return Err(register_error(
                StatusCode::CONFLICT,
                "An account with this email already exists.",
            ));
        }
        Err(err) => {
            tracing::error!(error = %err, "failed to register user");
            return Err(register_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create the account.",
            ));
        }
    };

    let token = state.auth.issue_token(&user.id).map_err(|err| {
        tracing::error!(error = %err, "failed to issue auth token");
        register_error(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create the account.",
        )
    })?;

    Ok(with_session_cookie(
        Redirect::to("/onboarding").into_response(),
        &state.auth.auth_cookie(&token),
    ))
}

pub(crate) async fn logout(State(state): State<state::AppState>) -> Response {
    with_session_cookie(
        Redirect::to("/login").into_response(),
        &state.auth.clear_cookie(),
    )
}

fn sanitize_next(next: Option<&str>) -> Option<String> {
    let next = next?.trim();
    if next.is_empty() {
        return None;
    }
    if !next.starts_with('/') || next.starts_with("//") || next.contains("://") {
        return None;
    }
    Some(next.to_string())
}
