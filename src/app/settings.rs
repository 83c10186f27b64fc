use crate::accounts::{self, AccountError, ProfileUpdate};
use crate::state;
use crate::templates;
use crate::types::UserRole;
use crate::types::dates::{format_iso_date, parse_iso_date};

use axum::Extension;
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::{CurrentUser, HandlerError, internal, layout, non_empty};

#[derive(Debug, Deserialize)]
pub(crate) struct SettingsQuery {
    saved: Option<String>,
}

fn role_label(role: UserRole) -> &'static str {
    match role {
        UserRole::Manager => "Manager",
        UserRole::Athlete => "Athlete",
    }
}

fn settings_page(
    state: &state::AppState,
    user: &CurrentUser,
    notice: &str,
    error: &str,
) -> Result<templates::SettingsTemplate, HandlerError> {
    let gym = accounts::find_gym(&state.store, user.gym_id()).map_err(internal)?;
    let profile = &user.0;

    Ok(templates::SettingsTemplate {
        layout: layout(state, user, "settings"),
        first_name: profile.first_name.clone(),
        last_name: profile.last_name.clone(),
        email: profile.email.clone(),
        phone: profile.phone.clone().unwrap_or_default(),
        birth_date: profile.birth_date.map(format_iso_date).unwrap_or_default(),
        role_label: role_label(profile.role),
        gym_name: gym.as_ref().map(|gym| gym.name.clone()).unwrap_or_default(),
        invite_code: gym.map(|gym| gym.invite_code).unwrap_or_default(),
        notice: notice.to_string(),
        error: error.to_string(),
    })
}

fn rerender_settings(state: &state::AppState, user: &CurrentUser, error: &str) -> Response {
    match settings_page(state, user, "", error) {
        Ok(page) => (StatusCode::BAD_REQUEST, page).into_response(),
        Err(err) => err.into_response(),
    }
}

pub(crate) async fn settings_view(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<SettingsQuery>,
) -> Result<templates::SettingsTemplate, HandlerError> {
    let notice = match query.saved.as_deref() {
        Some("profile") => "Profile updated.",
        Some("password") => "Password changed.",
        _ => "",
    };
    settings_page(&state, &user, notice, "")
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProfileForm {
    first_name: String,
    last_name: String,
    phone: Option<String>,
    birth_date: Option<String>,
}

pub(crate) async fn settings_profile(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<ProfileForm>,
) -> Result<Redirect, Response> {
    let birth_date = match non_empty(form.birth_date) {
        Some(raw) => Some(
            parse_iso_date(&raw)
                .ok_or_else(|| rerender_settings(&state, &user, "Enter a valid birth date."))?,
        ),
        None => None,
    };
    let update = ProfileUpdate {
        first_name: form.first_name,
        last_name: form.last_name,
        phone: form.phone,
        birth_date,
    };

    match accounts::update_profile(&state.store, &user.0.id, update) {
        Ok(_) => Ok(Redirect::to("/settings?saved=profile")),
        Err(AccountError::Validation(message)) => Err(rerender_settings(&state, &user, message)),
        Err(err) => Err(internal(err).into_response()),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PasswordForm {
    current_password: String,
    new_password: String,
    confirm_password: String,
}

pub(crate) async fn settings_password(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<PasswordForm>,
) -> Result<Redirect, Response> {
    match accounts::change_password(
        &state.store,
        &user.0.id,
        &form.current_password,
        &form.new_password,
        &form.confirm_password,
    ) {
        Ok(()) => {
            tracing::info!(user_id = %user.0.id, "changed password");
            Ok(Redirect::to("/settings?saved=password"))
        }
        Err(AccountError::InvalidCredentials) => Err(rerender_settings(
            &state,
            &user,
            "Current password is incorrect.",
        )),
        Err(AccountError::Validation(message)) => Err(rerender_settings(&state, &user, message)),
        Err(err) => Err(internal(err).into_response()),
    }
}
