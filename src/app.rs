use crate::assets;
use crate::schedule::CalendarSlot;
use crate::state;
use crate::status;
use crate::templates;
use crate::types::dates::format_display_date;
use crate::types::{Member, Sport, Subscription};

use axum::Router;
use axum::http::StatusCode;
use axum::middleware;
use axum::routing::get;
use axum::routing::post;
use time::Date;
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;

mod api;
mod auth;
mod courses;
mod dashboard;
mod instructors;
mod members;
mod notifications;
mod onboarding;
mod schedule;
mod settings;
mod subscriptions;

pub(crate) use auth::CurrentUser;

pub fn router(state: state::AppState) -> Router {
    let manager_routes = Router::new()
        .route("/members", get(members::member_list).post(members::member_create))
        .route(
            "/members/{id}",
            get(members::member_detail).post(members::member_update),
        )
        .route("/members/{id}/plan", post(members::member_assign_plan))
        .route("/members/{id}/delete", post(members::member_delete))
        .route(
            "/subscriptions",
            get(subscriptions::plan_list).post(subscriptions::plan_create),
        )
        .route("/subscriptions/{id}", post(subscriptions::plan_update))
        .route("/subscriptions/{id}/delete", post(subscriptions::plan_delete))
        .route("/courses", get(courses::course_list).post(courses::course_create))
        .route("/courses/{id}", post(courses::course_update))
        .route("/courses/{id}/delete", post(courses::course_delete))
        .route(
            "/instructors",
            get(instructors::instructor_list).post(instructors::instructor_create),
        )
        .route("/instructors/{id}", post(instructors::instructor_update))
        .route("/instructors/{id}/delete", post(instructors::instructor_delete))
        .route("/schedule/lessons", post(schedule::lesson_create))
        .route("/schedule/lessons/edit", post(schedule::lesson_update))
        .route("/schedule/lessons/delete", post(schedule::lesson_delete))
        .route("/api/members", get(api::members))
        .route("/api/schedule", get(api::schedule))
        .route_layer(middleware::from_fn(auth::require_manager));

    Router::new()
        .route("/", get(dashboard::index))
        .route("/login", get(auth::login_form).post(auth::login_submit))
        .route(
            "/register",
            get(auth::register_form).post(auth::register_submit),
        )
        .route("/logout", post(auth::logout))
        .route(
            "/onboarding",
            get(onboarding::onboarding_form).post(onboarding::onboarding_submit),
        )
        .route("/dashboard", get(dashboard::dashboard))
        .route("/schedule", get(schedule::schedule_view))
        .route("/notifications", get(notifications::notification_list))
        .route(
            "/notifications/read-all",
            post(notifications::notification_read_all),
        )
        .route(
            "/notifications/{id}/read",
            post(notifications::notification_read),
        )
        .route(
            "/notifications/{id}/delete",
            post(notifications::notification_delete),
        )
        .route("/settings", get(settings::settings_view))
        .route("/settings/profile", post(settings::settings_profile))
        .route("/settings/password", post(settings::settings_password))
        .merge(manager_routes)
        .route("/static/style.css", get(assets::stylesheet))
        .route("/health", get(health))
        .with_state(state.clone())
        .layer(middleware::from_fn_with_state(state, auth::auth_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
}

pub(crate) async fn health() -> &'static str {
    "ok"
}

type HandlerError = (StatusCode, &'static str);

fn internal(err: impl std::fmt::Display) -> HandlerError {
    tracing::error!(error = %err, "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, "internal error")
}

fn not_found() -> HandlerError {
    (StatusCode::NOT_FOUND, "not found")
}

fn layout(state: &state::AppState, user: &CurrentUser, active: &'static str) -> templates::Layout {
    templates::Layout {
        app_name: state.config.app_name.clone(),
        user_name: user.0.full_name(),
        user_initials: templates::initials(&user.0.first_name, &user.0.last_name),
        is_manager: user.is_manager(),
        active,
        unread_notifications: state.unread_notifications(),
    }
}

fn member_row(member: &Member, plans: &[Subscription], today: Date) -> templates::MemberRow {
    let member_status = status::member_status(member, plans, today);
    let plan_name = status::plan_for(member, plans)
        .map(|plan| plan.name.clone())
        .unwrap_or_else(|| "No plan".to_string());
    let expiry = status::member_expiry(member, plans)
        .map(format_display_date)
        .unwrap_or_else(|| "—".to_string());
    let days_left = match status::days_until_expiry(member, plans, today) {
        Some(0) => "today".to_string(),
        Some(1) => "in 1 day".to_string(),
        Some(days) if days > 1 => format!("in {days} days"),
        Some(-1) => "1 day ago".to_string(),
        Some(days) => format!("{} days ago", -days),
        None => String::new(),
    };

    templates::MemberRow {
        id: member.id.clone(),
        name: member.full_name(),
        initials: member.initials(),
        email: member.email.clone(),
        phone: member.phone.clone().unwrap_or_default(),
        plan_name,
        status: member_status.as_str(),
        status_label: member_status.label(),
        joined_at: format_display_date(member.joined_at),
        expiry,
        days_left,
    }
}

fn slot_view(slot: &CalendarSlot) -> templates::SlotView {
    let duration = slot
        .duration_minutes()
        .map(|minutes| format!("{minutes} min"))
        .unwrap_or_default();
    templates::SlotView {
        course_id: slot.course_id.clone(),
        name: slot.name.clone(),
        instructor: slot.instructor.clone(),
        sport_label: slot.sport.label(),
        day: slot.day.as_str(),
        start_time: slot.start_time.clone(),
        end_time: slot.end_time.clone(),
        color: slot.color,
        enrolled: slot.enrolled,
        capacity: slot.capacity,
        fill_percent: slot.fill_percent(),
        duration,
    }
}

fn sport_options(selected: &[Sport]) -> Vec<templates::SelectOption> {
    Sport::ALL
        .into_iter()
        .map(|sport| templates::SelectOption {
            value: sport.as_str().to_string(),
            label: sport.label().to_string(),
            selected: selected.contains(&sport),
        })
        .collect()
}

fn plan_options(plans: &[Subscription], selected: Option<&str>) -> Vec<templates::SelectOption> {
    plans
        .iter()
        .map(|plan| templates::SelectOption {
            value: plan.id.clone(),
            label: format!("{} ({})", plan.name, templates::format_euros(plan.price)),
            selected: selected == Some(plan.id.as_str()),
        })
        .collect()
}

/// Checkbox group posted as one `sport_<name>` field per ticked discipline.
#[derive(Debug, Default, serde::Deserialize)]
pub(crate) struct SportChecks {
    sport_boxing: Option<String>,
    sport_kickboxing: Option<String>,
    sport_mma: Option<String>,
    sport_muaythai: Option<String>,
    sport_bjj: Option<String>,
}

impl SportChecks {
    fn selected(&self) -> Vec<Sport> {
        [
            (Sport::Boxing, &self.sport_boxing),
            (Sport::Kickboxing, &self.sport_kickboxing),
            (Sport::Mma, &self.sport_mma),
            (Sport::Muaythai, &self.sport_muaythai),
            (Sport::Bjj, &self.sport_bjj),
        ]
        .into_iter()
        .filter(|(_, checked)| checked.is_some())
        .map(|(sport, _)| sport)
        .collect()
    }
}

/// Blank optional inputs come through as empty strings.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[cfg(test)]
#[allow(non_snake_case)]
pub(crate) mod tests {
    use super::*;
    use crate::accounts::{self, Registration};
    use crate::adapters::FixedClock;
    use crate::config;
    use crate::members as member_service;
    use crate::store::tests::create_temp_dir;
    use crate::types::UserRole;
    use crate::types::dates::parse_iso_date;

    use axum::body::Body;
    use axum::body::to_bytes;
    use axum::http::Request;
    use axum::http::header::{COOKIE, LOCATION, SET_COOKIE};
    use serde_json::Value as JsonValue;
    use serde_json::from_slice as json_from_slice;
    use tower::ServiceExt;

    use std::path::PathBuf;
    use std::sync::Arc;

    pub(crate) const TODAY: &str = "2025-02-10";

    pub(crate) fn test_state(data_dir: PathBuf, seed_demo_data: bool) -> state::AppState {
        let config = config::AppConfig {
            data_dir,
            seed_demo_data,
            ..Default::default()
        };
        let clock = FixedClock::on(parse_iso_date(TODAY).expect("date"));
        state::AppState::new(config, Arc::new(clock)).expect("app state")
    }

    pub(crate) fn session_cookie(state: &state::AppState, user_id: &str) -> String {
        let token = state.auth.issue_token(user_id).expect("issue token");
        format!("{}={token}", state.auth.cookie_name())
    }

    async fn body_text(response: axum::response::Response) -> String {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        String::from_utf8(body.to_vec()).expect("utf8 body")
    }

    fn get_request(uri: &str, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::empty()).unwrap()
    }

    fn form_request(uri: &str, cookie: Option<&str>, form: &str) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::from(form.to_string())).unwrap()
    }

    #[tokio::test]
    async fn router__should_return_ok_on_health_endpoint() {
        // Given
        let dir = create_temp_dir("app-health");
        let state = test_state(dir.clone(), false);

        // When
        let response = router(state)
            .oneshot(get_request("/health", None))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_text(response).await, "ok");

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn router__should_serve_stylesheet_without_session() {
        // Given
        let dir = create_temp_dir("app-stylesheet");
        let state = test_state(dir.clone(), false);

        // When
        let response = router(state)
            .oneshot(get_request("/static/style.css", None))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").expect("content type"),
            "text/css"
        );

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn auth_middleware__should_redirect_html_when_missing_cookie() {
        // Given
        let dir = create_temp_dir("app-auth-redirect");
        let state = test_state(dir.clone(), false);

        // When
        let response = router(state)
            .oneshot(get_request("/dashboard", None))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).expect("location header"),
            "/login"
        );

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn auth_middleware__should_return_json_unauthorized_for_api() {
        // Given
        let dir = create_temp_dir("app-auth-api");
        let state = test_state(dir.clone(), false);

        // When
        let response = router(state)
            .oneshot(get_request("/api/members", None))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload: JsonValue = json_from_slice(&body).expect("parse json");
        assert_eq!(payload["error"], "unauthorized");

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn auth_middleware__should_reject_token_for_unknown_user() {
        // Given
        let dir = create_temp_dir("app-auth-unknown");
        let state = test_state(dir.clone(), false);
        let cookie = session_cookie(&state, "user-404");

        // When
        let response = router(state)
            .oneshot(get_request("/dashboard", Some(&cookie)))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).expect("location header"),
            "/login"
        );

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn login__should_set_cookie_and_redirect() {
        // Given
        let dir = create_temp_dir("app-login");
        let state = test_state(dir.clone(), true);
        let form = "email=Manager%40poundforpound.app&password=manager123&next=%2Fmembers";

        // When
        let response = router(state)
            .oneshot(form_request("/login", None, form))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).expect("location header"),
            "/members"
        );
        let cookie = response.headers().get(SET_COOKIE).expect("set-cookie");
        let cookie = cookie.to_str().expect("cookie header");
        assert!(cookie.contains("p4p_session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn login__should_reject_invalid_credentials() {
        // Given
        let dir = create_temp_dir("app-login-invalid");
        let state = test_state(dir.clone(), true);
        let form = "email=manager%40poundforpound.app&password=wrong-password";

        // When
        let response = router(state)
            .oneshot(form_request("/login", None, form))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_text(response).await;
        assert!(body.contains("Invalid credentials."));
        assert!(body.contains(r#"value="manager@poundforpound.app""#));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn logout__should_clear_cookie() {
        // Given
        let dir = create_temp_dir("app-logout");
        let state = test_state(dir.clone(), false);

        // When
        let response = router(state)
            .oneshot(form_request("/logout", None, ""))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).expect("location header"),
            "/login"
        );
        let cookie = response.headers().get(SET_COOKIE).expect("set-cookie");
        let cookie = cookie.to_str().expect("cookie header");
        assert!(cookie.contains("Max-Age=0"));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn register__should_sign_in_and_continue_to_onboarding() {
        // Given
        let dir = create_temp_dir("app-register");
        let state = test_state(dir.clone(), false);
        let form = "role=manager&first_name=Sara&last_name=Conti&email=sara%40example.com\
                    &password=southpaw-stance&confirm_password=southpaw-stance";

        // When
        let response = router(state.clone())
            .oneshot(form_request("/register", None, form))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).expect("location header"),
            "/onboarding"
        );
        assert!(response.headers().get(SET_COOKIE).is_some());
        let user = accounts::authenticate(&state.store, "sara@example.com", "southpaw-stance")
            .expect("registered user");
        assert_eq!(user.role, UserRole::Manager);

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn register__should_reject_mismatched_passwords() {
        // Given
        let dir = create_temp_dir("app-register-mismatch");
        let state = test_state(dir.clone(), false);
        let form = "role=athlete&first_name=Sara&last_name=Conti&email=sara%40example.com\
                    &password=southpaw-stance&confirm_password=orthodox-stance";

        // When
        let response = router(state)
            .oneshot(form_request("/register", None, form))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_text(response).await.contains("Passwords do not match."));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn auth_middleware__should_send_gymless_users_to_onboarding() {
        // Given
        let dir = create_temp_dir("app-onboarding-redirect");
        let state = test_state(dir.clone(), false);
        let user = accounts::register(
            &state.store,
            Registration {
                first_name: "Sara".to_string(),
                last_name: "Conti".to_string(),
                email: "sara@example.com".to_string(),
                password: "southpaw-stance".to_string(),
                role: UserRole::Athlete,
            },
            state.clock.now(),
        )
        .expect("register");
        let cookie = session_cookie(&state, &user.id);

        // When
        let response = router(state)
            .oneshot(get_request("/dashboard", Some(&cookie)))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).expect("location header"),
            "/onboarding"
        );

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn require_manager__should_redirect_athletes_to_dashboard() {
        // Given
        let dir = create_temp_dir("app-athlete-members");
        let state = test_state(dir.clone(), true);
        let cookie = session_cookie(&state, "user-002");

        // When
        let response = router(state)
            .oneshot(get_request("/members", Some(&cookie)))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(LOCATION).expect("location header"),
            "/dashboard"
        );

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn require_manager__should_return_json_forbidden_for_api() {
        // Given
        let dir = create_temp_dir("app-athlete-api");
        let state = test_state(dir.clone(), true);
        let cookie = session_cookie(&state, "user-002");

        // When
        let response = router(state)
            .oneshot(get_request("/api/members", Some(&cookie)))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload: JsonValue = json_from_slice(&body).expect("parse json");
        assert_eq!(payload["error"], "forbidden");

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn dashboard__should_show_manager_overview() {
        // Given
        let dir = create_temp_dir("app-dashboard-manager");
        let state = test_state(dir.clone(), true);
        let cookie = session_cookie(&state, "user-001");

        // When
        let response = router(state)
            .oneshot(get_request("/dashboard", Some(&cookie)))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Hello, Mario"));
        assert!(body.contains("Fight Club Milano"));
        assert!(body.contains("FCM2024"));
        assert!(body.contains(r#"href="/members""#));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn dashboard__should_show_athlete_membership() {
        // Given
        let dir = create_temp_dir("app-dashboard-athlete");
        let state = test_state(dir.clone(), true);
        let cookie = session_cookie(&state, "user-002");

        // When
        let response = router(state)
            .oneshot(get_request("/dashboard", Some(&cookie)))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("My membership"));
        assert!(body.contains("Yearly"));
        assert!(!body.contains(r#"href="/members""#));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn member_create__should_add_member_and_notify() {
        // Given
        let dir = create_temp_dir("app-member-create");
        let state = test_state(dir.clone(), true);
        let cookie = session_cookie(&state, "user-001");
        let unread_before = state.unread_notifications();
        let form = "first_name=Sofia&last_name=Greco&email=sofia.greco%40example.com\
                    &phone=&subscription_id=sub-001";

        // When
        let response = router(state.clone())
            .oneshot(form_request("/members", Some(&cookie), form))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let roster = member_service::list(&state.store, "gym-001").expect("list");
        assert_eq!(roster[0].email, "sofia.greco@example.com");
        assert_eq!(roster[0].subscription_id.as_deref(), Some("sub-001"));
        assert_eq!(roster[0].phone, None);
        assert_eq!(state.unread_notifications(), unread_before + 1);

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn member_create__should_rerender_form_on_invalid_input() {
        // Given
        let dir = create_temp_dir("app-member-invalid");
        let state = test_state(dir.clone(), true);
        let cookie = session_cookie(&state, "user-001");
        let form = "first_name=Sofia&last_name=&email=sofia.greco%40example.com";

        // When
        let response = router(state)
            .oneshot(form_request("/members", Some(&cookie), form))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_text(response).await;
        assert!(body.contains("First and last name are required."));
        assert!(body.contains(r#"value="sofia.greco@example.com""#));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn member_list__should_filter_by_query() {
        // Given
        let dir = create_temp_dir("app-member-search");
        let state = test_state(dir.clone(), true);
        let cookie = session_cookie(&state, "user-001");

        // When
        let response = router(state)
            .oneshot(get_request("/members?q=bianchi&status=all", Some(&cookie)))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("Luca Bianchi"));
        assert!(body.contains(r#"value="bianchi""#));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn api_members__should_include_derived_status() {
        // Given
        let dir = create_temp_dir("app-api-members");
        let state = test_state(dir.clone(), true);
        let cookie = session_cookie(&state, "user-001");

        // When
        let response = router(state)
            .oneshot(get_request("/api/members?q=athlete%40", Some(&cookie)))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload: JsonValue = json_from_slice(&body).expect("parse json");
        let members = payload.as_array().expect("array");
        assert_eq!(members.len(), 1);
        assert_eq!(members[0]["id"], "m-athlete");
        assert_eq!(members[0]["status"], "active");
        assert_eq!(members[0]["planName"], "Yearly");
        assert!(members[0]["expiryDate"].is_string());

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn api_schedule__should_return_week_starting_monday() {
        // Given
        let dir = create_temp_dir("app-api-schedule");
        let state = test_state(dir.clone(), true);
        let cookie = session_cookie(&state, "user-001");

        // When
        let response = router(state)
            .oneshot(get_request("/api/schedule?date=2025-02-13", Some(&cookie)))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let payload: JsonValue = json_from_slice(&body).expect("parse json");
        assert_eq!(payload["weekStart"], "2025-02-10");
        assert_eq!(payload["days"].as_array().expect("days").len(), 7);
        assert_eq!(payload["selected"], "2025-02-13");
        assert!(payload["slots"].is_array());

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[tokio::test]
    async fn schedule_view__should_render_for_athletes_without_edit_forms() {
        // Given
        let dir = create_temp_dir("app-schedule-athlete");
        let state = test_state(dir.clone(), true);
        let cookie = session_cookie(&state, "user-002");

        // When
        let response = router(state)
            .oneshot(get_request("/schedule?date=2025-02-10", Some(&cookie)))
            .await
            .expect("request failed");

        // Then
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains("February 2025"));
        assert!(!body.contains("/schedule/lessons"));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }
}
