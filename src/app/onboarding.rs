use crate::accounts::{self, AccountError, NewGym, ProfileUpdate};
use crate::state;
use crate::templates;
use crate::types::dates::{format_iso_date, parse_iso_date};

use axum::Extension;
use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::{CurrentUser, SportChecks, non_empty, sport_options};

pub(crate) async fn onboarding_form(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Response {
    if user.0.gym_id.is_some() {
        return Redirect::to("/dashboard").into_response();
    }
    templates::OnboardingTemplate {
        app_name: state.config.app_name.clone(),
        error: String::new(),
        first_name: user.0.first_name.clone(),
        is_manager: user.is_manager(),
        phone: user.0.phone.clone().unwrap_or_default(),
        birth_date: user.0.birth_date.map(format_iso_date).unwrap_or_default(),
        gym_name: String::new(),
        gym_address: String::new(),
        sports: sport_options(&[]),
        invite_code: String::new(),
    }
    .into_response()
}

#[derive(Debug, Deserialize)]
pub(crate) struct OnboardingForm {
    phone: Option<String>,
    birth_date: Option<String>,
    gym_name: Option<String>,
    gym_address: Option<String>,
    invite_code: Option<String>,
    #[serde(flatten)]
    sports: SportChecks,
}

/// Saves the profile, then creates the manager's gym or joins the athlete to
/// the gym behind the invite code.
pub(crate) async fn onboarding_submit(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<OnboardingForm>,
) -> Result<Redirect, (StatusCode, templates::OnboardingTemplate)> {
    if user.0.gym_id.is_some() {
        return Ok(Redirect::to("/dashboard"));
    }
    let sports = form.sports.selected();
    let onboarding_error = |status: StatusCode, error: &str| {
        (
            status,
            templates::OnboardingTemplate {
                app_name: state.config.app_name.clone(),
                error: error.to_string(),
                first_name: user.0.first_name.clone(),
                is_manager: user.is_manager(),
                phone: form.phone.clone().unwrap_or_default(),
                birth_date: form.birth_date.clone().unwrap_or_default(),
                gym_name: form.gym_name.clone().unwrap_or_default(),
                gym_address: form.gym_address.clone().unwrap_or_default(),
                sports: sport_options(&sports),
                invite_code: form.invite_code.clone().unwrap_or_default(),
            },
        )
    };

    let birth_date = match non_empty(form.birth_date.clone()) {
        Some(raw) => Some(parse_iso_date(&raw).ok_or_else(|| {
            onboarding_error(StatusCode::BAD_REQUEST, "Enter a valid birth date.")
        })?),
        None => None,
    };

    let result = accounts::update_profile(
        &state.store,
        &user.0.id,
        ProfileUpdate {
            first_name: user.0.first_name.clone(),
            last_name: user.0.last_name.clone(),
            phone: form.phone.clone(),
            birth_date,
        },
    )
    .and_then(|_| {
        if user.is_manager() {
            accounts::create_gym(
                &state.store,
                &user.0.id,
                NewGym {
                    name: form.gym_name.clone().unwrap_or_default(),
                    address: form.gym_address.clone().unwrap_or_default(),
                    sports: sports.clone(),
                },
                state.clock.now(),
            )
        } else {
            accounts::join_gym(
                &state.store,
                &user.0.id,
                form.invite_code.as_deref().unwrap_or_default(),
                state.today(),
            )
        }
    });

    match result {
        Ok(_) => Ok(Redirect::to("/dashboard")),
        Err(AccountError::Validation(message)) => {
            Err(onboarding_error(StatusCode::BAD_REQUEST, message))
        }
        Err(AccountError::InvalidInviteCode) => Err(onboarding_error(
            StatusCode::BAD_REQUEST,
            "No gym matches this invite code.",
        )),
        Err(err) => {
            tracing::error!(error = %err, user_id = %user.0.id, "failed to complete onboarding");
            Err(onboarding_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to complete onboarding.",
            ))
        }
    }
}
