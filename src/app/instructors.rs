use crate::instructors::{self as instructor_service, InstructorDraft, InstructorError};
use crate::state;
use crate::templates;
use crate::types::Instructor;

use axum::Extension;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::{CurrentUser, HandlerError, SportChecks, internal, layout, not_found, sport_options};

#[derive(Debug, Deserialize)]
pub(crate) struct InstructorForm {
    first_name: String,
    last_name: String,
    bio: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    instagram: Option<String>,
    #[serde(flatten)]
    specialties: SportChecks,
}

impl InstructorForm {
    fn draft(self) -> InstructorDraft {
        InstructorDraft {
            specialties: self.specialties.selected(),
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
            email: self.email,
            phone: self.phone,
            instagram: self.instagram,
        }
    }
}

fn instructor_row(instructor: &Instructor) -> templates::InstructorRow {
    templates::InstructorRow {
        id: instructor.id.clone(),
        first_name: instructor.first_name.clone(),
        last_name: instructor.last_name.clone(),
        name: instructor.full_name(),
        initials: templates::initials(&instructor.first_name, &instructor.last_name),
        bio: instructor.bio.clone().unwrap_or_default(),
        email: instructor.email.clone().unwrap_or_default(),
        phone: instructor.phone.clone().unwrap_or_default(),
        instagram: instructor.instagram.clone().unwrap_or_default(),
        specialty_labels: instructor
            .specialties
            .iter()
            .map(|sport| sport.label())
            .collect::<Vec<_>>()
            .join(" · "),
        specialties: sport_options(&instructor.specialties),
    }
}

fn instructor_list_page(
    state: &state::AppState,
    user: &CurrentUser,
    error: &str,
) -> Result<templates::InstructorsTemplate, HandlerError> {
    let instructors =
        instructor_service::list(&state.store, user.gym_id()).map_err(internal)?;
    Ok(templates::InstructorsTemplate {
        layout: layout(state, user, "instructors"),
        instructors: instructors.iter().map(instructor_row).collect(),
        sports: sport_options(&[]),
        error: error.to_string(),
    })
}

fn rerender_instructors(state: &state::AppState, user: &CurrentUser, error: &str) -> Response {
    match instructor_list_page(state, user, error) {
        Ok(page) => (StatusCode::BAD_REQUEST, page).into_response(),
        Err(err) => err.into_response(),
    }
}

fn gym_instructor(
    state: &state::AppState,
    user: &CurrentUser,
    id: &str,
) -> Result<Instructor, HandlerError> {
    instructor_service::get(&state.store, id)
        .map_err(internal)?
        .filter(|instructor| instructor.gym_id == user.gym_id())
        .ok_or_else(not_found)
}

pub(crate) async fn instructor_list(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<templates::InstructorsTemplate, HandlerError> {
    instructor_list_page(&state, &user, "")
}

pub(crate) async fn instructor_create(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<InstructorForm>,
) -> Result<Redirect, Response> {
    match instructor_service::add(&state.store, user.gym_id(), form.draft()) {
        Ok(_) => Ok(Redirect::to("/instructors")),
        Err(InstructorError::Validation(message)) => {
            Err(rerender_instructors(&state, &user, message))
        }
        Err(InstructorError::Store(err)) => Err(internal(err).into_response()),
    }
}

pub(crate) async fn instructor_update(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Form(form): Form<InstructorForm>,
) -> Result<Redirect, Response> {
    let instructor = gym_instructor(&state, &user, &id).map_err(IntoResponse::into_response)?;
    match instructor_service::update(&state.store, &instructor.id, form.draft()) {
        Ok(Some(_)) => Ok(Redirect::to("/instructors")),
        Ok(None) => Err(not_found().into_response()),
        Err(InstructorError::Validation(message)) => {
            Err(rerender_instructors(&state, &user, message))
        }
        Err(InstructorError::Store(err)) => Err(internal(err).into_response()),
    }
}

pub(crate) async fn instructor_delete(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Redirect, HandlerError> {
    let instructor = gym_instructor(&state, &user, &id)?;
    if !instructor_service::delete(&state.store, &instructor.id).map_err(internal)? {
        return Err(not_found());
    }
    tracing::info!(instructor_id = %instructor.id, "deleted instructor");
    Ok(Redirect::to("/instructors"))
}
