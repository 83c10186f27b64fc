use crate::courses::{self as course_service, CourseDraft, CourseError};
use crate::instructors as instructor_service;
use crate::schedule::{COURSE_COLORS, capacity_percent};
use crate::state;
use crate::templates;
use crate::types::{Course, Sport};

use axum::Extension;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::{
    CurrentUser, HandlerError, internal, layout, non_empty, not_found, sport_options,
};

#[derive(Debug, Deserialize)]
pub(crate) struct CourseForm {
    name: String,
    instructor: String,
    #[serde(default)]
    description: String,
    sport: Option<String>,
    max_capacity: Option<String>,
}

impl CourseForm {
    fn draft(&self) -> Result<CourseDraft, &'static str> {
        let sport = match non_empty(self.sport.clone()) {
            Some(raw) => Some(Sport::parse(&raw).ok_or("Choose a discipline.")?),
            None => None,
        };
        let max_capacity = match non_empty(self.max_capacity.clone()) {
            Some(raw) => Some(
                raw.parse::<u32>()
                    .map_err(|_| "Capacity must be a whole number.")?,
            ),
            None => None,
        };
        Ok(CourseDraft {
            name: self.name.clone(),
            instructor: self.instructor.clone(),
            description: self.description.clone(),
            sport,
            max_capacity,
        })
    }
}

fn course_row(index: usize, course: &Course) -> templates::CourseRow {
    templates::CourseRow {
        id: course.id.clone(),
        name: course.name.clone(),
        description: course.description.clone(),
        instructor: course.instructor.clone(),
        sport_label: course.sport.label(),
        sports: sport_options(&[course.sport]),
        capacity: course.max_capacity,
        enrolled: course.enrolled_members.len(),
        fill_percent: capacity_percent(course.enrolled_members.len(), course.max_capacity),
        color: COURSE_COLORS[index % COURSE_COLORS.len()],
        lessons: course
            .schedule
            .iter()
            .map(|lesson| templates::LessonRow {
                day_label: lesson.day.label(),
                start_time: lesson.start_time.clone(),
                end_time: lesson.end_time.clone(),
            })
            .collect(),
    }
}

fn course_list_page(
    state: &state::AppState,
    user: &CurrentUser,
    error: &str,
) -> Result<templates::CoursesTemplate, HandlerError> {
    let courses = course_service::list(&state.store, user.gym_id()).map_err(internal)?;
    let instructors =
        instructor_service::list(&state.store, user.gym_id()).map_err(internal)?;

    Ok(templates::CoursesTemplate {
        layout: layout(state, user, "courses"),
        courses: courses
            .iter()
            .enumerate()
            .map(|(index, course)| course_row(index, course))
            .collect(),
        sports: sport_options(&[Sport::Boxing]),
        instructors: instructors
            .iter()
            .map(|instructor| instructor.full_name())
            .collect(),
        error: error.to_string(),
    })
}

fn rerender_courses(state: &state::AppState, user: &CurrentUser, error: &str) -> Response {
    match course_list_page(state, user, error) {
        Ok(page) => (StatusCode::BAD_REQUEST, page).into_response(),
        Err(err) => err.into_response(),
    }
}

fn gym_course(
    state: &state::AppState,
    user: &CurrentUser,
    id: &str,
) -> Result<Course, HandlerError> {
    course_service::get(&state.store, id)
        .map_err(internal)?
        .filter(|course| course.gym_id == user.gym_id())
        .ok_or_else(not_found)
}

pub(crate) async fn course_list(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<templates::CoursesTemplate, HandlerError> {
    course_list_page(&state, &user, "")
}

/// New courses start without lessons; those are added from the schedule.
pub(crate) async fn course_create(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<CourseForm>,
) -> Result<Redirect, Response> {
    let draft = form
        .draft()
        .map_err(|message| rerender_courses(&state, &user, message))?;
    match course_service::add(&state.store, user.gym_id(), draft, Vec::new()) {
        Ok(_) => Ok(Redirect::to("/courses")),
        Err(CourseError::Validation(message)) => Err(rerender_courses(&state, &user, message)),
        Err(CourseError::Store(err)) => Err(internal(err).into_response()),
    }
}

pub(crate) async fn course_update(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Form(form): Form<CourseForm>,
) -> Result<Redirect, Response> {
    let course = gym_course(&state, &user, &id).map_err(IntoResponse::into_response)?;
    let draft = form
        .draft()
        .map_err(|message| rerender_courses(&state, &user, message))?;
    match course_service::update(&state.store, &course.id, draft) {
        Ok(Some(_)) => Ok(Redirect::to("/courses")),
        Ok(None) => Err(not_found().into_response()),
        Err(CourseError::Validation(message)) => Err(rerender_courses(&state, &user, message)),
        Err(CourseError::Store(err)) => Err(internal(err).into_response()),
    }
}

pub(crate) async fn course_delete(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Redirect, HandlerError> {
    let course = gym_course(&state, &user, &id)?;
    if !course_service::delete(&state.store, &course.id).map_err(internal)? {
        return Err(not_found());
    }
    tracing::info!(course_id = %course.id, "deleted course");
    Ok(Redirect::to("/courses"))
}
