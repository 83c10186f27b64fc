use crate::courses::{self as course_service, CourseError};
use crate::schedule::{WeekGrid, daily_slots};
use crate::state;
use crate::templates;
use crate::types::dates::{format_iso_date, month_name, parse_iso_date};
use crate::types::{Course, CourseSchedule, DayOfWeek};

use axum::Extension;
use axum::extract::{Form, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;
use time::{Date, Month};

use super::{CurrentUser, HandlerError, internal, layout, not_found, slot_view};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ScheduleQuery {
    date: Option<String>,
    day: Option<String>,
    year: Option<String>,
    month: Option<String>,
}

/// Resolves the week to show and the selected day within it. An explicit
/// month and year win over `date`; a `day` outside the week is ignored.
pub(crate) fn resolve_week(query: &ScheduleQuery, today: Date) -> (WeekGrid, Date) {
    let year = query.year.as_deref().and_then(|raw| raw.trim().parse::<i32>().ok());
    let month = query
        .month
        .as_deref()
        .and_then(|raw| raw.trim().parse::<u8>().ok())
        .and_then(|month| Month::try_from(month).ok());
    let reference = query.date.as_deref().and_then(parse_iso_date);

    let grid = match (year, month) {
        (Some(year), Some(month)) => WeekGrid::for_month(year, month, today),
        _ => None,
    }
    .unwrap_or_else(|| WeekGrid::build(reference.unwrap_or(today), today));

    let selected = query
        .day
        .as_deref()
        .and_then(parse_iso_date)
        .and_then(|date| grid.day_for(date))
        .unwrap_or_else(|| grid.default_selection());
    (grid, selected.date)
}

fn schedule_page(
    state: &state::AppState,
    user: &CurrentUser,
    query: &ScheduleQuery,
    error: &str,
) -> Result<templates::ScheduleTemplate, HandlerError> {
    let today = state.today();
    let courses = course_service::list(&state.store, user.gym_id()).map_err(internal)?;
    let (grid, selected) = resolve_week(query, today);
    let selected_day = DayOfWeek::from(selected.weekday());
    let anchor = grid.anchor();

    let days = grid
        .days()
        .iter()
        .map(|day| templates::DayCell {
            date: format_iso_date(day.date),
            short_label: day.day.short_label(),
            day_number: day.date.day(),
            is_today: day.is_today,
            is_selected: day.date == selected,
            lesson_count: daily_slots(&courses, day.day).len(),
        })
        .collect();

    let years = (today.year() - 1..=today.year() + 2)
        .chain(std::iter::once(anchor.year()))
        .collect::<std::collections::BTreeSet<_>>()
        .into_iter()
        .map(|year| templates::SelectOption {
            value: year.to_string(),
            label: year.to_string(),
            selected: year == anchor.year(),
        })
        .collect();
    let months = (1..=12u8)
        .filter_map(|number| Month::try_from(number).ok())
        .map(|month| templates::SelectOption {
            value: u8::from(month).to_string(),
            label: month_name(month).to_string(),
            selected: month == anchor.month(),
        })
        .collect();

    Ok(templates::ScheduleTemplate {
        layout: layout(state, user, "schedule"),
        month_label: format!("{} {}", month_name(anchor.month()), anchor.year()),
        week_start: format_iso_date(grid.start()),
        previous_week: format_iso_date(grid.previous(today).start()),
        next_week: format_iso_date(grid.next(today).start()),
        days,
        selected_date: format_iso_date(selected),
        selected_label: format!(
            "{} {} {}",
            selected_day.label(),
            selected.day(),
            month_name(selected.month())
        ),
        slots: daily_slots(&courses, selected_day)
            .iter()
            .map(slot_view)
            .collect(),
        years,
        months,
        courses: courses
            .iter()
            .map(|course| templates::SelectOption {
                value: course.id.clone(),
                label: course.name.clone(),
                selected: false,
            })
            .collect(),
        weekdays: DayOfWeek::ALL
            .into_iter()
            .map(|day| templates::SelectOption {
                value: day.as_str().to_string(),
                label: day.label().to_string(),
                selected: day == selected_day,
            })
            .collect(),
        error: error.to_string(),
    })
}

pub(crate) async fn schedule_view(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ScheduleQuery>,
) -> Result<templates::ScheduleTemplate, HandlerError> {
    schedule_page(&state, &user, &query, "")
}

/// Back to the week and day the form was posted from.
fn back_to(date: &str) -> ScheduleQuery {
    ScheduleQuery {
        date: Some(date.to_string()),
        day: Some(date.to_string()),
        ..Default::default()
    }
}

fn redirect_back(date: &str) -> Redirect {
    match parse_iso_date(date) {
        Some(date) => {
            let date = format_iso_date(date);
            Redirect::to(&format!("/schedule?date={date}&day={date}"))
        }
        None => Redirect::to("/schedule"),
    }
}

fn rerender_schedule(
    state: &state::AppState,
    user: &CurrentUser,
    date: &str,
    error: &str,
) -> Response {
    match schedule_page(state, user, &back_to(date), error) {
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

fn parse_day(raw: &str) -> Result<DayOfWeek, &'static str> {
    DayOfWeek::parse(raw).ok_or("Choose a day of the week.")
}

#[derive(Debug, Deserialize)]
pub(crate) struct LessonForm {
    #[serde(default)]
    date: String,
    course_id: String,
    day: String,
    start_time: String,
    end_time: String,
}

pub(crate) async fn lesson_create(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<LessonForm>,
) -> Result<Redirect, Response> {
    let course = gym_course(&state, &user, &form.course_id).map_err(IntoResponse::into_response)?;
    let day = parse_day(&form.day)
        .map_err(|message| rerender_schedule(&state, &user, &form.date, message))?;
    let lesson = CourseSchedule {
        day,
        start_time: form.start_time.trim().to_string(),
        end_time: form.end_time.trim().to_string(),
    };

    match course_service::add_lesson(&state.store, &course.id, lesson) {
        Ok(true) => {
            tracing::info!(course_id = %course.id, day = day.as_str(), "added lesson");
            Ok(redirect_back(&form.date))
        }
        Ok(false) => Err(not_found().into_response()),
        Err(CourseError::Validation(message)) => {
            Err(rerender_schedule(&state, &user, &form.date, message))
        }
        Err(CourseError::Store(err)) => Err(internal(err).into_response()),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LessonEditForm {
    #[serde(default)]
    date: String,
    course_id: String,
    original_day: String,
    original_start: String,
    day: String,
    start_time: String,
    end_time: String,
}

pub(crate) async fn lesson_update(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<LessonEditForm>,
) -> Result<Redirect, Response> {
    let course = gym_course(&state, &user, &form.course_id).map_err(IntoResponse::into_response)?;
    let original_day = parse_day(&form.original_day)
        .map_err(|message| rerender_schedule(&state, &user, &form.date, message))?;
    let day = parse_day(&form.day)
        .map_err(|message| rerender_schedule(&state, &user, &form.date, message))?;
    let lesson = CourseSchedule {
        day,
        start_time: form.start_time.trim().to_string(),
        end_time: form.end_time.trim().to_string(),
    };

    match course_service::replace_lesson(
        &state.store,
        &course.id,
        original_day,
        form.original_start.trim(),
        lesson,
    ) {
        Ok(true) => Ok(redirect_back(&form.date)),
        Ok(false) => Err(not_found().into_response()),
        Err(CourseError::Validation(message)) => {
            Err(rerender_schedule(&state, &user, &form.date, message))
        }
        Err(CourseError::Store(err)) => Err(internal(err).into_response()),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LessonDeleteForm {
    #[serde(default)]
    date: String,
    course_id: String,
    day: String,
    start_time: String,
}

pub(crate) async fn lesson_delete(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<LessonDeleteForm>,
) -> Result<Redirect, HandlerError> {
    let course = gym_course(&state, &user, &form.course_id)?;
    let day = DayOfWeek::parse(&form.day).ok_or((StatusCode::BAD_REQUEST, "invalid day"))?;
    let removed = course_service::delete_lesson(
        &state.store,
        &course.id,
        day,
        form.start_time.trim(),
    )
    .map_err(internal)?;
    if !removed {
        return Err(not_found());
    }
    tracing::info!(course_id = %course.id, day = day.as_str(), "deleted lesson");
    Ok(redirect_back(&form.date))
}
