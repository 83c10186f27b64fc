//! JSON views of the roster and the weekly schedule, for managers.

use crate::courses as course_service;
use crate::members as member_service;
use crate::schedule::{CalendarSlot, WeekGrid, daily_slots};
use crate::state;
use crate::status::{self, StatusFilter};
use crate::subscriptions as plan_service;
use crate::types::dates::{format_iso_date, parse_iso_date};
use crate::types::{DayOfWeek, Member};

use axum::Extension;
use axum::Json;
use axum::extract::{Query, State};
use serde::{Deserialize, Serialize};

use super::{CurrentUser, HandlerError, internal};

#[derive(Debug, Deserialize)]
pub(crate) struct MembersQuery {
    q: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct MemberEntry {
    #[serde(flatten)]
    member: Member,
    status: &'static str,
    expiry_date: Option<String>,
    days_until_expiry: Option<i64>,
    plan_name: Option<String>,
}

pub(crate) async fn members(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<MembersQuery>,
) -> Result<Json<Vec<MemberEntry>>, HandlerError> {
    let today = state.today();
    let plans = plan_service::list(&state.store, user.gym_id()).map_err(internal)?;
    let roster = member_service::list(&state.store, user.gym_id()).map_err(internal)?;
    let filter = StatusFilter::parse(query.status.as_deref().unwrap_or_default());

    let entries = member_service::search(&roster, query.q.as_deref().unwrap_or_default().trim())
        .into_iter()
        .filter_map(|member| {
            let member_status = status::member_status(member, &plans, today);
            filter.matches(member_status).then(|| MemberEntry {
                status: member_status.as_str(),
                expiry_date: status::member_expiry(member, &plans).map(format_iso_date),
                days_until_expiry: status::days_until_expiry(member, &plans, today),
                plan_name: status::plan_for(member, &plans).map(|plan| plan.name.clone()),
                member: member.clone(),
            })
        })
        .collect();
    Ok(Json(entries))
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScheduleQuery {
    date: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DayEntry {
    date: String,
    day: DayOfWeek,
    is_today: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WeekSchedule {
    week_start: String,
    days: Vec<DayEntry>,
    selected: String,
    slots: Vec<CalendarSlot>,
}

/// `date` picks the day; the week is the one containing it. Defaults to today.
pub(crate) async fn schedule(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<ScheduleQuery>,
) -> Result<Json<WeekSchedule>, HandlerError> {
    let today = state.today();
    let selected = query
        .date
        .as_deref()
        .and_then(parse_iso_date)
        .unwrap_or(today);
    let grid = WeekGrid::build(selected, today);
    let courses = course_service::list(&state.store, user.gym_id()).map_err(internal)?;

    Ok(Json(WeekSchedule {
        week_start: format_iso_date(grid.start()),
        days: grid
            .days()
            .iter()
            .map(|day| DayEntry {
                date: format_iso_date(day.date),
                day: day.day,
                is_today: day.is_today,
            })
            .collect(),
        selected: format_iso_date(selected),
        slots: daily_slots(&courses, DayOfWeek::from(selected.weekday())),
    }))
}
