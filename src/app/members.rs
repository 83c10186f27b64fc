use crate::accounts;
use crate::attendance::{self, AttendanceSummary};
use crate::courses as course_service;
use crate::members::{self as member_service, MemberDraft, MemberError};
use crate::schedule::capacity_percent;
use crate::state;
use crate::status::{self, StatusCounts, StatusFilter};
use crate::subscriptions as plan_service;
use crate::templates;
use crate::types::dates::month_name;
use crate::types::{Member, NotificationKind};

use axum::Extension;
use axum::extract::{Form, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::{
    CurrentUser, HandlerError, internal, layout, member_row, non_empty, not_found, plan_options,
};

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MemberListQuery {
    q: Option<String>,
    status: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct MemberForm {
    first_name: String,
    last_name: String,
    email: String,
    phone: Option<String>,
    subscription_id: Option<String>,
}

impl MemberForm {
    fn draft(&self) -> MemberDraft {
        MemberDraft {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

fn member_list_page(
    state: &state::AppState,
    user: &CurrentUser,
    query: &MemberListQuery,
    form: &MemberForm,
    error: &str,
) -> Result<templates::MembersTemplate, HandlerError> {
    let today = state.today();
    let gym_id = user.gym_id();
    let plans = plan_service::list(&state.store, gym_id).map_err(internal)?;
    let roster = member_service::list(&state.store, gym_id).map_err(internal)?;

    let search = query.q.as_deref().unwrap_or_default().trim().to_string();
    let filter = StatusFilter::parse(query.status.as_deref().unwrap_or_default());
    let matches = member_service::search(&roster, &search);
    let counts = StatusCounts::tally(&roster, &plans, today);

    let tabs = [
        (StatusFilter::All, "All", counts.total),
        (StatusFilter::Active, "Active", counts.active),
        (StatusFilter::Expiring, "Expiring", counts.expiring),
        (StatusFilter::Expired, "Expired", counts.expired),
    ]
    .into_iter()
    .map(|(value, label, count)| templates::StatusTab {
        value: value.as_str(),
        label,
        count,
        selected: value == filter,
    })
    .collect();

    let members = matches
        .into_iter()
        .filter(|member| filter.matches(status::member_status(member, &plans, today)))
        .map(|member| member_row(member, &plans, today))
        .collect();

    Ok(templates::MembersTemplate {
        layout: layout(state, user, "members"),
        query: search,
        filter: filter.as_str(),
        tabs,
        members,
        plans: plan_options(&plans, form.subscription_id.as_deref()),
        error: error.to_string(),
        form_first_name: form.first_name.clone(),
        form_last_name: form.last_name.clone(),
        form_email: form.email.clone(),
        form_phone: form.phone.clone().unwrap_or_default(),
    })
}

pub(crate) async fn member_list(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Query(query): Query<MemberListQuery>,
) -> Result<templates::MembersTemplate, HandlerError> {
    member_list_page(&state, &user, &query, &MemberForm::default(), "")
}

pub(crate) async fn member_create(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<MemberForm>,
) -> Result<Redirect, Response> {
    let gym_id = user.gym_id();
    let subscription_id = non_empty(form.subscription_id.clone());
    if let Some(plan_id) = subscription_id.as_deref() {
        let plan = plan_service::get(&state.store, plan_id)
            .map_err(|err| internal(err).into_response())?;
        if !plan.is_some_and(|plan| plan.gym_id == gym_id) {
            return Err(rerender_list(
                &state,
                &user,
                &form,
                "Choose one of the gym's plans.",
            ));
        }
    }

    match member_service::add(
        &state.store,
        gym_id,
        form.draft(),
        subscription_id,
        state.today(),
    ) {
        Ok(member) => {
            state.notifications.lock().expect("notifications lock").add(
                "New enrolment",
                format!("{} joined the gym.", member.full_name()),
                NotificationKind::Success,
                state.clock.now(),
            );
            Ok(Redirect::to("/members"))
        }
        Err(MemberError::Validation(message)) => {
            Err(rerender_list(&state, &user, &form, message))
        }
        Err(MemberError::Store(err)) => Err(internal(err).into_response()),
    }
}

fn rerender_list(
    state: &state::AppState,
    user: &CurrentUser,
    form: &MemberForm,
    error: &str,
) -> Response {
    match member_list_page(state, user, &MemberListQuery::default(), form, error) {
        Ok(page) => (StatusCode::BAD_REQUEST, page).into_response(),
        Err(err) => err.into_response(),
    }
}

/// Loads a member of the signed-in manager's gym; members of other gyms read
/// as missing.
fn gym_member(
    state: &state::AppState,
    user: &CurrentUser,
    id: &str,
) -> Result<Member, HandlerError> {
    member_service::get(&state.store, id)
        .map_err(internal)?
        .filter(|member| member.gym_id == user.gym_id())
        .ok_or_else(not_found)
}

#[derive(Debug, Deserialize)]
pub(crate) struct MemberDetailQuery {
    saved: Option<String>,
}

/// Bar widths are relative to the busiest entry.
fn month_bars(summary: &AttendanceSummary) -> Vec<templates::AttendanceBar> {
    let peak = summary
        .monthly
        .iter()
        .map(|count| count.sessions)
        .max()
        .unwrap_or_default();
    summary
        .monthly
        .iter()
        .map(|count| templates::AttendanceBar {
            label: month_name(count.month).chars().take(3).collect(),
            count: count.sessions,
            percent: capacity_percent(count.sessions as usize, peak),
        })
        .collect()
}

fn weekday_bars(summary: &AttendanceSummary) -> Vec<templates::AttendanceBar> {
    let peak = summary
        .weekly
        .iter()
        .map(|count| count.lessons)
        .max()
        .unwrap_or_default();
    summary
        .weekly
        .iter()
        .map(|count| templates::AttendanceBar {
            label: count.day.short_label().to_string(),
            count: count.lessons,
            percent: capacity_percent(count.lessons as usize, peak),
        })
        .collect()
}

fn member_detail_page(
    state: &state::AppState,
    user: &CurrentUser,
    member: &Member,
    error: &str,
    notice: &str,
) -> Result<templates::MemberDetailTemplate, HandlerError> {
    let today = state.today();
    let plans = plan_service::list(&state.store, user.gym_id()).map_err(internal)?;
    let courses = course_service::list(&state.store, user.gym_id()).map_err(internal)?;
    let has_account = accounts::find_user(&state.store, &member.user_id)
        .map_err(internal)?
        .is_some();
    let summary = attendance::summarize(member, &courses, today);
    Ok(templates::MemberDetailTemplate {
        layout: layout(state, user, "members"),
        member: member_row(member, &plans, today),
        first_name: member.first_name.clone(),
        last_name: member.last_name.clone(),
        has_account,
        plans: plan_options(&plans, member.subscription_id.as_deref()),
        timetable_label: if summary.enrolled_only {
            "Enrolled courses"
        } else {
            "Full gym timetable"
        },
        attendance_months: month_bars(&summary),
        attendance_days: weekday_bars(&summary),
        attendance_this_month: summary.this_month,
        attendance_goal: summary.month_goal,
        attendance_percent: capacity_percent(summary.this_month as usize, summary.month_goal),
        error: error.to_string(),
        notice: notice.to_string(),
    })
}

pub(crate) async fn member_detail(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Query(query): Query<MemberDetailQuery>,
) -> Result<templates::MemberDetailTemplate, HandlerError> {
    let member = gym_member(&state, &user, &id)?;
    let notice = if query.saved.is_some() {
        "Changes saved."
    } else {
        ""
    };
    member_detail_page(&state, &user, &member, "", notice)
}

pub(crate) async fn member_update(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Form(form): Form<MemberForm>,
) -> Result<Redirect, Response> {
    let member = gym_member(&state, &user, &id).map_err(IntoResponse::into_response)?;
    match member_service::update(&state.store, &member.id, form.draft()) {
        Ok(Some(member)) => Ok(Redirect::to(&format!("/members/{}?saved=1", member.id))),
        Ok(None) => Err(not_found().into_response()),
        Err(MemberError::Validation(message)) => {
            let page = member_detail_page(&state, &user, &member, message, "")
                .map_err(IntoResponse::into_response)?;
            Err((StatusCode::BAD_REQUEST, page).into_response())
        }
        Err(MemberError::Store(err)) => Err(internal(err).into_response()),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct AssignPlanForm {
    subscription_id: Option<String>,
}

pub(crate) async fn member_assign_plan(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Form(form): Form<AssignPlanForm>,
) -> Result<Redirect, Response> {
    let member = gym_member(&state, &user, &id).map_err(IntoResponse::into_response)?;
    let subscription_id = non_empty(form.subscription_id);
    if let Some(plan_id) = subscription_id.as_deref() {
        let plan = plan_service::get(&state.store, plan_id)
            .map_err(|err| internal(err).into_response())?;
        if !plan.is_some_and(|plan| plan.gym_id == user.gym_id()) {
            let page = member_detail_page(
                &state,
                &user,
                &member,
                "Choose one of the gym's plans.",
                "",
            )
            .map_err(IntoResponse::into_response)?;
            return Err((StatusCode::BAD_REQUEST, page).into_response());
        }
    }

    member_service::assign_plan(&state.store, &member.id, subscription_id)
        .map_err(|err| internal(err).into_response())?
        .ok_or_else(|| not_found().into_response())?;
    tracing::info!(member_id = %member.id, "assigned subscription plan");
    Ok(Redirect::to(&format!("/members/{}?saved=1", member.id)))
}

pub(crate) async fn member_delete(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Redirect, HandlerError> {
    let member = gym_member(&state, &user, &id)?;
    if !member_service::delete(&state.store, &member.id).map_err(internal)? {
        return Err(not_found());
    }
    tracing::info!(member_id = %member.id, "deleted member");
    Ok(Redirect::to("/members"))
}
