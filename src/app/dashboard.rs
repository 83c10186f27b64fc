use crate::accounts;
use crate::courses as course_service;
use crate::members as member_service;
use crate::schedule::daily_slots;
use crate::state;
use crate::status::{self, StatusCounts};
use crate::subscriptions as plan_service;
use crate::templates;
use crate::types::dates::month_name;
use crate::types::{DayOfWeek, SubscriptionStatus};

use axum::Extension;
use axum::extract::State;
use axum::response::Redirect;

use super::{CurrentUser, HandlerError, internal, layout, member_row, slot_view};

pub(crate) async fn index() -> Redirect {
    Redirect::to("/dashboard")
}

pub(crate) async fn dashboard(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<templates::DashboardTemplate, HandlerError> {
    let today = state.today();
    let weekday = DayOfWeek::from(today.weekday());
    let gym_id = user.gym_id();
    let gym = accounts::find_gym(&state.store, gym_id).map_err(internal)?;
    let plans = plan_service::list(&state.store, gym_id).map_err(internal)?;
    let roster = member_service::list(&state.store, gym_id).map_err(internal)?;
    let courses = course_service::list(&state.store, gym_id).map_err(internal)?;

    let counts = StatusCounts::tally(&roster, &plans, today);
    let monthly_revenue: f64 = plans
        .iter()
        .map(|plan| plan_service::plan_stats(plan, &roster, today).monthly_revenue)
        .sum();

    let mut expiring: Vec<_> = roster
        .iter()
        .filter(|member| {
            status::member_status(member, &plans, today) == SubscriptionStatus::Expiring
        })
        .collect();
    expiring.sort_by_key(|member| status::member_expiry(member, &plans));

    let membership: Vec<templates::MemberRow> = roster
        .iter()
        .filter(|member| member.user_id == user.0.id)
        .take(1)
        .map(|member| member_row(member, &plans, today))
        .collect();

    let (gym_name, invite_code) = gym
        .map(|gym| (gym.name, gym.invite_code))
        .unwrap_or_default();

    Ok(templates::DashboardTemplate {
        layout: layout(&state, &user, "dashboard"),
        first_name: user.0.first_name.clone(),
        today_label: format!(
            "{} {} {} {}",
            weekday.label(),
            today.day(),
            month_name(today.month()),
            today.year()
        ),
        gym_name,
        invite_code,
        total_members: counts.total,
        active_members: counts.active,
        expiring_members: counts.expiring,
        expired_members: counts.expired,
        monthly_revenue: templates::format_euros(monthly_revenue),
        expiring: expiring
            .into_iter()
            .map(|member| member_row(member, &plans, today))
            .collect(),
        has_membership: !membership.is_empty(),
        membership,
        slots: daily_slots(&courses, weekday).iter().map(slot_view).collect(),
    })
}
