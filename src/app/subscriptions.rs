use crate::members as member_service;
use crate::state;
use crate::subscriptions::{self as plan_service, PlanDraft, PlanError};
use crate::templates;
use crate::types::Subscription;

use axum::Extension;
use axum::extract::{Form, Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Deserialize;

use super::{CurrentUser, HandlerError, internal, layout, non_empty, not_found};

#[derive(Debug, Deserialize)]
pub(crate) struct PlanForm {
    name: String,
    #[serde(default)]
    description: String,
    price: String,
    duration_months: String,
    max_entries: Option<String>,
}

impl PlanForm {
    fn draft(&self) -> Result<PlanDraft, &'static str> {
        let price: f64 = self
            .price
            .trim()
            .replace(',', ".")
            .parse()
            .map_err(|_| "Enter a valid price.")?;
        let duration_months: u32 = self
            .duration_months
            .trim()
            .parse()
            .map_err(|_| "Enter the duration in whole months.")?;
        let max_entries = match non_empty(self.max_entries.clone()) {
            Some(raw) => Some(
                raw.parse::<u32>()
                    .map_err(|_| "Entries must be a whole number.")?,
            ),
            None => None,
        };
        Ok(PlanDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            price,
            duration_months,
            max_entries,
        })
    }
}

fn duration_label(months: u32) -> String {
    match months {
        1 => "month".to_string(),
        12 => "year".to_string(),
        months => format!("{months} months"),
    }
}

fn plan_list_page(
    state: &state::AppState,
    user: &CurrentUser,
    error: &str,
) -> Result<templates::SubscriptionsTemplate, HandlerError> {
    let today = state.today();
    let plans = plan_service::list(&state.store, user.gym_id()).map_err(internal)?;
    let roster = member_service::list(&state.store, user.gym_id()).map_err(internal)?;

    let mut total_revenue = 0.0;
    let rows = plans
        .iter()
        .map(|plan| {
            let stats = plan_service::plan_stats(plan, &roster, today);
            total_revenue += stats.monthly_revenue;
            templates::PlanRow {
                id: plan.id.clone(),
                name: plan.name.clone(),
                description: plan.description.clone(),
                price: templates::format_euros(plan.price),
                price_input: format!("{:.2}", plan.price),
                duration_months: plan.duration_months,
                duration_label: duration_label(plan.duration_months),
                max_entries: plan
                    .max_entries
                    .map(|entries| entries.to_string())
                    .unwrap_or_default(),
                monthly_price: templates::format_euros(stats.monthly_price),
                active_members: stats.active_members,
                monthly_revenue: templates::format_euros(stats.monthly_revenue),
            }
        })
        .collect();

    Ok(templates::SubscriptionsTemplate {
        layout: layout(state, user, "subscriptions"),
        plans: rows,
        total_revenue: templates::format_euros(total_revenue),
        error: error.to_string(),
    })
}

fn rerender_plans(state: &state::AppState, user: &CurrentUser, error: &str) -> Response {
    match plan_list_page(state, user, error) {
        Ok(page) => (StatusCode::BAD_REQUEST, page).into_response(),
        Err(err) => err.into_response(),
    }
}

fn gym_plan(
    state: &state::AppState,
    user: &CurrentUser,
    id: &str,
) -> Result<Subscription, HandlerError> {
    plan_service::get(&state.store, id)
        .map_err(internal)?
        .filter(|plan| plan.gym_id == user.gym_id())
        .ok_or_else(not_found)
}

pub(crate) async fn plan_list(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
) -> Result<templates::SubscriptionsTemplate, HandlerError> {
    plan_list_page(&state, &user, "")
}

pub(crate) async fn plan_create(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Form(form): Form<PlanForm>,
) -> Result<Redirect, Response> {
    let draft = form
        .draft()
        .map_err(|message| rerender_plans(&state, &user, message))?;
    match plan_service::create(&state.store, user.gym_id(), draft) {
        Ok(_) => Ok(Redirect::to("/subscriptions")),
        Err(PlanError::Validation(message)) => Err(rerender_plans(&state, &user, message)),
        Err(err) => Err(internal(err).into_response()),
    }
}

pub(crate) async fn plan_update(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Form(form): Form<PlanForm>,
) -> Result<Redirect, Response> {
    let plan = gym_plan(&state, &user, &id).map_err(IntoResponse::into_response)?;
    let draft = form
        .draft()
        .map_err(|message| rerender_plans(&state, &user, message))?;
    match plan_service::update(&state.store, &plan.id, draft) {
        Ok(_) => Ok(Redirect::to("/subscriptions")),
        Err(PlanError::NotFound) => Err(not_found().into_response()),
        Err(PlanError::Validation(message)) => Err(rerender_plans(&state, &user, message)),
        Err(PlanError::Store(err)) => Err(internal(err).into_response()),
    }
}

pub(crate) async fn plan_delete(
    State(state): State<state::AppState>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<Redirect, HandlerError> {
    let plan = gym_plan(&state, &user, &id)?;
    if !plan_service::delete(&state.store, &plan.id).map_err(internal)? {
        return Err(not_found());
    }
    tracing::info!(plan_id = %plan.id, "deleted subscription plan");
    Ok(Redirect::to("/subscriptions"))
}
