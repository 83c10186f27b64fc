//! Subscription plans a gym sells.

use crate::status;
use crate::store::{self, Collection, Store, StoreError};
use crate::types::{Member, Subscription, SubscriptionStatus};

use time::Date;

#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("subscription not found")]
    NotFound,
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default)]
pub struct PlanDraft {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration_months: u32,
    pub max_entries: Option<u32>,
}

impl PlanDraft {
    fn validated(self) -> Result<Self, PlanError> {
        let name = self.name.trim().to_string();
        if name.is_empty() {
            return Err(PlanError::Validation("Plan name is required."));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(PlanError::Validation("Price must be zero or more."));
        }
        if self.duration_months == 0 {
            return Err(PlanError::Validation(
                "Duration must be at least one month.",
            ));
        }
        Ok(Self {
            name,
            description: self.description.trim().to_string(),
            max_entries: self.max_entries.filter(|entries| *entries > 0),
            ..self
        })
    }
}

pub fn list(store: &Store, gym_id: &str) -> Result<Vec<Subscription>, StoreError> {
    let plans: Vec<Subscription> = store.load(Collection::Subscriptions)?;
    Ok(plans
        .into_iter()
        .filter(|plan| plan.gym_id == gym_id)
        .collect())
}

pub fn get(store: &Store, id: &str) -> Result<Option<Subscription>, StoreError> {
    let plans: Vec<Subscription> = store.load(Collection::Subscriptions)?;
    Ok(plans.into_iter().find(|plan| plan.id == id))
}

pub fn create(store: &Store, gym_id: &str, draft: PlanDraft) -> Result<Subscription, PlanError> {
    let draft = draft.validated()?;
    let plan = Subscription {
        id: store::generate_id("sub"),
        gym_id: gym_id.to_string(),
        name: draft.name,
        description: draft.description,
        price: draft.price,
        duration_months: draft.duration_months,
        max_entries: draft.max_entries,
    };
    store.update(Collection::Subscriptions, |plans: &mut Vec<Subscription>| {
        plans.push(plan.clone());
    })?;
    tracing::info!(plan_id = %plan.id, gym_id, "created subscription plan");
    Ok(plan)
}

pub fn update(store: &Store, id: &str, draft: PlanDraft) -> Result<Subscription, PlanError> {
    let draft = draft.validated()?;
    store.update(Collection::Subscriptions, |plans: &mut Vec<Subscription>| {
        let plan = plans
            .iter_mut()
            .find(|plan| plan.id == id)
            .ok_or(PlanError::NotFound)?;
        plan.name = draft.name;
        plan.description = draft.description;
        plan.price = draft.price;
        plan.duration_months = draft.duration_months;
        plan.max_entries = draft.max_entries;
        Ok(plan.clone())
    })?
}

/// Members still pointing at a deleted plan are left alone and read as
/// inactive from then on.
pub fn delete(store: &Store, id: &str) -> Result<bool, StoreError> {
    store.update(Collection::Subscriptions, |plans: &mut Vec<Subscription>| {
        let before = plans.len();
        plans.retain(|plan| plan.id != id);
        plans.len() != before
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlanStats {
    pub plan_id: String,
    /// Members on the plan whose status is active or expiring.
    pub active_members: usize,
    pub monthly_price: f64,
    pub monthly_revenue: f64,
}

pub fn monthly_price(plan: &Subscription) -> f64 {
    plan.price / f64::from(plan.duration_months.max(1))
}

pub fn plan_stats(plan: &Subscription, members: &[Member], today: Date) -> PlanStats {
    let active_members = members
        .iter()
        .filter(|member| member.subscription_id.as_deref() == Some(plan.id.as_str()))
        .filter(|member| {
            matches!(
                status::status_for(member.joined_at, plan.duration_months, today),
                SubscriptionStatus::Active | SubscriptionStatus::Expiring
            )
        })
        .count();
    let monthly_price = monthly_price(plan);

    PlanStats {
        plan_id: plan.id.clone(),
        active_members,
        monthly_price,
        monthly_revenue: monthly_price * active_members as f64,
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::store::tests::create_temp_dir;
    use crate::types::dates::parse_iso_date;

    fn draft(name: &str, price: f64, duration_months: u32) -> PlanDraft {
        PlanDraft {
            name: name.to_string(),
            description: String::new(),
            price,
            duration_months,
            max_entries: None,
        }
    }

    fn member(id: &str, subscription_id: &str, joined_at: &str) -> Member {
        Member {
            id: id.to_string(),
            gym_id: "gym-001".to_string(),
            user_id: format!("u-{id}"),
            first_name: "Matteo".to_string(),
            last_name: "Ricci".to_string(),
            email: "matteo@example.com".to_string(),
            phone: None,
            subscription_id: Some(subscription_id.to_string()),
            enrolled_courses: Vec::new(),
            joined_at: parse_iso_date(joined_at).expect("date"),
        }
    }

    #[test]
    fn create__should_append_plan_for_gym() {
        // Given
        let dir = create_temp_dir("plans-create");
        let store = Store::open(&dir).expect("open store");

        // When
        let monthly = create(&store, "gym-001", draft("Monthly", 50.0, 1)).expect("create");
        let yearly = create(&store, "gym-001", draft("Yearly", 480.0, 12)).expect("create");

        // Then
        let plans = list(&store, "gym-001").expect("list");
        let ids: Vec<&str> = plans.iter().map(|plan| plan.id.as_str()).collect();
        assert_eq!(ids, vec![monthly.id.as_str(), yearly.id.as_str()]);

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn create__should_reject_zero_duration() {
        // Given
        let dir = create_temp_dir("plans-invalid");
        let store = Store::open(&dir).expect("open store");

        // When
        let result = create(&store, "gym-001", draft("Broken", 10.0, 0));

        // Then
        assert!(matches!(result, Err(PlanError::Validation(_))));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn update__should_fail_for_missing_plan() {
        // Given
        let dir = create_temp_dir("plans-update");
        let store = Store::open(&dir).expect("open store");
        let plan = create(&store, "gym-001", draft("Monthly", 50.0, 1)).expect("create");

        // When
        let updated = update(&store, &plan.id, draft("Monthly Plus", 60.0, 1)).expect("update");
        let missing = update(&store, "sub-missing", draft("Ghost", 1.0, 1));

        // Then
        assert_eq!(updated.name, "Monthly Plus");
        assert_eq!(updated.price, 60.0);
        assert!(matches!(missing, Err(PlanError::NotFound)));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn delete__should_return_false_when_missing() {
        // Given
        let dir = create_temp_dir("plans-delete");
        let store = Store::open(&dir).expect("open store");
        let plan = create(&store, "gym-001", draft("Monthly", 50.0, 1)).expect("create");

        // Then
        assert!(delete(&store, &plan.id).expect("delete"));
        assert!(!delete(&store, &plan.id).expect("delete"));

        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn plan_stats__should_count_active_and_expiring_members() {
        // Given
        let plan = Subscription {
            id: "sub-002".to_string(),
            gym_id: "gym-001".to_string(),
            name: "Quarterly".to_string(),
            description: String::new(),
            price: 135.0,
            duration_months: 3,
            max_entries: None,
        };
        let members = vec![
            member("m-1", "sub-002", "2025-01-01"),
            member("m-2", "sub-002", "2024-12-30"),
            member("m-3", "sub-002", "2024-06-01"),
            member("m-4", "sub-001", "2025-01-01"),
        ];
        let today = parse_iso_date("2025-03-25").expect("date");

        // When
        let stats = plan_stats(&plan, &members, today);

        // Then
        assert_eq!(stats.active_members, 2);
        assert_eq!(stats.monthly_price, 45.0);
        assert_eq!(stats.monthly_revenue, 90.0);
    }
}
