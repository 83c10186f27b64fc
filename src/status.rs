//! Subscription lifecycle derivation.
//!
//! A member's status is never stored: it is recomputed from `joined_at` and the
//! referenced plan's duration every time it is shown.

use crate::types::{Member, Subscription, SubscriptionStatus};

use time::{Date, Duration, Month};

/// Days before expiry during which a member counts as expiring.
pub const EXPIRING_WINDOW_DAYS: i64 = 7;
/// Days after expiry before a lapsed member is classified inactive.
pub const GRACE_WINDOW_DAYS: i64 = 14;

/// Calendar-month addition. The day of month is kept and overflows into the
/// following month when the target month is shorter (31 Jan + 1 = 3 Mar).
pub fn add_months(date: Date, months: u32) -> Date {
    let month_index =
        i64::from(date.year()) * 12 + i64::from(u8::from(date.month())) - 1 + i64::from(months);
    let shifted = i32::try_from(month_index.div_euclid(12))
        .ok()
        .zip(Month::try_from((month_index.rem_euclid(12) + 1) as u8).ok())
        .and_then(|(year, month)| Date::from_calendar_date(year, month, 1).ok())
        .and_then(|first| first.checked_add(Duration::days(i64::from(date.day()) - 1)));
    shifted.unwrap_or(Date::MAX)
}

pub fn expiry_date(joined_at: Date, duration_months: u32) -> Date {
    add_months(joined_at, duration_months)
}

pub fn status_for(joined_at: Date, duration_months: u32, today: Date) -> SubscriptionStatus {
    let expiry = expiry_date(joined_at, duration_months);
    let days_past_expiry = (today - expiry).whole_days();

    if days_past_expiry > GRACE_WINDOW_DAYS {
        SubscriptionStatus::Inactive
    } else if days_past_expiry > 0 {
        SubscriptionStatus::Expired
    } else if -days_past_expiry <= EXPIRING_WINDOW_DAYS {
        SubscriptionStatus::Expiring
    } else {
        SubscriptionStatus::Active
    }
}

pub fn plan_for<'a>(member: &Member, plans: &'a [Subscription]) -> Option<&'a Subscription> {
    let subscription_id = member.subscription_id.as_deref()?;
    plans.iter().find(|plan| plan.id == subscription_id)
}

/// Members without a plan, or whose plan no longer exists, are inactive.
pub fn member_status(member: &Member, plans: &[Subscription], today: Date) -> SubscriptionStatus {
    match plan_for(member, plans) {
        Some(plan) => status_for(member.joined_at, plan.duration_months, today),
        None => SubscriptionStatus::Inactive,
    }
}

pub fn member_expiry(member: &Member, plans: &[Subscription]) -> Option<Date> {
    plan_for(member, plans).map(|plan| expiry_date(member.joined_at, plan.duration_months))
}

/// Signed: negative once the plan has expired.
pub fn days_until_expiry(member: &Member, plans: &[Subscription], today: Date) -> Option<i64> {
    member_expiry(member, plans).map(|expiry| (expiry - today).whole_days())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Expiring,
    Expired,
}

impl StatusFilter {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "active" => StatusFilter::Active,
            "expiring" => StatusFilter::Expiring,
            "expired" => StatusFilter::Expired,
            _ => StatusFilter::All,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Active => "active",
            StatusFilter::Expiring => "expiring",
            StatusFilter::Expired => "expired",
        }
    }

    /// The expired tab also lists members past the grace window.
    pub fn matches(self, status: SubscriptionStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => status == SubscriptionStatus::Active,
            StatusFilter::Expiring => status == SubscriptionStatus::Expiring,
            StatusFilter::Expired => matches!(
                status,
                SubscriptionStatus::Expired | SubscriptionStatus::Inactive
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub total: usize,
    pub active: usize,
    pub expiring: usize,
    /// Expired and inactive together.
    pub expired: usize,
}

impl StatusCounts {
    pub fn tally(members: &[Member], plans: &[Subscription], today: Date) -> Self {
        members
            .iter()
            .fold(StatusCounts::default(), |mut counts, member| {
                counts.total += 1;
                match member_status(member, plans, today) {
                    SubscriptionStatus::Active => counts.active += 1,
                    SubscriptionStatus::Expiring => counts.expiring += 1,
                    SubscriptionStatus::Expired | SubscriptionStatus::Inactive => {
                        counts.expired += 1
                    }
                }
                counts
            })
    }
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::types::dates::parse_iso_date;

    fn date(raw: &str) -> Date {
        parse_iso_date(raw).expect("valid date")
    }

    fn member(subscription_id: Option<&str>, joined_at: &str) -> Member {
        Member {
            id: "m-1".to_string(),
            gym_id: "gym-001".to_string(),
            user_id: "u-1".to_string(),
            first_name: "Marco".to_string(),
            last_name: "Rossi".to_string(),
            email: "marco@example.com".to_string(),
            phone: None,
            subscription_id: subscription_id.map(str::to_string),
            enrolled_courses: Vec::new(),
            joined_at: date(joined_at),
        }
    }

    fn plan(id: &str, duration_months: u32) -> Subscription {
        Subscription {
            id: id.to_string(),
            gym_id: "gym-001".to_string(),
            name: "Monthly".to_string(),
            description: String::new(),
            price: 50.0,
            duration_months,
            max_entries: None,
        }
    }

    #[test]
    fn add_months__should_keep_day_of_month() {
        assert_eq!(add_months(date("2025-01-01"), 1), date("2025-02-01"));
        assert_eq!(add_months(date("2025-11-15"), 3), date("2026-02-15"));
        assert_eq!(add_months(date("2025-06-30"), 12), date("2026-06-30"));
    }

    #[test]
    fn add_months__should_overflow_short_months() {
        assert_eq!(add_months(date("2025-01-31"), 1), date("2025-03-03"));
        assert_eq!(add_months(date("2024-01-31"), 1), date("2024-03-02"));
    }

    #[test]
    fn status_for__should_follow_documented_example() {
        // Given
        let joined_at = date("2025-01-01");

        // Then
        assert_eq!(expiry_date(joined_at, 1), date("2025-02-01"));
        assert_eq!(
            status_for(joined_at, 1, date("2025-01-28")),
            SubscriptionStatus::Expiring
        );
        assert_eq!(
            status_for(joined_at, 1, date("2025-02-10")),
            SubscriptionStatus::Expired
        );
        assert_eq!(
            status_for(joined_at, 1, date("2025-02-20")),
            SubscriptionStatus::Inactive
        );
    }

    #[test]
    fn status_for__should_switch_exactly_at_boundaries() {
        // Given
        let joined_at = date("2025-01-01");

        // Then
        assert_eq!(
            status_for(joined_at, 1, date("2025-01-24")),
            SubscriptionStatus::Active
        );
        assert_eq!(
            status_for(joined_at, 1, date("2025-01-25")),
            SubscriptionStatus::Expiring
        );
        assert_eq!(
            status_for(joined_at, 1, date("2025-02-01")),
            SubscriptionStatus::Expiring
        );
        assert_eq!(
            status_for(joined_at, 1, date("2025-02-02")),
            SubscriptionStatus::Expired
        );
        assert_eq!(
            status_for(joined_at, 1, date("2025-02-15")),
            SubscriptionStatus::Expired
        );
        assert_eq!(
            status_for(joined_at, 1, date("2025-02-16")),
            SubscriptionStatus::Inactive
        );
    }

    #[test]
    fn status_for__should_progress_monotonically() {
        // Given
        let joined_at = date("2025-05-17");
        let rank = |status: SubscriptionStatus| match status {
            SubscriptionStatus::Active => 0,
            SubscriptionStatus::Expiring => 1,
            SubscriptionStatus::Expired => 2,
            SubscriptionStatus::Inactive => 3,
        };
        let mut today = joined_at;
        let mut previous = 0;

        // When / Then
        for _ in 0..200 {
            let current = rank(status_for(joined_at, 3, today));
            assert!(current >= previous, "status regressed on {today}");
            previous = current;
            today = today.next_day().expect("next day");
        }
        assert_eq!(previous, 3);
    }

    #[test]
    fn member_status__should_be_inactive_without_plan() {
        // Given
        let plans = vec![plan("sub-1", 1)];
        let today = date("2025-01-10");

        // Then
        assert_eq!(
            member_status(&member(None, "2025-01-01"), &plans, today),
            SubscriptionStatus::Inactive
        );
        assert_eq!(
            member_status(&member(Some("sub-missing"), "2025-01-01"), &plans, today),
            SubscriptionStatus::Inactive
        );
        assert_eq!(
            member_status(&member(Some("sub-1"), "2025-01-01"), &plans, today),
            SubscriptionStatus::Active
        );
    }

    #[test]
    fn status_filter__should_group_inactive_with_expired() {
        assert!(StatusFilter::Expired.matches(SubscriptionStatus::Inactive));
        assert!(StatusFilter::Expired.matches(SubscriptionStatus::Expired));
        assert!(!StatusFilter::Expired.matches(SubscriptionStatus::Expiring));
        assert!(StatusFilter::All.matches(SubscriptionStatus::Inactive));
        assert_eq!(StatusFilter::parse("bogus"), StatusFilter::All);
    }

    #[test]
    fn status_counts__should_tally_roster() {
        // Given
        let plans = vec![plan("sub-1", 1), plan("sub-12", 12)];
        let members = vec![
            member(Some("sub-12"), "2025-01-01"),
            member(Some("sub-1"), "2025-01-01"),
            member(Some("sub-1"), "2024-11-01"),
            member(None, "2025-01-01"),
        ];

        // When
        let counts = StatusCounts::tally(&members, &plans, date("2025-01-28"));

        // Then
        assert_eq!(
            counts,
            StatusCounts {
                total: 4,
                active: 1,
                expiring: 1,
                expired: 2,
            }
        );
    }

    #[test]
    fn days_until_expiry__should_be_negative_after_expiry() {
        // Given
        let plans = vec![plan("sub-1", 1)];
        let member = member(Some("sub-1"), "2025-01-01");

        // Then
        assert_eq!(
            days_until_expiry(&member, &plans, date("2025-01-28")),
            Some(4)
        );
        assert_eq!(
            days_until_expiry(&member, &plans, date("2025-02-03")),
            Some(-2)
        );
    }
}
