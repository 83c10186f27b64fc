use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

pub mod dates;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Manager,
    Athlete,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Manager => "manager",
            UserRole::Athlete => "athlete",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "manager" => Some(UserRole::Manager),
            "athlete" => Some(UserRole::Athlete),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sport {
    Boxing,
    Kickboxing,
    Mma,
    Muaythai,
    Bjj,
}

impl Sport {
    pub const ALL: [Sport; 5] = [
        Sport::Boxing,
        Sport::Kickboxing,
        Sport::Mma,
        Sport::Muaythai,
        Sport::Bjj,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Sport::Boxing => "boxing",
            Sport::Kickboxing => "kickboxing",
            Sport::Mma => "mma",
            Sport::Muaythai => "muaythai",
            Sport::Bjj => "bjj",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Sport::Boxing => "Boxing",
            Sport::Kickboxing => "Kickboxing",
            Sport::Mma => "MMA",
            Sport::Muaythai => "Muay Thai",
            Sport::Bjj => "BJJ",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Sport::ALL
            .into_iter()
            .find(|sport| sport.as_str() == raw.trim())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayOfWeek {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl DayOfWeek {
    pub const ALL: [DayOfWeek; 7] = [
        DayOfWeek::Monday,
        DayOfWeek::Tuesday,
        DayOfWeek::Wednesday,
        DayOfWeek::Thursday,
        DayOfWeek::Friday,
        DayOfWeek::Saturday,
        DayOfWeek::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "monday",
            DayOfWeek::Tuesday => "tuesday",
            DayOfWeek::Wednesday => "wednesday",
            DayOfWeek::Thursday => "thursday",
            DayOfWeek::Friday => "friday",
            DayOfWeek::Saturday => "saturday",
            DayOfWeek::Sunday => "sunday",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "Monday",
            DayOfWeek::Tuesday => "Tuesday",
            DayOfWeek::Wednesday => "Wednesday",
            DayOfWeek::Thursday => "Thursday",
            DayOfWeek::Friday => "Friday",
            DayOfWeek::Saturday => "Saturday",
            DayOfWeek::Sunday => "Sunday",
        }
    }

    pub fn short_label(self) -> &'static str {
        match self {
            DayOfWeek::Monday => "MON",
            DayOfWeek::Tuesday => "TUE",
            DayOfWeek::Wednesday => "WED",
            DayOfWeek::Thursday => "THU",
            DayOfWeek::Friday => "FRI",
            DayOfWeek::Saturday => "SAT",
            DayOfWeek::Sunday => "SUN",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        DayOfWeek::ALL
            .into_iter()
            .find(|day| day.as_str() == raw.trim())
    }
}

impl From<time::Weekday> for DayOfWeek {
    fn from(weekday: time::Weekday) -> Self {
        match weekday {
            time::Weekday::Monday => DayOfWeek::Monday,
            time::Weekday::Tuesday => DayOfWeek::Tuesday,
            time::Weekday::Wednesday => DayOfWeek::Wednesday,
            time::Weekday::Thursday => DayOfWeek::Thursday,
            time::Weekday::Friday => DayOfWeek::Friday,
            time::Weekday::Saturday => DayOfWeek::Saturday,
            time::Weekday::Sunday => DayOfWeek::Sunday,
        }
    }
}

/// Lifecycle state of a member's plan. Always derived, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
    Expiring,
    Expired,
    Inactive,
}

impl SubscriptionStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "active",
            SubscriptionStatus::Expiring => "expiring",
            SubscriptionStatus::Expired => "expired",
            SubscriptionStatus::Inactive => "inactive",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SubscriptionStatus::Active => "Active",
            SubscriptionStatus::Expiring => "Expiring",
            SubscriptionStatus::Expired => "Expired",
            SubscriptionStatus::Inactive => "Inactive",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: UserRole,
    pub gym_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, with = "iso_date::option")]
    pub birth_date: Option<Date>,
    pub password_hash: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Gym {
    pub id: String,
    pub name: String,
    pub address: String,
    pub sports: Vec<Sport>,
    pub invite_code: String,
    pub owner_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    pub gym_id: String,
    pub user_id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub subscription_id: Option<String>,
    #[serde(default)]
    pub enrolled_courses: Vec<String>,
    #[serde(with = "iso_date")]
    pub joined_at: Date,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    pub fn initials(&self) -> String {
        self.first_name
            .chars()
            .take(1)
            .chain(self.last_name.chars().take(1))
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// A plan a gym sells; members reference it by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub id: String,
    pub gym_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: f64,
    pub duration_months: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSchedule {
    pub day: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub gym_id: String,
    pub name: String,
    pub sport: Sport,
    pub instructor: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub schedule: Vec<CourseSchedule>,
    pub max_capacity: u32,
    #[serde(default)]
    pub enrolled_members: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Instructor {
    pub id: String,
    pub gym_id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub specialties: Vec<Sport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
}

impl Instructor {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Warning,
    Info,
}

impl NotificationKind {
    pub fn as_str(self) -> &'static str {
        match self {
            NotificationKind::Success => "success",
            NotificationKind::Warning => "warning",
            NotificationKind::Info => "info",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub title: String,
    pub message: String,
    pub kind: NotificationKind,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub read: bool,
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn member__should_round_trip_camel_case_json() {
        // Given
        let raw = r#"{
            "id": "m-1",
            "gymId": "gym-001",
            "userId": "u-1",
            "firstName": "Sofia",
            "lastName": "Greco",
            "email": "sofia.greco@example.com",
            "subscriptionId": null,
            "joinedAt": "2025-03-14"
        }"#;

        // When
        let member: Member = serde_json::from_str(raw).expect("parse member");
        let encoded = serde_json::to_value(&member).expect("encode member");

        // Then
        assert_eq!(
            member.joined_at,
            Date::from_calendar_date(2025, Month::March, 14).unwrap()
        );
        assert!(member.enrolled_courses.is_empty());
        assert_eq!(encoded["joinedAt"], "2025-03-14");
        assert_eq!(encoded["subscriptionId"], serde_json::Value::Null);
        assert!(encoded.get("phone").is_none());
    }

    #[test]
    fn user__should_read_optional_birth_date_and_rfc3339_timestamp() {
        // Given
        let raw = r#"{
            "id": "user-9",
            "email": "nina@example.com",
            "firstName": "Nina",
            "lastName": "Conti",
            "role": "athlete",
            "gymId": null,
            "birthDate": "1998-07-21",
            "passwordHash": "hash",
            "createdAt": "2025-02-10T09:30:00Z"
        }"#;

        // When
        let user: User = serde_json::from_str(raw).expect("parse user");
        let encoded = serde_json::to_value(&user).expect("encode user");

        // Then
        assert_eq!(
            user.birth_date,
            Some(Date::from_calendar_date(1998, Month::July, 21).unwrap())
        );
        assert_eq!(user.created_at.hour(), 9);
        assert_eq!(encoded["birthDate"], "1998-07-21");
        assert_eq!(encoded["createdAt"], "2025-02-10T09:30:00Z");
    }

    #[test]
    fn user__should_reject_unpadded_birth_date() {
        // Given
        let raw = r#"{
            "id": "user-9",
            "email": "nina@example.com",
            "firstName": "Nina",
            "lastName": "Conti",
            "role": "athlete",
            "gymId": null,
            "birthDate": "1998-7-21",
            "passwordHash": "hash",
            "createdAt": "2025-02-10T09:30:00Z"
        }"#;

        // Then
        assert!(serde_json::from_str::<User>(raw).is_err());
    }

    #[test]
    fn member_initials__should_uppercase_first_letters() {
        // Given
        let member = Member {
            id: "m-1".to_string(),
            gym_id: "gym-001".to_string(),
            user_id: "u-1".to_string(),
            first_name: "luca".to_string(),
            last_name: "bruno".to_string(),
            email: "luca@example.com".to_string(),
            phone: None,
            subscription_id: None,
            enrolled_courses: Vec::new(),
            joined_at: Date::from_calendar_date(2025, Month::January, 1).unwrap(),
        };

        // Then
        assert_eq!(member.initials(), "LB");
    }

    #[test]
    fn day_of_week__should_map_from_weekday() {
        assert_eq!(DayOfWeek::from(time::Weekday::Sunday), DayOfWeek::Sunday);
        assert_eq!(DayOfWeek::from(time::Weekday::Monday), DayOfWeek::Monday);
        assert_eq!(DayOfWeek::parse("friday"), Some(DayOfWeek::Friday));
        assert_eq!(DayOfWeek::parse("funday"), None);
    }

    #[test]
    fn sport__should_parse_lowercase_names() {
        assert_eq!(Sport::parse("muaythai"), Some(Sport::Muaythai));
        assert_eq!(Sport::parse("curling"), None);
    }
}
