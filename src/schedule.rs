//! Weekly schedule grid.
//!
//! Weeks start on Monday. A grid is seven consecutive calendar dates, each
//! tagged with its weekday so recurring course lessons can be placed on it.

use crate::types::{Course, DayOfWeek, Sport};

use serde::Serialize;
use time::macros::format_description;
use time::{Date, Duration, Month, Time};

pub const COURSE_COLORS: [&str; 4] = [
    "course-blue",
    "course-red",
    "course-blue-alt",
    "course-red-alt",
];

/// Monday of the week containing `date`; Sunday belongs to the week that
/// started six days earlier.
pub fn start_of_week(date: Date) -> Date {
    let offset = i64::from(date.weekday().number_days_from_monday());
    date.saturating_sub(Duration::days(offset))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekDay {
    pub date: Date,
    pub day: DayOfWeek,
    pub is_today: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeekGrid {
    start: Date,
    days: Vec<WeekDay>,
}

impl WeekGrid {
    pub fn build(reference: Date, today: Date) -> Self {
        let start = start_of_week(reference);
        let days = (0..7)
            .map(|offset| {
                let date = start.saturating_add(Duration::days(offset));
                WeekDay {
                    date,
                    day: DayOfWeek::from(date.weekday()),
                    is_today: date == today,
                }
            })
            .collect();
        Self { start, days }
    }

    /// The week containing the first day of `month`.
    pub fn for_month(year: i32, month: Month, today: Date) -> Option<Self> {
        let first = Date::from_calendar_date(year, month, 1).ok()?;
        Some(Self::build(first, today))
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn days(&self) -> &[WeekDay] {
        &self.days
    }

    pub fn previous(&self, today: Date) -> Self {
        Self::build(self.start.saturating_sub(Duration::days(7)), today)
    }

    pub fn next(&self, today: Date) -> Self {
        Self::build(self.start.saturating_add(Duration::days(7)), today)
    }

    /// Mid-week date; drives the month and year shown for the week.
    pub fn anchor(&self) -> Date {
        self.start.saturating_add(Duration::days(3))
    }

    pub fn contains(&self, date: Date) -> bool {
        self.days.iter().any(|day| day.date == date)
    }

    /// Today when it falls inside the week, otherwise Monday.
    pub fn default_selection(&self) -> WeekDay {
        self.days
            .iter()
            .find(|day| day.is_today)
            .copied()
            .unwrap_or(self.days[0])
    }

    pub fn day_for(&self, date: Date) -> Option<WeekDay> {
        self.days.iter().find(|day| day.date == date).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarSlot {
    pub course_id: String,
    pub name: String,
    pub instructor: String,
    pub sport: Sport,
    pub day: DayOfWeek,
    pub start_time: String,
    pub end_time: String,
    pub color: &'static str,
    pub enrolled: usize,
    pub capacity: u32,
}

impl CalendarSlot {
    pub fn fill_percent(&self) -> u32 {
        capacity_percent(self.enrolled, self.capacity)
    }

    pub fn duration_minutes(&self) -> Option<u16> {
        let start = parse_clock(&self.start_time)?;
        let end = parse_clock(&self.end_time)?;
        end.checked_sub(start)
    }
}

/// Lessons of every course on `day`, ordered by start time. Colours rotate by
/// course position so one course keeps one colour across the week.
pub fn daily_slots(courses: &[Course], day: DayOfWeek) -> Vec<CalendarSlot> {
    let mut slots: Vec<CalendarSlot> = courses
        .iter()
        .enumerate()
        .flat_map(|(index, course)| {
            let color = COURSE_COLORS[index % COURSE_COLORS.len()];
            course
                .schedule
                .iter()
                .filter(move |entry| entry.day == day)
                .map(move |entry| CalendarSlot {
                    course_id: course.id.clone(),
                    name: course.name.clone(),
                    instructor: course.instructor.clone(),
                    sport: course.sport,
                    day: entry.day,
                    start_time: entry.start_time.clone(),
                    end_time: entry.end_time.clone(),
                    color,
                    enrolled: course.enrolled_members.len(),
                    capacity: course.max_capacity,
                })
        })
        .collect();
    slots.sort_by(|a, b| a.start_time.cmp(&b.start_time));
    slots
}

pub fn capacity_percent(enrolled: usize, capacity: u32) -> u32 {
    if capacity == 0 {
        return 0;
    }
    let percent = (enrolled as f64 / f64::from(capacity) * 100.0).round();
    percent.min(100.0) as u32
}

/// Minutes since midnight for a `HH:mm` time.
pub fn parse_clock(raw: &str) -> Option<u16> {
    let time = Time::parse(raw.trim(), format_description!("[hour]:[minute]")).ok()?;
    Some(u16::from(time.hour()) * 60 + u16::from(time.minute()))
}

#[cfg(test)]
#[allow(non_snake_case)]
mod tests {
    use super::*;
    use crate::types::CourseSchedule;
    use crate::types::dates::parse_iso_date;

    fn date(raw: &str) -> Date {
        parse_iso_date(raw).expect("valid date")
    }

    fn course(id: &str, entries: &[(DayOfWeek, &str, &str)]) -> Course {
        Course {
            id: id.to_string(),
            gym_id: "gym-001".to_string(),
            name: format!("Course {id}"),
            sport: Sport::Boxing,
            instructor: "Marco Rossi".to_string(),
            description: String::new(),
            schedule: entries
                .iter()
                .map(|(day, start, end)| CourseSchedule {
                    day: *day,
                    start_time: start.to_string(),
                    end_time: end.to_string(),
                })
                .collect(),
            max_capacity: 20,
            enrolled_members: vec!["m-1".to_string(), "m-2".to_string()],
        }
    }

    #[test]
    fn start_of_week__should_map_sunday_to_previous_monday() {
        assert_eq!(start_of_week(date("2025-01-05")), date("2024-12-30"));
        assert_eq!(start_of_week(date("2025-01-06")), date("2025-01-06"));
        assert_eq!(start_of_week(date("2025-01-09")), date("2025-01-06"));
    }

    #[test]
    fn build__should_yield_seven_consecutive_days_from_monday() {
        // Given
        let today = date("2025-01-08");

        for offset in 0..7 {
            let reference = date("2025-01-06").saturating_add(Duration::days(offset));

            // When
            let grid = WeekGrid::build(reference, today);

            // Then
            let days = grid.days();
            assert_eq!(days.len(), 7);
            assert_eq!(days[0].date, date("2025-01-06"));
            assert_eq!(days[0].day, DayOfWeek::Monday);
            assert_eq!(days[6].day, DayOfWeek::Sunday);
            for pair in days.windows(2) {
                assert_eq!(pair[1].date, pair[0].date.next_day().expect("next day"));
            }
            assert_eq!(days.iter().filter(|day| day.is_today).count(), 1);
            assert!(days[2].is_today);
        }
    }

    #[test]
    fn default_selection__should_prefer_today_then_monday() {
        // Given
        let today = date("2025-01-08");
        let current = WeekGrid::build(today, today);
        let following = current.next(today);

        // Then
        assert_eq!(current.default_selection().date, today);
        assert_eq!(following.default_selection().date, date("2025-01-13"));
        assert_eq!(following.previous(today), current);
    }

    #[test]
    fn for_month__should_start_on_week_of_first_day() {
        // When
        let grid = WeekGrid::for_month(2025, Month::March, date("2025-01-08")).expect("grid");

        // Then
        assert_eq!(grid.start(), date("2025-02-24"));
        assert_eq!(grid.anchor(), date("2025-02-27"));
        assert!(grid.contains(date("2025-03-01")));
    }

    #[test]
    fn daily_slots__should_filter_by_day_and_sort_by_start() {
        // Given
        let courses = vec![
            course(
                "c-001",
                &[
                    (DayOfWeek::Monday, "19:00", "20:30"),
                    (DayOfWeek::Wednesday, "19:00", "20:30"),
                ],
            ),
            course("c-002", &[(DayOfWeek::Monday, "18:00", "19:00")]),
            course("c-003", &[(DayOfWeek::Tuesday, "07:00", "08:00")]),
        ];

        // When
        let slots = daily_slots(&courses, DayOfWeek::Monday);

        // Then
        assert_eq!(slots.len(), 2);
        assert_eq!(slots[0].course_id, "c-002");
        assert_eq!(slots[0].color, "course-red");
        assert_eq!(slots[1].course_id, "c-001");
        assert_eq!(slots[1].color, "course-blue");
        assert_eq!(slots[1].duration_minutes(), Some(90));
        assert_eq!(slots[1].fill_percent(), 10);
    }

    #[test]
    fn daily_slots__should_be_idempotent_and_stable() {
        // Given
        let courses = vec![
            course("c-001", &[(DayOfWeek::Friday, "18:00", "19:00")]),
            course("c-002", &[(DayOfWeek::Friday, "18:00", "19:30")]),
            course("c-003", &[(DayOfWeek::Friday, "10:30", "12:00")]),
        ];

        // When
        let first = daily_slots(&courses, DayOfWeek::Friday);
        let second = daily_slots(&courses, DayOfWeek::Friday);

        // Then
        assert_eq!(first, second);
        let ids: Vec<&str> = first.iter().map(|slot| slot.course_id.as_str()).collect();
        assert_eq!(ids, vec!["c-003", "c-001", "c-002"]);
    }

    #[test]
    fn parse_clock__should_validate_hh_mm() {
        assert_eq!(parse_clock("18:30"), Some(18 * 60 + 30));
        assert_eq!(parse_clock("00:00"), Some(0));
        assert_eq!(parse_clock("24:00"), None);
        assert_eq!(parse_clock("9:00"), None);
        assert_eq!(parse_clock("18-30"), None);
        assert_eq!(parse_clock("+9:00"), None);
        assert_eq!(parse_clock("+09:00"), None);
        assert_eq!(parse_clock("09:00:00"), None);
    }

    #[test]
    fn capacity_percent__should_clamp_and_handle_zero() {
        assert_eq!(capacity_percent(5, 0), 0);
        assert_eq!(capacity_percent(30, 20), 100);
        assert_eq!(capacity_percent(3, 12), 25);
    }
}
