//! Attendance panels for a member, derived from the weekly timetable.
//!
//! Lessons are not checked in individually: a session counts once its date has
//! passed on a day the member's timetable has lessons, and only from the day the
//! member joined. The timetable is the member's enrolled courses, or the whole
//! gym timetable when they are not enrolled in any course.

use crate::status::add_months;
use crate::types::{Course, DayOfWeek, Member};

use time::{Date, Month};

/// Months shown in the monthly attendance chart, current month included.
pub const MONTHS_SHOWN: u32 = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCount {
    pub year: i32,
    pub month: Month,
    pub sessions: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdayCount {
    pub day: DayOfWeek,
    pub lessons: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceSummary {
    pub enrolled_only: bool,
    /// Oldest month first.
    pub monthly: Vec<MonthCount>,
    /// Monday first.
    pub weekly: Vec<WeekdayCount>,
    pub this_month: u32,
    pub month_goal: u32,
}

pub fn member_timetable<'a>(member: &Member, courses: &'a [Course]) -> Vec<&'a Course> {
    let enrolled: Vec<&Course> = courses
        .iter()
        .filter(|course| {
            member.enrolled_courses.contains(&course.id)
                || course.enrolled_members.contains(&member.id)
        })
        .collect();
    if enrolled.is_empty() {
        courses.iter().collect()
    } else {
        enrolled
    }
}

pub fn weekly_distribution(courses: &[&Course]) -> Vec<WeekdayCount> {
    DayOfWeek::ALL
        .into_iter()
        .map(|day| WeekdayCount {
            day,
            lessons: courses
                .iter()
                .flat_map(|course| course.schedule.iter())
                .filter(|lesson| lesson.day == day)
                .count() as u32,
        })
        .collect()
}

/// Lessons on the timetable between `from` and `to`, both inclusive.
pub fn sessions_between(weekly: &[WeekdayCount], from: Date, to: Date) -> u32 {
    let mut total = 0;
    let mut current = Some(from);
    while let Some(date) = current.filter(|date| *date <= to) {
        let day = DayOfWeek::from(date.weekday());
        total += weekly
            .iter()
            .find(|count| count.day == day)
            .map(|count| count.lessons)
            .unwrap_or_default();
        current = date.next_day();
    }
    total
}

fn month_start(today: Date, months_back: u32) -> Option<Date> {
    let index = i64::from(today.year()) * 12 + i64::from(u8::from(today.month()))
        - 1
        - i64::from(months_back);
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    let month = Month::try_from((index.rem_euclid(12) + 1) as u8).ok()?;
    Date::from_calendar_date(year, month, 1).ok()
}

fn month_end(start: Date) -> Date {
    add_months(start, 1).previous_day().unwrap_or(start)
}

pub fn summarize(member: &Member, courses: &[Course], today: Date) -> AttendanceSummary {
    let timetable = member_timetable(member, courses);
    let enrolled_only = !member.enrolled_courses.is_empty()
        || courses
            .iter()
            .any(|course| course.enrolled_members.contains(&member.id));
    let weekly = weekly_distribution(&timetable);

    let monthly = (0..MONTHS_SHOWN)
        .rev()
        .filter_map(|months_back| month_start(today, months_back))
        .map(|start| {
            let from = start.max(member.joined_at);
            let to = month_end(start).min(today);
            MonthCount {
                year: start.year(),
                month: start.month(),
                sessions: sessions_between(&weekly, from, to),
            }
        })
        .collect();

    let (this_month, month_goal) = match month_start(today, 0) {
        Some(start) => {
            let from = start.max(member.joined_at);
            (
                sessions_between(&weekly, from, today),
                sessions_between(&weekly, from, month_end(start)),
            )
        }
        None => (0, 0),
    };

    AttendanceSummary {
        enrolled_only,
        monthly,
        weekly,
        this_month,
        month_goal,
    }
}
