//! Courses and their recurring weekly lessons.

use crate::schedule::parse_clock;
use crate::store::{self, Collection, Store, StoreError};
use crate::types::{Course, CourseSchedule, DayOfWeek, Sport};

pub const DEFAULT_CAPACITY: u32 = 20;

const LEGACY_ID_PREFIX: &str = "course-";
const ID_PREFIX: &str = "c-";

#[derive(Debug, thiserror::Error)]
pub enum CourseError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default)]
pub struct CourseDraft {
    pub name: String,
    pub instructor: String,
    pub description: String,
    pub sport: Option<Sport>,
    pub max_capacity: Option<u32>,
}

impl CourseDraft {
    fn validated(self) -> Result<Self, CourseError> {
        let name = self.name.trim().to_string();
        let instructor = self.instructor.trim().to_string();
        if name.is_empty() || instructor.is_empty() {
            return Err(CourseError::Validation(
                "Course name and instructor are required.",
            ));
        }
        Ok(Self {
            name,
            instructor,
            description: self.description.trim().to_string(),
            sport: self.sport,
            max_capacity: self.max_capacity.filter(|capacity| *capacity > 0),
        })
    }
}

/// Checks `HH:mm` times and that the lesson ends after it starts.
pub fn validate_lesson(lesson: &CourseSchedule) -> Result<(), CourseError> {
    let start = parse_clock(&lesson.start_time)
        .ok_or(CourseError::Validation("Start time must be HH:mm."))?;
    let end =
        parse_clock(&lesson.end_time).ok_or(CourseError::Validation("End time must be HH:mm."))?;
    if end <= start {
        return Err(CourseError::Validation(
            "A lesson must end after it starts.",
        ));
    }
    Ok(())
}

/// Ids saved by older builds used a `course-` prefix.
fn matches_id(course: &Course, id: &str) -> bool {
    if course.id == id {
        return true;
    }
    match id.strip_prefix(LEGACY_ID_PREFIX) {
        Some(rest) => course.id == format!("{ID_PREFIX}{rest}"),
        None => false,
    }
}

pub fn list(store: &Store, gym_id: &str) -> Result<Vec<Course>, StoreError> {
    let courses: Vec<Course> = store.load(Collection::Courses)?;
    Ok(courses
        .into_iter()
        .filter(|course| course.gym_id == gym_id)
        .collect())
}

pub fn get(store: &Store, id: &str) -> Result<Option<Course>, StoreError> {
    let courses: Vec<Course> = store.load(Collection::Courses)?;
    Ok(courses.into_iter().find(|course| matches_id(course, id)))
}

pub fn add(
    store: &Store,
    gym_id: &str,
    draft: CourseDraft,
    schedule: Vec<CourseSchedule>,
) -> Result<Course, CourseError> {
    let draft = draft.validated()?;
    for lesson in &schedule {
        validate_lesson(lesson)?;
    }
    let course = Course {
        id: store::generate_id("c"),
        gym_id: gym_id.to_string(),
        name: draft.name,
        sport: draft.sport.unwrap_or(Sport::Boxing),
        instructor: draft.instructor,
        description: draft.description,
        schedule,
        max_capacity: draft.max_capacity.unwrap_or(DEFAULT_CAPACITY),
        enrolled_members: Vec::new(),
    };
    store.update(Collection::Courses, |courses: &mut Vec<Course>| {
        courses.push(course.clone());
    })?;
    tracing::info!(course_id = %course.id, gym_id, "added course");
    Ok(course)
}

/// Replaces the course details; lessons and enrolments are kept.
pub fn update(store: &Store, id: &str, draft: CourseDraft) -> Result<Option<Course>, CourseError> {
    let draft = draft.validated()?;
    let updated = store.update(Collection::Courses, |courses: &mut Vec<Course>| {
        let course = courses.iter_mut().find(|course| matches_id(course, id))?;
        course.name = draft.name;
        course.instructor = draft.instructor;
        course.description = draft.description;
        if let Some(sport) = draft.sport {
            course.sport = sport;
        }
        if let Some(capacity) = draft.max_capacity {
            course.max_capacity = capacity;
        }
        Some(course.clone())
    })?;
    Ok(updated)
}

pub fn delete(store: &Store, id: &str) -> Result<bool, StoreError> {
    store.update(Collection::Courses, |courses: &mut Vec<Course>| {
        let before = courses.len();
        courses.retain(|course| !matches_id(course, id));
        courses.len() != before
    })
}

/// `false` when the course does not exist.
pub fn add_lesson(
    store: &Store,
    course_id: &str,
    lesson: CourseSchedule,
) -> Result<bool, CourseError> {
    validate_lesson(&lesson)?;
    let added = store.update(Collection::Courses, |courses: &mut Vec<Course>| {
        match courses
            .iter_mut()
            .find(|course| matches_id(course, course_id))
        {
            Some(course) => {
                course.schedule.push(lesson);
                true
            }
            None => false,
        }
    })?;
    Ok(added)
}

/// Swaps the lesson identified by `day` and `start_time` for `lesson`, leaving
/// the course's other lessons untouched.
pub fn replace_lesson(
    store: &Store,
    course_id: &str,
    day: DayOfWeek,
    start_time: &str,
    lesson: CourseSchedule,
) -> Result<bool, CourseError> {
    validate_lesson(&lesson)?;
    let replaced = store.update(Collection::Courses, |courses: &mut Vec<Course>| {
        let Some(course) = courses
            .iter_mut()
            .find(|course| matches_id(course, course_id))
        else {
            return false;
        };
        match course
            .schedule
            .iter_mut()
            .find(|entry| entry.day == day && entry.start_time == start_time)
        {
            Some(entry) => {
                *entry = lesson;
                true
            }
            None => false,
        }
    })?;
    Ok(replaced)
}

/// `true` when a lesson was removed.
pub fn delete_lesson(
    store: &Store,
    course_id: &str,
    day: DayOfWeek,
    start_time: &str,
) -> Result<bool, StoreError> {
    store.update(Collection::Courses, |courses: &mut Vec<Course>| {
        let Some(course) = courses
            .iter_mut()
            .find(|course| matches_id(course, course_id))
        else {
            return false;
        };
        let before = course.schedule.len();
        course
            .schedule
            .retain(|entry| !(entry.day == day && entry.start_time == start_time));
        course.schedule.len() != before
    })
}
