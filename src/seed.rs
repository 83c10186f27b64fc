//! Demo data for a fresh data directory.
//!
//! Each collection is seeded independently, only when its key has never been
//! written, so deleting everything from a collection does not bring the demo
//! records back.

use crate::auth::{self, AuthError};
use crate::store::{Collection, Store, StoreError};
use crate::types::{
    Course, CourseSchedule, DayOfWeek, Gym, Instructor, Member, Sport, Subscription, User,
    UserRole,
};

use rand::Rng;
use rand::seq::SliceRandom;
use serde::Deserialize;
use time::{Duration, OffsetDateTime};

pub const DEMO_GYM_ID: &str = "gym-001";

const DEMO_FIXTURE: &str = include_str!("../seed/demo.toml");
const GENERATED_MEMBERS: usize = 15;

const FIRST_NAMES: [&str; 8] = [
    "Marco",
    "Luca",
    "Giulia",
    "Sofia",
    "Matteo",
    "Alessandro",
    "Francesca",
    "Chiara",
];
const LAST_NAMES: [&str; 8] = [
    "Rossi", "Bianchi", "Ferrari", "Esposito", "Ricci", "Marino", "Greco", "Bruno",
];
const EMAIL_DOMAINS: [&str; 4] = ["gmail.com", "outlook.it", "yahoo.com", "libero.it"];

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("invalid seed fixture: {0}")]
    Fixture(#[from] toml::de::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[derive(Debug, Deserialize)]
struct Fixture {
    users: Vec<SeedUser>,
    gyms: Vec<SeedGym>,
    subscriptions: Vec<SeedPlan>,
    courses: Vec<SeedCourse>,
    instructors: Vec<SeedInstructor>,
}

#[derive(Debug, Deserialize)]
struct SeedUser {
    id: String,
    email: String,
    first_name: String,
    last_name: String,
    role: UserRole,
    gym_id: Option<String>,
    password: String,
}

#[derive(Debug, Deserialize)]
struct SeedGym {
    id: String,
    name: String,
    address: String,
    sports: Vec<Sport>,
    invite_code: String,
    owner_id: String,
}

#[derive(Debug, Deserialize)]
struct SeedPlan {
    id: String,
    name: String,
    description: String,
    price: f64,
    duration_months: u32,
    max_entries: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct SeedCourse {
    id: String,
    name: String,
    description: String,
    instructor: String,
    sport: Sport,
    max_capacity: u32,
    schedule: Vec<SeedLesson>,
}

#[derive(Debug, Deserialize)]
struct SeedLesson {
    day: DayOfWeek,
    start_time: String,
    end_time: String,
}

#[derive(Debug, Deserialize)]
struct SeedInstructor {
    id: String,
    first_name: String,
    last_name: String,
    bio: Option<String>,
    specialties: Vec<Sport>,
    email: Option<String>,
    instagram: Option<String>,
}

pub fn ensure_seeded(store: &Store, now: OffsetDateTime) -> Result<Vec<Collection>, SeedError> {
    let mut rng = rand::thread_rng();
    ensure_seeded_with_rng(store, now, &mut rng)
}

pub(crate) fn ensure_seeded_with_rng<R: Rng>(
    store: &Store,
    now: OffsetDateTime,
    rng: &mut R,
) -> Result<Vec<Collection>, SeedError> {
    let fixture: Fixture = toml::from_str(DEMO_FIXTURE)?;
    let mut seeded = Vec::new();

    if !store.contains(Collection::Users) {
        let users = fixture
            .users
            .into_iter()
            .map(|user| {
                Ok(User {
                    id: user.id,
                    email: user.email,
                    first_name: user.first_name,
                    last_name: user.last_name,
                    role: user.role,
                    gym_id: user.gym_id,
                    phone: None,
                    birth_date: None,
                    password_hash: auth::hash_password(&user.password)?,
                    created_at: now,
                })
            })
            .collect::<Result<Vec<_>, AuthError>>()?;
        store.write(Collection::Users, &users)?;
        seeded.push(Collection::Users);
    }

    if !store.contains(Collection::Gyms) {
        let gyms: Vec<Gym> = fixture
            .gyms
            .into_iter()
            .map(|gym| Gym {
                id: gym.id,
                name: gym.name,
                address: gym.address,
                sports: gym.sports,
                invite_code: gym.invite_code,
                owner_id: gym.owner_id,
                created_at: now,
            })
            .collect();
        store.write(Collection::Gyms, &gyms)?;
        seeded.push(Collection::Gyms);
    }

    let plans: Vec<Subscription> = fixture
        .subscriptions
        .into_iter()
        .map(|plan| Subscription {
            id: plan.id,
            gym_id: DEMO_GYM_ID.to_string(),
            name: plan.name,
            description: plan.description,
            price: plan.price,
            duration_months: plan.duration_months,
            max_entries: plan.max_entries,
        })
        .collect();
    if !store.contains(Collection::Subscriptions) {
        store.write(Collection::Subscriptions, &plans)?;
        seeded.push(Collection::Subscriptions);
    }

    if !store.contains(Collection::Courses) {
        let courses: Vec<Course> = fixture
            .courses
            .into_iter()
            .map(|course| Course {
                id: course.id,
                gym_id: DEMO_GYM_ID.to_string(),
                name: course.name,
                sport: course.sport,
                instructor: course.instructor,
                description: course.description,
                schedule: course
                    .schedule
                    .into_iter()
                    .map(|lesson| CourseSchedule {
                        day: lesson.day,
                        start_time: lesson.start_time,
                        end_time: lesson.end_time,
                    })
                    .collect(),
                max_capacity: course.max_capacity,
                enrolled_members: Vec::new(),
            })
            .collect();
        store.write(Collection::Courses, &courses)?;
        seeded.push(Collection::Courses);
    }

    if !store.contains(Collection::Instructors) {
        let instructors: Vec<Instructor> = fixture
            .instructors
            .into_iter()
            .map(|instructor| Instructor {
                id: instructor.id,
                gym_id: DEMO_GYM_ID.to_string(),
                first_name: instructor.first_name,
                last_name: instructor.last_name,
                bio: instructor.bio,
                specialties: instructor.specialties,
                email: instructor.email,
                phone: None,
                instagram: instructor.instagram,
            })
            .collect();
        store.write(Collection::Instructors, &instructors)?;
        seeded.push(Collection::Instructors);
    }

    if !store.contains(Collection::Members) {
        let members = generate_members(rng, &plans, now, GENERATED_MEMBERS);
        store.write(Collection::Members, &members)?;
        seeded.push(Collection::Members);
    }

    for collection in &seeded {
        tracing::info!(collection = collection.key(), "seeded demo data");
    }

    Ok(seeded)
}

/// A roster with join dates spread over the last ~13 months so every status
/// shows up. The first record is the demo athlete's own membership.
pub(crate) fn generate_members<R: Rng>(
    rng: &mut R,
    plans: &[Subscription],
    now: OffsetDateTime,
    count: usize,
) -> Vec<Member> {
    let today = now.date();
    let mut members = Vec::with_capacity(count + 1);
    members.push(Member {
        id: "m-athlete".to_string(),
        gym_id: DEMO_GYM_ID.to_string(),
        user_id: "user-002".to_string(),
        first_name: "Luca".to_string(),
        last_name: "Bianchi".to_string(),
        email: "athlete@poundforpound.app".to_string(),
        phone: None,
        subscription_id: plans
            .iter()
            .max_by_key(|plan| plan.duration_months)
            .map(|plan| plan.id.clone()),
        enrolled_courses: Vec::new(),
        joined_at: today.saturating_sub(Duration::days(30)),
    });

    for index in 0..count {
        let first_name = FIRST_NAMES.choose(rng).copied().unwrap_or("Marco");
        let last_name = LAST_NAMES.choose(rng).copied().unwrap_or("Rossi");
        let domain = EMAIL_DOMAINS.choose(rng).copied().unwrap_or("gmail.com");
        let subscription_id = if rng.gen_bool(0.7) {
            plans.choose(rng).map(|plan| plan.id.clone())
        } else {
            None
        };
        let days_ago = rng.gen_range(0..400);

        members.push(Member {
            id: format!("m-mock-{index}"),
            gym_id: DEMO_GYM_ID.to_string(),
            user_id: format!("u-mock-{index}"),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!(
                "{}.{}@{domain}",
                first_name.to_lowercase(),
                last_name.to_lowercase()
            ),
            phone: Some(format!("3{}0 1234567", rng.gen_range(0..9))),
            subscription_id,
            enrolled_courses: Vec::new(),
            joined_at: today.saturating_sub(Duration::days(days_ago)),
        });
    }

    members
}
