use crate::store::{self, Collection, Store, StoreError};
use crate::types::{Instructor, Sport};

#[derive(Debug, thiserror::Error)]
pub enum InstructorError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug, Clone, Default)]
pub struct InstructorDraft {
    pub first_name: String,
    pub last_name: String,
    pub bio: Option<String>,
    pub specialties: Vec<Sport>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub instagram: Option<String>,
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl InstructorDraft {
    fn validated(self) -> Result<Self, InstructorError> {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(InstructorError::Validation(
                "First and last name are required.",
            ));
        }
        let email = optional(self.email);
        if email.as_deref().is_some_and(|email| !email.contains('@')) {
            return Err(InstructorError::Validation("Enter a valid email address."));
        }
        let mut specialties = self.specialties;
        specialties.dedup();
        Ok(Self {
            first_name,
            last_name,
            bio: optional(self.bio),
            specialties,
            email,
            phone: optional(self.phone),
            instagram: optional(self.instagram),
        })
    }
}

pub fn list(store: &Store, gym_id: &str) -> Result<Vec<Instructor>, StoreError> {
    let instructors: Vec<Instructor> = store.load(Collection::Instructors)?;
    Ok(instructors
        .into_iter()
        .filter(|instructor| instructor.gym_id == gym_id)
        .collect())
}

pub fn get(store: &Store, id: &str) -> Result<Option<Instructor>, StoreError> {
    let instructors: Vec<Instructor> = store.load(Collection::Instructors)?;
    Ok(instructors.into_iter().find(|instructor| instructor.id == id))
}

pub fn add(
    store: &Store,
    gym_id: &str,
    draft: InstructorDraft,
) -> Result<Instructor, InstructorError> {
    let draft = draft.validated()?;
    let instructor = Instructor {
        id: store::generate_id("inst"),
        gym_id: gym_id.to_string(),
        first_name: draft.first_name,
        last_name: draft.last_name,
        bio: draft.bio,
        specialties: draft.specialties,
        email: draft.email,
        phone: draft.phone,
        instagram: draft.instagram,
    };
    store.update(Collection::Instructors, |instructors: &mut Vec<Instructor>| {
        instructors.insert(0, instructor.clone());
    })?;
    tracing::info!(instructor_id = %instructor.id, gym_id, "added instructor");
    Ok(instructor)
}

pub fn update(
    store: &Store,
    id: &str,
    draft: InstructorDraft,
) -> Result<Option<Instructor>, InstructorError> {
    let draft = draft.validated()?;
    let updated = store.update(Collection::Instructors, |instructors: &mut Vec<Instructor>| {
        let instructor = instructors
            .iter_mut()
            .find(|instructor| instructor.id == id)?;
        instructor.first_name = draft.first_name;
        instructor.last_name = draft.last_name;
        instructor.bio = draft.bio;
        instructor.specialties = draft.specialties;
        instructor.email = draft.email;
        instructor.phone = draft.phone;
        instructor.instagram = draft.instagram;
        Some(instructor.clone())
    })?;
    Ok(updated)
}

pub fn delete(store: &Store, id: &str) -> Result<bool, StoreError> {
    store.update(Collection::Instructors, |instructors: &mut Vec<Instructor>| {
        let before = instructors.len();
        instructors.retain(|instructor| instructor.id != id);
        instructors.len() != before
    })
}
