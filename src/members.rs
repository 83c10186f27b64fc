//! Gym roster.

use crate::store::{self, Collection, Store, StoreError};
use crate::types::Member;

use time::Date;

#[derive(Debug, thiserror::Error)]
pub enum MemberError {
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Editable member fields as submitted by a form.
#[derive(Debug, Clone, Default)]
pub struct MemberDraft {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: Option<String>,
}

impl MemberDraft {
    fn validated(self) -> Result<Self, MemberError> {
        let first_name = self.first_name.trim().to_string();
        let last_name = self.last_name.trim().to_string();
        let email = self.email.trim().to_string();
        if first_name.is_empty() || last_name.is_empty() {
            return Err(MemberError::Validation("First and last name are required."));
        }
        if !email.contains('@') {
            return Err(MemberError::Validation("Enter a valid email address."));
        }
        Ok(Self {
            first_name,
            last_name,
            email,
            phone: self
                .phone
                .map(|phone| phone.trim().to_string())
                .filter(|phone| !phone.is_empty()),
        })
    }
}

pub fn list(store: &Store, gym_id: &str) -> Result<Vec<Member>, StoreError> {
    let members: Vec<Member> = store.load(Collection::Members)?;
    Ok(members
        .into_iter()
        .filter(|member| member.gym_id == gym_id)
        .collect())
}

pub fn get(store: &Store, id: &str) -> Result<Option<Member>, StoreError> {
    let members: Vec<Member> = store.load(Collection::Members)?;
    Ok(members.into_iter().find(|member| member.id == id))
}

pub fn find_by_user(store: &Store, user_id: &str) -> Result<Option<Member>, StoreError> {
    let members: Vec<Member> = store.load(Collection::Members)?;
    Ok(members.into_iter().find(|member| member.user_id == user_id))
}

/// Adds a walk-in member at the top of the roster. Such members have no
/// account, so they get a detached user id.
pub fn add(
    store: &Store,
    gym_id: &str,
    draft: MemberDraft,
    subscription_id: Option<String>,
    today: Date,
) -> Result<Member, MemberError> {
    let draft = draft.validated()?;
    let member = Member {
        id: store::generate_id("m"),
        gym_id: gym_id.to_string(),
        user_id: store::generate_id("u"),
        first_name: draft.first_name,
        last_name: draft.last_name,
        email: draft.email,
        phone: draft.phone,
        subscription_id: subscription_id.filter(|id| !id.is_empty()),
        enrolled_courses: Vec::new(),
        joined_at: today,
    };

    store.update(Collection::Members, |members: &mut Vec<Member>| {
        members.insert(0, member.clone());
    })?;
    tracing::info!(member_id = %member.id, gym_id, "added member");
    Ok(member)
}

pub fn update(store: &Store, id: &str, draft: MemberDraft) -> Result<Option<Member>, MemberError> {
    let draft = draft.validated()?;
    let updated = store.update(Collection::Members, |members: &mut Vec<Member>| {
        let member = members.iter_mut().find(|member| member.id == id)?;
        member.first_name = draft.first_name;
        member.last_name = draft.last_name;
        member.email = draft.email;
        member.phone = draft.phone;
        Some(member.clone())
    })?;
    Ok(updated)
}

/// Sets or clears the member's plan. The join date is left as is, so the
/// new plan's duration counts from the original enrolment.
pub fn assign_plan(
    store: &Store,
    id: &str,
    subscription_id: Option<String>,
) -> Result<Option<Member>, StoreError> {
    store.update(Collection::Members, |members: &mut Vec<Member>| {
        let member = members.iter_mut().find(|member| member.id == id)?;
        member.subscription_id = subscription_id.filter(|id| !id.is_empty());
        Some(member.clone())
    })
}

pub fn delete(store: &Store, id: &str) -> Result<bool, StoreError> {
    store.update(Collection::Members, |members: &mut Vec<Member>| {
        let before = members.len();
        members.retain(|member| member.id != id);
        members.len() != before
    })
}

/// Case-insensitive substring match on first name, last name or email. A
/// blank query matches everyone.
pub fn search<'a>(members: &'a [Member], query: &str) -> Vec<&'a Member> {
    let needle = query.trim().to_lowercase();
    members
        .iter()
        .filter(|member| {
            needle.is_empty()
                || member.first_name.to_lowercase().contains(&needle)
                || member.last_name.to_lowercase().contains(&needle)
                || member.email.to_lowercase().contains(&needle)
        })
        .collect()
}
