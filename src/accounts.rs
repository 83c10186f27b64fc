//! User accounts and gym membership.

use crate::auth::{self, AuthError};
use crate::store::{self, Collection, Store, StoreError};
use crate::types::{Gym, Member, Sport, User, UserRole};

use rand::Rng;
use time::{Date, OffsetDateTime};

pub const MIN_PASSWORD_LEN: usize = 8;
pub const INVITE_CODE_LEN: usize = 7;

const INVITE_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("an account with this email already exists")]
    EmailTaken,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("user not found")]
    UserNotFound,
    #[error("invalid invite code")]
    InvalidInviteCode,
    #[error("{0}")]
    Validation(&'static str),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Auth(#[from] AuthError),
}

#[derive(Debug, Clone)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub birth_date: Option<Date>,
}

#[derive(Debug, Clone)]
pub struct NewGym {
    pub name: String,
    pub address: String,
    pub sports: Vec<Sport>,
}

pub fn validate_new_password(password: &str, confirmation: &str) -> Result<(), AccountError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::Validation(
            "Password must be at least 8 characters.",
        ));
    }
    if password != confirmation {
        return Err(AccountError::Validation("Passwords do not match."));
    }
    Ok(())
}

fn normalize_email(raw: &str) -> Result<String, AccountError> {
    let email = raw.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => {
            Ok(email.to_string())
        }
        _ => Err(AccountError::Validation("Enter a valid email address.")),
    }
}

fn required(raw: &str, message: &'static str) -> Result<String, AccountError> {
    let value = raw.trim();
    if value.is_empty() {
        return Err(AccountError::Validation(message));
    }
    Ok(value.to_string())
}

/// Creates an account. The email is unique regardless of case; the role is
/// fixed from here on.
pub fn register(
    store: &Store,
    registration: Registration,
    now: OffsetDateTime,
) -> Result<User, AccountError> {
    let first_name = required(&registration.first_name, "First name is required.")?;
    let last_name = required(&registration.last_name, "Last name is required.")?;
    let email = normalize_email(&registration.email)?;
    if registration.password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AccountError::Validation(
            "Password must be at least 8 characters.",
        ));
    }

    let user = User {
        id: store::generate_id("user"),
        email,
        first_name,
        last_name,
        role: registration.role,
        gym_id: None,
        phone: None,
        birth_date: None,
        password_hash: auth::hash_password(&registration.password)?,
        created_at: now,
    };

    let user = store.update(Collection::Users, |users: &mut Vec<User>| {
        if users
            .iter()
            .any(|existing| existing.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(AccountError::EmailTaken);
        }
        users.push(user.clone());
        Ok(user)
    })??;

    tracing::info!(user_id = %user.id, role = user.role.as_str(), "registered user");
    Ok(user)
}

pub fn authenticate(store: &Store, email: &str, password: &str) -> Result<User, AccountError> {
    let email = email.trim();
    let users: Vec<User> = store.load(Collection::Users)?;
    let user = users
        .into_iter()
        .find(|user| user.email.eq_ignore_ascii_case(email))
        .ok_or(AccountError::InvalidCredentials)?;

    if !auth::verify_password(password, &user.password_hash) {
        return Err(AccountError::InvalidCredentials);
    }
    Ok(user)
}

pub fn find_user(store: &Store, user_id: &str) -> Result<Option<User>, StoreError> {
    let users: Vec<User> = store.load(Collection::Users)?;
    Ok(users.into_iter().find(|user| user.id == user_id))
}

pub fn update_profile(
    store: &Store,
    user_id: &str,
    update: ProfileUpdate,
) -> Result<User, AccountError> {
    let first_name = required(&update.first_name, "First name is required.")?;
    let last_name = required(&update.last_name, "Last name is required.")?;
    let phone = update
        .phone
        .map(|phone| phone.trim().to_string())
        .filter(|phone| !phone.is_empty());

    store.update(Collection::Users, |users: &mut Vec<User>| {
        let user = users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or(AccountError::UserNotFound)?;
        user.first_name = first_name;
        user.last_name = last_name;
        user.phone = phone;
        user.birth_date = update.birth_date;
        Ok(user.clone())
    })?
}

pub fn change_password(
    store: &Store,
    user_id: &str,
    current: &str,
    new_password: &str,
    confirmation: &str,
) -> Result<(), AccountError> {
    validate_new_password(new_password, confirmation)?;
    let password_hash = auth::hash_password(new_password)?;

    store.update(Collection::Users, |users: &mut Vec<User>| {
        let user = users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or(AccountError::UserNotFound)?;
        if !auth::verify_password(current, &user.password_hash) {
            return Err(AccountError::InvalidCredentials);
        }
        user.password_hash = password_hash;
        Ok(())
    })?
}

pub fn find_gym(store: &Store, gym_id: &str) -> Result<Option<Gym>, StoreError> {
    let gyms: Vec<Gym> = store.load(Collection::Gyms)?;
    Ok(gyms.into_iter().find(|gym| gym.id == gym_id))
}

pub fn generate_invite_code<R: Rng>(rng: &mut R) -> String {
    (0..INVITE_CODE_LEN)
        .map(|_| {
            let index = rng.gen_range(0..INVITE_CODE_ALPHABET.len());
            char::from(INVITE_CODE_ALPHABET[index])
        })
        .collect()
}

/// Creates a gym owned by `owner_id` and links the owner to it.
pub fn create_gym(
    store: &Store,
    owner_id: &str,
    new_gym: NewGym,
    now: OffsetDateTime,
) -> Result<Gym, AccountError> {
    let name = required(&new_gym.name, "Gym name is required.")?;
    let address = new_gym.address.trim().to_string();

    let owner = find_user(store, owner_id)?.ok_or(AccountError::UserNotFound)?;
    if owner.role != UserRole::Manager {
        return Err(AccountError::Validation("Only managers can create a gym."));
    }

    let gym = store.update(Collection::Gyms, |gyms: &mut Vec<Gym>| {
        let mut rng = rand::thread_rng();
        let mut invite_code = generate_invite_code(&mut rng);
        while gyms
            .iter()
            .any(|gym| gym.invite_code.eq_ignore_ascii_case(&invite_code))
        {
            invite_code = generate_invite_code(&mut rng);
        }
        let gym = Gym {
            id: store::generate_id("gym"),
            name,
            address,
            sports: new_gym.sports,
            invite_code,
            owner_id: owner.id.clone(),
            created_at: now,
        };
        gyms.push(gym.clone());
        gym
    })?;

    link_user_to_gym(store, &owner.id, &gym.id)?;
    tracing::info!(gym_id = %gym.id, owner_id = %owner.id, "created gym");
    Ok(gym)
}

/// Links an athlete to the gym behind `invite_code` and adds them to its
/// roster, without a plan.
pub fn join_gym(
    store: &Store,
    user_id: &str,
    invite_code: &str,
    today: Date,
) -> Result<Gym, AccountError> {
    let invite_code = invite_code.trim();
    if invite_code.is_empty() {
        return Err(AccountError::InvalidInviteCode);
    }
    let gyms: Vec<Gym> = store.load(Collection::Gyms)?;
    let gym = gyms
        .into_iter()
        .find(|gym| gym.invite_code.eq_ignore_ascii_case(invite_code))
        .ok_or(AccountError::InvalidInviteCode)?;

    let user = link_user_to_gym(store, user_id, &gym.id)?;

    store.update(Collection::Members, |members: &mut Vec<Member>| {
        if members
            .iter()
            .any(|member| member.user_id == user.id && member.gym_id == gym.id)
        {
            return;
        }
        members.insert(
            0,
            Member {
                id: store::generate_id("m"),
                gym_id: gym.id.clone(),
                user_id: user.id.clone(),
                first_name: user.first_name.clone(),
                last_name: user.last_name.clone(),
                email: user.email.clone(),
                phone: user.phone.clone(),
                subscription_id: None,
                enrolled_courses: Vec::new(),
                joined_at: today,
            },
        );
    })?;

    tracing::info!(gym_id = %gym.id, user_id = %user.id, "athlete joined gym");
    Ok(gym)
}

fn link_user_to_gym(store: &Store, user_id: &str, gym_id: &str) -> Result<User, AccountError> {
    store.update(Collection::Users, |users: &mut Vec<User>| {
        let user = users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or(AccountError::UserNotFound)?;
        user.gym_id = Some(gym_id.to_string());
        Ok(user.clone())
    })?
}
