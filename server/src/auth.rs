//! Session and credential helpers. Session state holds nothing but the user
//! id; every core operation receives the owner explicitly, so this is the
//! only place that touches ambient request state.

use actix_session::{Session, SessionInsertError};
use uuid::Uuid;

const USER_ID_KEY: &str = "user_id";

/// The authenticated user for this request, if any.
pub fn current_user(session: &Session) -> Option<Uuid> {
    session.get::<Uuid>(USER_ID_KEY).ok().flatten()
}

pub fn log_in(session: &Session, user_id: Uuid) -> Result<(), SessionInsertError> {
    session.insert(USER_ID_KEY, user_id)
}

pub fn log_out(session: &Session) {
    session.purge();
}

pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    bcrypt::hash(password, bcrypt::DEFAULT_COST)
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(password, hash).unwrap_or(false)
}
