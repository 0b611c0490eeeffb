//! Session - the hardcoded credential check and the login flag kept in storage.

use thiserror::Error;

use crate::storage::{KeyValueStore, StorageError};

const LOGGED_IN_KEY: &str = "isLoggedIn";
const USERNAME_KEY: &str = "username";

/// Where a user lands after logging in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Landing {
    Dashboard,
    Home,
}

const ACCOUNTS: [(&str, &str, Landing); 2] = [
    ("admin", "password", Landing::Dashboard),
    ("user", "123456", Landing::Home),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub landing: Landing,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub fn login<S: KeyValueStore + ?Sized>(
    store: &S,
    username: &str,
    password: &str,
) -> Result<Session, AuthError> {
    let landing = ACCOUNTS
        .iter()
        .find(|(user, pass, _)| *user == username && *pass == password)
        .map(|(_, _, landing)| *landing)
        .ok_or(AuthError::InvalidCredentials)?;

    store.set(LOGGED_IN_KEY, "true")?;
    store.set(USERNAME_KEY, username)?;
    log::info!("user {} logged in", username);

    Ok(Session {
        username: username.to_string(),
        landing,
    })
}

pub fn logout<S: KeyValueStore + ?Sized>(store: &S) -> Result<(), StorageError> {
    store.remove(LOGGED_IN_KEY)?;
    store.remove(USERNAME_KEY)?;
    Ok(())
}

/// Name of the logged-in user, if the login flag is set.
pub fn current_user<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<String>, StorageError> {
    if store.get(LOGGED_IN_KEY)?.as_deref() != Some("true") {
        return Ok(None);
    }
    store.get(USERNAME_KEY)
}
