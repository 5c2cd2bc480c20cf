use anyhow::anyhow;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::Redirect;
use pbkdf2::password_hash::rand_core::OsRng;
use pbkdf2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use pbkdf2::{Pbkdf2, pbkdf2_hmac};
use sha2::Sha256;
use thiserror::Error;
use tower_sessions::Session;
use tower_sessions::cookie::Key;

use crate::state::AppState;
use crate::store::{StoreError, User};
use crate::views::encode_query_value;

const USER_ID_KEY: &str = "user_id";

const MAX_USERNAME_LEN: usize = 20;
const MAX_EMAIL_LEN: usize = 120;

const SESSION_KEY_CONTEXT: &[u8] = b"matchday.session-cookie";
const SESSION_KEY_ROUNDS: u32 = 100_000;

pub const LOGIN_FAILED_MESSAGE: &str = "Login unsuccessful. Please check username and password";
pub const TAKEN_MESSAGE: &str = "Username or email already taken";

#[derive(Debug, Error)]
pub enum RegisterError {
    #[error("{0}")]
    Invalid(&'static str),

    #[error("username or email already taken")]
    Taken,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Error)]
pub enum LoginError {
    #[error("invalid username or password")]
    BadCredentials,

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub fn hash_password(plaintext: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Pbkdf2
        .hash_password(plaintext.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|err| anyhow!("password hashing failed: {err}"))
}

/// False on mismatch and on a stored value that is not a valid PHC string.
pub fn verify_password(plaintext: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Pbkdf2.verify_password(plaintext.as_bytes(), &parsed).is_ok()
}

/// Stretch the configured secret into the 64-byte signing key the session
/// cookie layer wants.
pub fn derive_session_key(secret: &str) -> Key {
    let mut bytes = [0u8; 64];
    pbkdf2_hmac::<Sha256>(
        secret.as_bytes(),
        SESSION_KEY_CONTEXT,
        SESSION_KEY_ROUNDS,
        &mut bytes,
    );
    Key::from(&bytes)
}

/// A post-login redirect target must stay on this site: an absolute path,
/// but not a protocol-relative `//host` URL.
pub fn is_local_path(target: &str) -> bool {
    target.starts_with('/') && !target.starts_with("//")
}

pub fn register(
    state: &AppState,
    username: &str,
    email: &str,
    password: &str,
) -> Result<User, RegisterError> {
    let username = username.trim();
    let email = email.trim();
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Err(RegisterError::Invalid("All fields are required"));
    }
    if username.chars().count() > MAX_USERNAME_LEN {
        return Err(RegisterError::Invalid("Username is too long"));
    }
    if email.chars().count() > MAX_EMAIL_LEN {
        return Err(RegisterError::Invalid("Email is too long"));
    }

    let hash = hash_password(password)?;
    match state.users.create_user(username, email, &hash) {
        Ok(user) => Ok(user),
        Err(StoreError::Duplicate) => Err(RegisterError::Taken),
        Err(err) => Err(RegisterError::Internal(err.into())),
    }
}

/// Verify credentials and bind the session to the user. Unknown usernames
/// and wrong passwords are indistinguishable to the caller.
pub async fn login(
    state: &AppState,
    session: &Session,
    username: &str,
    password: &str,
) -> Result<User, LoginError> {
    let user = state
        .users
        .find_by_username(username.trim())
        .map_err(|err| LoginError::Internal(err.into()))?;
    let Some(user) = user else {
        return Err(LoginError::BadCredentials);
    };
    if !verify_password(password, &user.password) {
        return Err(LoginError::BadCredentials);
    }

    // Fresh session id on privilege change.
    session
        .cycle_id()
        .await
        .map_err(|err| LoginError::Internal(err.into()))?;
    session
        .insert(USER_ID_KEY, user.id)
        .await
        .map_err(|err| LoginError::Internal(err.into()))?;
    Ok(user)
}

pub async fn logout(session: &Session) {
    // Idempotent: flushing an empty session is a no-op.
    let _ = session.flush().await;
}

pub async fn current_user(session: &Session, state: &AppState) -> Option<User> {
    let user_id = session.get::<i64>(USER_ID_KEY).await.ok().flatten()?;
    state.users.find_by_id(user_id).ok().flatten()
}

/// Extractor guarding every content route: resolves the session-bound user
/// or redirects to the login page, preserving the requested path as the
/// post-login target.
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = Redirect;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let requested = parts
            .uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        let redirect = Redirect::to(&format!("/login?next={}", encode_query_value(requested)));

        let Ok(session) = Session::from_request_parts(parts, state).await else {
            return Err(redirect);
        };
        match current_user(&session, state).await {
            Some(user) => Ok(AuthUser(user)),
            None => Err(redirect),
        }
    }
}
