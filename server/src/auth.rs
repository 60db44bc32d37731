//! HTTP Basic access control.

use axum::http::{header, HeaderMap};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::error::ApiError;

/// Access role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    User,
    Admin,
}

/// A configured account.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub role: Role,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            role,
        }
    }
}

/// Checks Basic credentials against the configured accounts.
#[derive(Debug, Clone)]
pub struct AuthManager {
    users: Vec<Credentials>,
}

impl AuthManager {
    pub fn new(users: Vec<Credentials>) -> Self {
        Self { users }
    }

    /// Resolve the caller's role from the `Authorization` header.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Role, ApiError> {
        let value = headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or(ApiError::Unauthorized)?;

        let (username, password) = decode_basic(value).ok_or(ApiError::Unauthorized)?;

        self.users
            .iter()
            .find(|u| u.username == username && u.password == password)
            .map(|u| u.role)
            .ok_or(ApiError::Unauthorized)
    }

    /// Require at least `role`. Unknown callers get 401, known callers lacking
    /// the role get 403.
    pub fn require(&self, headers: &HeaderMap, role: Role) -> Result<(), ApiError> {
        let granted = self.authenticate(headers)?;
        if granted >= role {
            Ok(())
        } else {
            Err(ApiError::Forbidden)
        }
    }
}

fn decode_basic(value: &str) -> Option<(String, String)> {
    let (scheme, encoded) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = BASE64.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
