//! Admin credential checks
//!
//! The shop has one administrator configured at startup, either with an
//! argon2 PHC hash (preferred) or a plain password from the environment.

use crate::core::error::{RepairError, RepairResult};
use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};

#[derive(Clone)]
pub enum PasswordCheck {
    /// argon2 PHC string
    Hash(String),
    Plain(String),
}

impl std::fmt::Debug for PasswordCheck {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordCheck::Hash(_) => f.write_str("PasswordCheck::Hash(..)"),
            PasswordCheck::Plain(_) => f.write_str("PasswordCheck::Plain(..)"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AdminAccount {
    pub username: String,
    check: PasswordCheck,
}

impl AdminAccount {
    pub fn new(username: impl Into<String>, check: PasswordCheck) -> Self {
        Self {
            username: username.into(),
            check,
        }
    }

    pub fn with_password(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::new(username, PasswordCheck::Plain(password.into()))
    }

    pub fn with_hash(username: impl Into<String>, hash: impl Into<String>) -> Self {
        Self::new(username, PasswordCheck::Hash(hash.into()))
    }

    /// Whether the pair matches the configured admin
    ///
    /// The password is always checked, even for a wrong username, so both
    /// failures take comparable time.
    pub fn verify(&self, username: &str, password: &str) -> bool {
        let password_ok = match &self.check {
            PasswordCheck::Hash(hash) => verify_password(password, hash),
            PasswordCheck::Plain(expected) => constant_time_eq(password.as_bytes(), expected.as_bytes()),
        };
        let username_ok = constant_time_eq(username.as_bytes(), self.username.as_bytes());
        password_ok && username_ok
    }
}

/// argon2 PHC hash of `password` with a random salt
pub fn hash_password(password: &str) -> RepairResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| RepairError::Internal(format!("password hashing failed: {}", e)))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Whether `hash` parses as a PHC string
pub fn is_valid_hash(hash: &str) -> bool {
    PasswordHash::new(hash).is_ok()
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
