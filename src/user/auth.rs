use anyhow::{anyhow, Result};
use argon2::password_hash::{PasswordHash, PasswordVerifier, SaltString};
use argon2::{Argon2, PasswordHasher as _};
use base64::prelude::{Engine, BASE64_STANDARD_NO_PAD};
use rand::distr::Alphanumeric;
use rand::Rng;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const SESSION_TOKEN_LENGTH: usize = 64;

/// Opaque bearer token handed out at login and stored server side.
pub fn generate_session_token() -> String {
    rand::rng()
        .sample_iter(&Alphanumeric)
        .take(SESSION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// The hashing scheme is stored next to each credential so it can be
/// migrated per user if the default ever changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordHasher {
    Argon2,
}

impl PasswordHasher {
    pub fn generate_b64_salt(&self) -> String {
        let bytes: [u8; 16] = rand::rng().random();
        BASE64_STANDARD_NO_PAD.encode(bytes)
    }

    pub fn hash(&self, password: &str, b64_salt: &str) -> Result<String> {
        match self {
            PasswordHasher::Argon2 => {
                let salt = SaltString::from_b64(b64_salt)
                    .map_err(|e| anyhow!("Invalid salt: {e}"))?;
                let hash = Argon2::default()
                    .hash_password(password.as_bytes(), &salt)
                    .map_err(|e| anyhow!("Failed to hash password: {e}"))?;
                Ok(hash.to_string())
            }
        }
    }

    pub fn verify(&self, password: &str, stored_hash: &str) -> bool {
        match self {
            PasswordHasher::Argon2 => match PasswordHash::new(stored_hash) {
                Ok(parsed) => Argon2::default()
                    .verify_password(password.as_bytes(), &parsed)
                    .is_ok(),
                Err(_) => false,
            },
        }
    }
}

impl Display for PasswordHasher {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordHasher::Argon2 => write!(f, "argon2"),
        }
    }
}

impl FromStr for PasswordHasher {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "argon2" => Ok(PasswordHasher::Argon2),
            _ => Err(anyhow!("Unknown password hasher <{s}>")),
        }
    }
}
