// Generated account identities

use std::ops::RangeInclusive;

use rand::Rng;

use crate::api::{LoginRequest, RegisterRequest, DEFAULT_PASSWORD};

/// Prefix of the account each simulated user logs in with
pub const USER_PREFIX: &str = "loaduser";

/// Prefix of throwaway accounts created by the register task
pub const NEW_USER_PREFIX: &str = "loadnew";

/// Prefix of accounts created to be added as contacts
pub const CONTACT_PREFIX: &str = "contact";

pub const IDENTIFIER_DOMAIN: &str = "test.com";

/// Ten-digit numeric suffix
const SUFFIX_RANGE: RangeInclusive<u64> = 1_000_000_000..=9_999_999_999;

/// Build a login identifier like `loaduser4821937710@test.com`
pub fn generate_identifier<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    let suffix = rng.gen_range(SUFFIX_RANGE);
    format!("{}{}@{}", prefix, suffix, IDENTIFIER_DOMAIN)
}

/// Login credentials of one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub identifier: String,
    pub password: String,
}

impl Credentials {
    /// Fresh identifier with the shared password
    pub fn generate<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> Self {
        Self {
            identifier: generate_identifier(prefix, rng),
            password: DEFAULT_PASSWORD.to_string(),
        }
    }

    pub fn register_request(&self, name: &str) -> RegisterRequest {
        RegisterRequest {
            name: name.to_string(),
            identifier: self.identifier.clone(),
            password: self.password.clone(),
        }
    }

    pub fn login_request(&self) -> LoginRequest {
        LoginRequest {
            identifier: self.identifier.clone(),
            password: self.password.clone(),
        }
    }
}
