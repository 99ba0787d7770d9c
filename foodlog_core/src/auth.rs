//! API key authentication.
//!
//! Keys look like `flr_<43 random chars>`. Only a SHA-256 digest is kept:
//! the first 32 hex characters double as the user id and storage key, so a
//! plaintext key is never written anywhere.

use crate::logging::short_id;
use crate::{Error, FoodLogStore, Result, User};
use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use sha2::{Digest, Sha256};

/// Prefix identifying FoodLogr keys
pub const API_KEY_PREFIX: &str = "flr_";

/// Minimum accepted key length, prefix included
pub const MIN_API_KEY_LEN: usize = 40;

const RANDOM_PART_LEN: usize = 43;
const USER_ID_LEN: usize = 32;

/// Generate a new random API key
pub fn generate_api_key() -> String {
    let random_part: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(RANDOM_PART_LEN)
        .map(char::from)
        .collect();
    format!("{}{}", API_KEY_PREFIX, random_part)
}

/// Hash an API key into the user id it maps to
pub fn hash_api_key(api_key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(api_key.as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..USER_ID_LEN].to_string()
}

/// Cheap structural check before touching storage
pub fn validate_api_key_format(api_key: &str) -> bool {
    !api_key.is_empty() && api_key.starts_with(API_KEY_PREFIX) && api_key.len() >= MIN_API_KEY_LEN
}

/// Registers users and resolves API keys against a store
pub struct AuthClient<'a, S: FoodLogStore> {
    store: &'a S,
}

impl<'a, S: FoodLogStore> AuthClient<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Register a new user and return `(api_key, user_id)`
    ///
    /// The key is returned exactly once and cannot be recovered later.
    pub fn register_user(&self, email: &str) -> Result<(String, String)> {
        let email = email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::Validation("Valid email is required".into()));
        }

        tracing::info!("Registering new user: {}", email);

        let api_key = generate_api_key();
        let user_id = hash_api_key(&api_key);
        let user = User {
            email: email.to_string(),
            api_key_hash: user_id.clone(),
            created_at: Utc::now(),
        };
        self.store.save_user(&user_id, &user)?;

        tracing::info!("User registered successfully: {}", short_id(&user_id));
        Ok((api_key, user_id))
    }

    /// Resolve an API key to its user id
    pub fn validate_api_key(&self, api_key: &str) -> Result<String> {
        if !validate_api_key_format(api_key) {
            tracing::warn!("Invalid API key format");
            return Err(Error::Unauthorized("Invalid API key format".into()));
        }

        let user_id = hash_api_key(api_key);
        if self.user_exists(&user_id)? {
            tracing::debug!("API key validated for user: {}", short_id(&user_id));
            Ok(user_id)
        } else {
            tracing::warn!("API key not found");
            Err(Error::Unauthorized("Unknown API key".into()))
        }
    }

    pub fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        self.store.get_user(user_id)
    }

    pub fn user_exists(&self, user_id: &str) -> Result<bool> {
        Ok(self.store.get_user(user_id)?.is_some())
    }
}
