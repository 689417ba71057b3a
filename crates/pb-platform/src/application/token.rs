//! Application Token Generation
//!
//! Tokens are fixed-length alphanumeric strings drawn from the thread-local
//! CSPRNG. Uniqueness is checked against the record store before use; the
//! store's unique constraint on the token remains the final authority.

use std::future::Future;

use rand::{distributions::Alphanumeric, Rng};
use thiserror::Error;
use tracing::{debug, warn};

use crate::shared::error::PlatformError;

/// Default token length
pub const DEFAULT_TOKEN_LENGTH: usize = 24;

/// Default number of candidates tried before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 16;

#[derive(Error, Debug)]
pub enum TokenError {
    /// Every candidate collided. Either the token length is too short or the
    /// namespace is close to full.
    #[error("No unused token found after {attempts} attempts")]
    Exhausted { attempts: u32 },

    #[error("Token lookup failed: {0}")]
    Lookup(#[from] PlatformError),
}

/// Generate a random alphanumeric token of `length` characters.
pub fn generate_application_token(length: usize) -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(char::from)
        .collect()
}

/// Draw candidates from `generate` until `exists` reports one as unused.
///
/// A failing existence check aborts the loop; a lookup error is never read
/// as "unused".
pub async fn generate_unique_token<G, E, Fut>(
    mut generate: G,
    mut exists: E,
    max_attempts: u32,
) -> Result<String, TokenError>
where
    G: FnMut() -> String,
    E: FnMut(String) -> Fut,
    Fut: Future<Output = Result<bool, PlatformError>>,
{
    for attempt in 1..=max_attempts {
        let candidate = generate();

        if !exists(candidate.clone()).await? {
            debug!(attempt, "Generated unused application token");
            return Ok(candidate);
        }

        warn!(attempt, "Generated application token already in use, retrying");
    }

    Err(TokenError::Exhausted { attempts: max_attempts })
}

/// Token generation settings for the lifecycle use cases.
#[derive(Debug, Clone, Copy)]
pub struct TokenPolicy {
    pub length: usize,
    pub max_attempts: u32,
    /// Persist attempts when the store rejects a token as a duplicate
    pub persist_attempts: u32,
}

impl Default for TokenPolicy {
    fn default() -> Self {
        Self {
            length: DEFAULT_TOKEN_LENGTH,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            persist_attempts: 3,
        }
    }
}
