//! Messaging Bridge
//!
//! Registers applications as addressable entities on the bridge and removes
//! them again.

pub mod matrix;

use async_trait::async_trait;

use crate::shared::error::Result;

pub use matrix::{MatrixDispatcher, MatrixDispatcherConfig};

#[async_trait]
pub trait ApplicationDispatcher: Send + Sync {
    /// Register an application owned by `owner_matrix_id` and return the
    /// identifier the bridge assigned to it. An accepted request whose answer
    /// cannot be read is `PlatformError::BridgeOutcomeUnknown`.
    async fn register_application(&self, name: &str, owner_matrix_id: &str) -> Result<String>;

    /// Remove a registration. An entity the bridge no longer knows is reported
    /// either as `Ok(())` or as `PlatformError::BridgeEntityGone`.
    async fn deregister_application(&self, matrix_id: &str) -> Result<()>;
}
