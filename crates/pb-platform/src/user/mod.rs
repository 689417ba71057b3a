//! User Aggregate
//!
//! Accounts that own applications and authenticate against the HTTP API.

pub mod entity;
pub mod repository;

pub use entity::User;
pub use repository::{UserRepository, MongoUserRepository, InMemoryUserRepository};
