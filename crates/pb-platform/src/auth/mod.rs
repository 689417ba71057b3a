//! Authentication
//!
//! HTTP Basic credentials checked against stored Argon2id hashes.

pub mod password_service;
pub mod basic;

pub use password_service::{Argon2Config, PasswordService};
pub use basic::{AuthState, Authenticated};
