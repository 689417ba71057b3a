//! Shared infrastructure for the Pushbridge crates.

pub mod logging;
