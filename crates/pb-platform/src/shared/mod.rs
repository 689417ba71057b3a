//! Shared Module
//!
//! Cross-cutting concerns and shared utilities.

pub mod error;
pub mod tsid;
pub mod indexes;

pub use error::{PlatformError, Result};
pub use tsid::TsidGenerator;
pub use indexes::initialize_indexes;
