//! Use Case Infrastructure
//!
//! - `UseCaseResult<T>` - result type for use case outcomes
//! - `UseCaseError` - classified errors (client vs server) for consistent handling
//! - `ExecutionContext` - tracing and principal context for use case execution

pub mod result;
pub mod error;
pub mod execution_context;

pub use result::UseCaseResult;
pub use error::{UseCaseError, ErrorClass};
pub use execution_context::ExecutionContext;
