//! Execution Context
//!
//! Carries tracing IDs and the acting principal through a use case execution.

use chrono::{DateTime, Utc};
use tracing::Span;

use crate::shared::tsid::TsidGenerator;

/// Context for a use case execution.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    /// Unique ID for this execution (generated)
    pub execution_id: String,
    /// Correlation ID recorded on the span
    pub correlation_id: String,
    /// ID of the principal performing the action
    pub principal_id: String,
    /// When the execution was initiated
    pub initiated_at: DateTime<Utc>,
}

impl ExecutionContext {
    /// Create a context for a fresh request. The correlation ID is the
    /// execution ID.
    pub fn create(principal_id: impl Into<String>) -> Self {
        let exec_id = format!("exec-{}", TsidGenerator::generate());
        Self {
            execution_id: exec_id.clone(),
            correlation_id: exec_id,
            principal_id: principal_id.into(),
            initiated_at: Utc::now(),
        }
    }

    /// Span that every log line of the execution is recorded under.
    pub fn span(&self, operation: &'static str) -> Span {
        tracing::info_span!(
            "use_case",
            operation,
            execution_id = %self.execution_id,
            correlation_id = %self.correlation_id,
            principal_id = %self.principal_id,
        )
    }
}
