//! Use Case Result Type

use super::error::UseCaseError;

/// Outcome of a lifecycle use case.
///
/// Callers outside the crate can only observe a `Success`; it is produced
/// once every collaborator step of the operation has completed.
pub enum UseCaseResult<T> {
    Success(T),
    Failure(UseCaseError),
}

impl<T> UseCaseResult<T> {
    pub fn failure(error: UseCaseError) -> Self {
        UseCaseResult::Failure(error)
    }

    pub(crate) fn success(value: T) -> Self {
        UseCaseResult::Success(value)
    }

    pub fn into_result(self) -> Result<T, UseCaseError> {
        match self {
            UseCaseResult::Success(v) => Ok(v),
            UseCaseResult::Failure(e) => Err(e),
        }
    }

    /// Panics with the error's code and message on failure.
    pub fn unwrap(self) -> T {
        match self.into_result() {
            Ok(v) => v,
            Err(e) => panic!("Use case failed: {}", e),
        }
    }

    /// Panics on success.
    pub fn unwrap_err(self) -> UseCaseError {
        match self {
            UseCaseResult::Success(_) => panic!("Use case succeeded, expected a failure"),
            UseCaseResult::Failure(e) => e,
        }
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for UseCaseResult<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UseCaseResult::Success(v) => f.debug_tuple("Success").field(v).finish(),
            UseCaseResult::Failure(e) => f.debug_tuple("Failure").field(e).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_into_result() {
        let result = UseCaseResult::success("!room:example.org".to_string());
        assert_eq!(result.into_result().unwrap(), "!room:example.org");
    }

    #[test]
    fn test_failure_keeps_error() {
        let result: UseCaseResult<()> =
            UseCaseResult::failure(UseCaseError::not_found("APPLICATION_NOT_FOUND", "missing"));
        assert_eq!(result.unwrap_err().code(), "APPLICATION_NOT_FOUND");
    }

    #[test]
    #[should_panic(expected = "Use case failed")]
    fn test_unwrap_on_failure_panics() {
        let result: UseCaseResult<()> =
            UseCaseResult::failure(UseCaseError::store("STORE_UNAVAILABLE", "down"));
        result.unwrap();
    }
}
