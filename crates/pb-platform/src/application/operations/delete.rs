//! Delete Application Use Case
//!
//! Deregistration runs before the record is removed. A failed deregistration
//! leaves the record intact so the delete can be retried; a failed removal
//! after a successful deregistration is logged and is safe to retry, since
//! the bridge treats an unknown room as already gone.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn, Instrument};

use crate::{PlatformError, User};
use crate::application::repository::ApplicationRepository;
use crate::bridge::ApplicationDispatcher;
use crate::details;
use crate::usecase::{ExecutionContext, UseCaseError, UseCaseResult};

/// Command for deleting an application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteApplicationCommand {
    pub id: String,
}

/// Acknowledgement of a completed delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplicationDeleted {
    pub id: String,
}

/// Use case for deleting an application.
pub struct DeleteApplicationUseCase<R: ApplicationRepository, D: ApplicationDispatcher> {
    application_repo: Arc<R>,
    dispatcher: Arc<D>,
}

impl<R: ApplicationRepository, D: ApplicationDispatcher> DeleteApplicationUseCase<R, D> {
    pub fn new(application_repo: Arc<R>, dispatcher: Arc<D>) -> Self {
        Self {
            application_repo,
            dispatcher,
        }
    }

    pub async fn execute(
        &self,
        command: DeleteApplicationCommand,
        ctx: ExecutionContext,
    ) -> UseCaseResult<ApplicationDeleted> {
        let span = ctx.span("delete_application");
        self.run(command, None).instrument(span).await
    }

    /// Delete on behalf of `actor`. An application the actor does not own
    /// is reported as missing unless the actor is an admin.
    pub async fn execute_for(
        &self,
        command: DeleteApplicationCommand,
        actor: &User,
        ctx: ExecutionContext,
    ) -> UseCaseResult<ApplicationDeleted> {
        let span = ctx.span("delete_application");
        self.run(command, Some(actor)).instrument(span).await
    }

    async fn run(
        &self,
        command: DeleteApplicationCommand,
        actor: Option<&User>,
    ) -> UseCaseResult<ApplicationDeleted> {
        let application = match self.application_repo.find_by_id(&command.id).await {
            Ok(Some(application)) if may_delete(actor, application.user_id) => application,
            Ok(Some(_)) => {
                debug!(application_id = %command.id, "Application owned by another user");
                return not_found(command.id);
            }
            Ok(None) => return not_found(command.id),
            Err(e) => {
                warn!(application_id = %command.id, error = %e, "Application lookup failed");
                return UseCaseResult::failure(UseCaseError::store(
                    "STORE_UNAVAILABLE",
                    format!("Failed to load application: {}", e),
                ));
            }
        };

        info!(
            application_id = %application.id,
            matrix_id = %application.matrix_id,
            "Deregistering application from the bridge"
        );

        match self.dispatcher.deregister_application(&application.matrix_id).await {
            Ok(()) => {}
            Err(PlatformError::BridgeEntityGone { .. }) => {
                debug!(matrix_id = %application.matrix_id, "Bridge entity already gone");
            }
            Err(e) => {
                warn!(matrix_id = %application.matrix_id, error = %e, "Bridge deregistration failed");
                return UseCaseResult::failure(UseCaseError::dispatcher_with_details(
                    "BRIDGE_DEREGISTRATION_FAILED",
                    format!("Failed to deregister application from the bridge: {}", e),
                    details! { "id" => &application.id, "matrixId" => &application.matrix_id },
                ));
            }
        }

        match self.application_repo.delete(&application).await {
            Ok(()) => {}
            // Removed concurrently; the outcome is the same
            Err(PlatformError::NotFound { .. }) => {
                debug!(application_id = %application.id, "Record already removed");
            }
            Err(e) => {
                error!(
                    application_id = %application.id,
                    deregistered_matrix_id = %application.matrix_id,
                    error = %e,
                    "Application deregistered from the bridge but record not removed"
                );
                return UseCaseResult::failure(UseCaseError::store_with_details(
                    "RECORD_DELETE_AFTER_DEREGISTRATION_FAILED",
                    format!("Application deregistered but its record could not be removed: {}", e),
                    details! { "id" => &application.id, "matrixId" => &application.matrix_id },
                ));
            }
        }

        info!(application_id = %application.id, "Application deleted");
        UseCaseResult::success(ApplicationDeleted { id: application.id })
    }
}

fn may_delete(actor: Option<&User>, owner_id: u64) -> bool {
    actor.map_or(true, |actor| actor.is_admin || actor.id == owner_id)
}

fn not_found(id: String) -> UseCaseResult<ApplicationDeleted> {
    UseCaseResult::failure(UseCaseError::not_found_with_details(
        "APPLICATION_NOT_FOUND",
        format!("Application with ID '{}' not found", id),
        details! { "id" => id },
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acknowledgement_serialization() {
        let ack = ApplicationDeleted { id: "0HZXEQ5Y8JY5Z".to_string() };
        assert_eq!(serde_json::to_string(&ack).unwrap(), r#"{"id":"0HZXEQ5Y8JY5Z"}"#);
    }
}
