//! Create Application Use Case
//!
//! Order of operations: generate a unique token, register on the bridge,
//! persist. A record never exists without a bridge identity; a failed
//! persist leaves an orphaned bridge registration that is logged for
//! operators.

use std::fmt::Display;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info, warn, Instrument};

use crate::{Application, NewApplication, PlatformError, User};
use crate::application::repository::ApplicationRepository;
use crate::application::token::{
    generate_application_token, generate_unique_token, TokenError, TokenPolicy,
};
use crate::bridge::ApplicationDispatcher;
use crate::details;
use crate::usecase::{ExecutionContext, UseCaseError, UseCaseResult};

/// Longest accepted application name, in characters
pub const MAX_NAME_LENGTH: usize = 255;

/// Command for creating a new application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateApplicationCommand {
    /// Human-readable name
    pub name: String,
}

/// Use case for creating a new application.
pub struct CreateApplicationUseCase<R: ApplicationRepository, D: ApplicationDispatcher> {
    application_repo: Arc<R>,
    dispatcher: Arc<D>,
    policy: TokenPolicy,
}

impl<R: ApplicationRepository, D: ApplicationDispatcher> CreateApplicationUseCase<R, D> {
    pub fn new(application_repo: Arc<R>, dispatcher: Arc<D>, policy: TokenPolicy) -> Self {
        Self {
            application_repo,
            dispatcher,
            policy,
        }
    }

    pub async fn execute(
        &self,
        command: CreateApplicationCommand,
        owner: &User,
        ctx: ExecutionContext,
    ) -> UseCaseResult<Application> {
        let span = ctx.span("create_application");
        self.run(command, owner).instrument(span).await
    }

    async fn run(&self, command: CreateApplicationCommand, owner: &User) -> UseCaseResult<Application> {
        // Validation: name is required
        let name = command.name.trim();
        if name.is_empty() {
            return UseCaseResult::failure(UseCaseError::validation(
                "NAME_REQUIRED",
                "Application name is required",
            ));
        }

        if name.chars().count() > MAX_NAME_LENGTH {
            return UseCaseResult::failure(UseCaseError::validation(
                "NAME_TOO_LONG",
                format!("Application name must be at most {} characters", MAX_NAME_LENGTH),
            ));
        }

        // No token can be generated; fail before anything is registered
        if self.policy.length == 0 {
            return UseCaseResult::failure(UseCaseError::exhausted(
                "Token length is zero, no application token can be generated",
            ));
        }

        let token = match self.unique_token().await {
            Ok(token) => token,
            Err(err) => return UseCaseResult::failure(err),
        };

        info!(user_id = owner.id, name, "Registering application on the bridge");

        let matrix_id = match self.dispatcher.register_application(name, &owner.matrix_id).await {
            Ok(matrix_id) if !matrix_id.is_empty() => matrix_id,
            Ok(_) => {
                warn!(user_id = owner.id, "Bridge returned an empty identifier");
                return UseCaseResult::failure(UseCaseError::dispatcher(
                    "BRIDGE_REGISTRATION_FAILED",
                    "Bridge registration returned no identifier",
                ));
            }
            Err(PlatformError::BridgeOutcomeUnknown { message }) => {
                error!(
                    user_id = owner.id,
                    owner_matrix_id = %owner.matrix_id,
                    error = %message,
                    "Bridge registration unconfirmed, a room may be orphaned"
                );
                return UseCaseResult::failure(UseCaseError::dispatcher_with_details(
                    "BRIDGE_REGISTRATION_UNCONFIRMED",
                    format!("Bridge registration outcome unknown: {}", message),
                    details! { "ownerMatrixId" => &owner.matrix_id },
                ));
            }
            Err(e) => {
                warn!(user_id = owner.id, error = %e, "Bridge registration failed");
                return UseCaseResult::failure(UseCaseError::dispatcher(
                    "BRIDGE_REGISTRATION_FAILED",
                    format!("Failed to register application on the bridge: {}", e),
                ));
            }
        };

        // From here on the bridge holds a registration; every failure is an orphan
        let pending = match NewApplication::new(name, token, owner.id, matrix_id.as_str()) {
            Ok(pending) => pending,
            Err(e) => return orphaned(&matrix_id, e),
        };

        self.persist(pending).await
    }

    /// Persist, swapping in a fresh token when the store reports the token as
    /// taken. The bridge registration is reused across attempts.
    async fn persist(&self, mut pending: NewApplication) -> UseCaseResult<Application> {
        let matrix_id = pending.matrix_id().to_string();
        let attempts = self.policy.persist_attempts.max(1);

        for attempt in 1..=attempts {
            match self.application_repo.create(pending.clone()).await {
                Ok(application) => {
                    info!(
                        application_id = %application.id,
                        matrix_id = %application.matrix_id,
                        user_id = application.user_id,
                        "Application created"
                    );
                    return UseCaseResult::success(application);
                }
                Err(e) if e.is_duplicate() && attempt < attempts => {
                    warn!(attempt, "Token taken at insert time, regenerating");

                    let token = match self.unique_token().await {
                        Ok(token) => token,
                        Err(err) => return orphaned(&matrix_id, err.message()),
                    };

                    pending = match pending.with_token(token) {
                        Ok(pending) => pending,
                        Err(e) => return orphaned(&matrix_id, e),
                    };
                }
                Err(e) => return orphaned(&matrix_id, e),
            }
        }

        orphaned(&matrix_id, "persist attempts exhausted")
    }

    async fn unique_token(&self) -> Result<String, UseCaseError> {
        let length = self.policy.length;
        let repo = &self.application_repo;

        generate_unique_token(
            || generate_application_token(length),
            |candidate| async move { repo.exists_by_token(&candidate).await },
            self.policy.max_attempts,
        )
        .await
        .map_err(|e| match e {
            TokenError::Exhausted { attempts } => UseCaseError::exhausted(format!(
                "No unused application token found after {} attempts",
                attempts
            )),
            TokenError::Lookup(e) => UseCaseError::store(
                "STORE_UNAVAILABLE",
                format!("Token lookup failed: {}", e),
            ),
        })
    }
}

fn orphaned<T>(matrix_id: &str, cause: impl Display) -> UseCaseResult<T> {
    error!(
        orphaned_matrix_id = %matrix_id,
        error = %cause,
        "Application registered on the bridge but not stored"
    );

    UseCaseResult::failure(UseCaseError::store_with_details(
        "ORPHANED_BRIDGE_REGISTRATION",
        format!("Application registered on the bridge but could not be stored: {}", cause),
        details! { "matrixId" => matrix_id },
    ))
}
