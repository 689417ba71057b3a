//! Applications API
//!
//! - `POST /application` creates an application for the acting user
//! - `DELETE /application/:id` deletes one of the acting user's applications
//! - `GET /application` lists the acting user's applications

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::Application;
use crate::application::operations::{
    CreateApplicationCommand, CreateApplicationUseCase,
    DeleteApplicationCommand, DeleteApplicationUseCase,
};
use crate::application::repository::ApplicationRepository;
use crate::application::token::TokenPolicy;
use crate::auth::Authenticated;
use crate::bridge::ApplicationDispatcher;
use crate::shared::error::PlatformError;
use crate::usecase::{ExecutionContext, UseCaseError, UseCaseResult};

/// Create application request
#[derive(Debug, Deserialize)]
pub struct CreateApplicationRequest {
    /// A missing name is reported by the use case like an empty one
    #[serde(default)]
    pub name: String,
}

/// Application response DTO
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationResponse {
    pub id: String,
    pub name: String,
    pub token: String,
    pub user_id: u64,
    pub matrix_id: String,
}

impl From<Application> for ApplicationResponse {
    fn from(a: Application) -> Self {
        Self {
            id: a.id,
            name: a.name,
            token: a.token,
            user_id: a.user_id,
            matrix_id: a.matrix_id,
        }
    }
}

pub struct ApplicationsState<R: ApplicationRepository, D: ApplicationDispatcher> {
    pub application_repo: Arc<R>,
    pub create_use_case: Arc<CreateApplicationUseCase<R, D>>,
    pub delete_use_case: Arc<DeleteApplicationUseCase<R, D>>,
}

impl<R: ApplicationRepository, D: ApplicationDispatcher> Clone for ApplicationsState<R, D> {
    fn clone(&self) -> Self {
        Self {
            application_repo: self.application_repo.clone(),
            create_use_case: self.create_use_case.clone(),
            delete_use_case: self.delete_use_case.clone(),
        }
    }
}

impl<R: ApplicationRepository, D: ApplicationDispatcher> ApplicationsState<R, D> {
    pub fn new(
        application_repo: Arc<R>,
        dispatcher: Arc<D>,
        policy: TokenPolicy,
    ) -> Self {
        Self {
            create_use_case: Arc::new(CreateApplicationUseCase::new(
                application_repo.clone(),
                dispatcher.clone(),
                policy,
            )),
            delete_use_case: Arc::new(DeleteApplicationUseCase::new(
                application_repo.clone(),
                dispatcher,
            )),
            application_repo,
        }
    }
}

/// Create a new application
pub async fn create_application<R, D>(
    State(state): State<ApplicationsState<R, D>>,
    auth: Authenticated,
    Json(req): Json<CreateApplicationRequest>,
) -> Result<Json<ApplicationResponse>, UseCaseError>
where
    R: ApplicationRepository + 'static,
    D: ApplicationDispatcher + 'static,
{
    let command = CreateApplicationCommand { name: req.name };
    let ctx = ExecutionContext::create(auth.principal_id());

    match state.create_use_case.execute(command, &auth.0, ctx).await {
        UseCaseResult::Success(application) => Ok(Json(application.into())),
        UseCaseResult::Failure(err) => Err(err),
    }
}

/// Delete an application owned by the acting user
pub async fn delete_application<R, D>(
    State(state): State<ApplicationsState<R, D>>,
    auth: Authenticated,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, UseCaseError>
where
    R: ApplicationRepository + 'static,
    D: ApplicationDispatcher + 'static,
{
    let ctx = ExecutionContext::create(auth.principal_id());

    match state.delete_use_case.execute_for(DeleteApplicationCommand { id }, &auth.0, ctx).await {
        UseCaseResult::Success(_) => Ok(Json(serde_json::json!({}))),
        UseCaseResult::Failure(err) => Err(err),
    }
}

/// List the acting user's applications
pub async fn list_applications<R, D>(
    State(state): State<ApplicationsState<R, D>>,
    auth: Authenticated,
) -> Result<Json<Vec<ApplicationResponse>>, PlatformError>
where
    R: ApplicationRepository + 'static,
    D: ApplicationDispatcher + 'static,
{
    let applications = state.application_repo.find_by_user(auth.id).await?;
    Ok(Json(applications.into_iter().map(ApplicationResponse::from).collect()))
}

/// Create applications router
pub fn applications_router<R, D>(state: ApplicationsState<R, D>) -> Router
where
    R: ApplicationRepository + 'static,
    D: ApplicationDispatcher + 'static,
{
    Router::new()
        .route("/application", post(create_application::<R, D>).get(list_applications::<R, D>))
        .route("/application/:id", delete(delete_application::<R, D>))
        .with_state(state)
}
