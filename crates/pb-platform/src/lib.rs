//! Pushbridge Platform
//!
//! Lifecycle of notification-source applications:
//! - Collision-free token generation
//! - Bridge registration and deregistration (Matrix rooms)
//! - Record stores for applications and users (MongoDB, in-memory)
//! - Create and delete use cases with an explicit partial-failure policy
//! - HTTP API with Basic authentication
//!
//! ## Module Organization
//!
//! Each aggregate contains:
//! - `entity` - Domain entities
//! - `repository` - Data access
//! - `api` - REST endpoints
//! - `operations` - Use case operations (where applicable)

pub mod application;
pub mod user;
pub mod bridge;
pub mod auth;

// Shared infrastructure
pub mod shared;

// Cross-cutting concerns
pub mod usecase;
pub mod seed;

pub use shared::error::{PlatformError, Result};
pub use shared::tsid::TsidGenerator;

pub use usecase::{UseCaseResult, UseCaseError, ErrorClass, ExecutionContext};
// Note: details! macro is exported at crate root via #[macro_export]

pub use application::entity::{Application, NewApplication};
pub use user::entity::User;

pub use application::repository::{
    ApplicationRepository, MongoApplicationRepository, InMemoryApplicationRepository,
};
pub use user::repository::{UserRepository, MongoUserRepository, InMemoryUserRepository};

pub use bridge::{ApplicationDispatcher, MatrixDispatcher, MatrixDispatcherConfig};

pub use application::operations::{
    CreateApplicationCommand, CreateApplicationUseCase,
    DeleteApplicationCommand, DeleteApplicationUseCase, ApplicationDeleted,
};
pub use application::token::TokenPolicy;
pub use application::api::{ApplicationsState, applications_router};

pub use auth::{AuthState, Authenticated, Argon2Config, PasswordService};
pub use seed::{AdminSeed, AdminSeeder};
