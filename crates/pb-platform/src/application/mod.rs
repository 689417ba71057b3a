//! Application Aggregate
//!
//! Notification sources owned by users and registered on the bridge.

pub mod entity;
pub mod token;
pub mod repository;
pub mod operations;
pub mod api;

pub use entity::{Application, NewApplication};
pub use token::{TokenError, TokenPolicy};
pub use repository::{
    ApplicationRepository, MongoApplicationRepository, InMemoryApplicationRepository,
};
pub use api::{ApplicationsState, applications_router};
