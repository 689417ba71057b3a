//! Application Operations
//!
//! Use cases that create and delete an application across the record store
//! and the messaging bridge.

pub mod create;
pub mod delete;

pub use create::{
    CreateApplicationCommand,
    CreateApplicationUseCase,
    MAX_NAME_LENGTH,
};

pub use delete::{
    ApplicationDeleted,
    DeleteApplicationCommand,
    DeleteApplicationUseCase,
};
