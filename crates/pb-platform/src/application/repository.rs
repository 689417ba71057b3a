//! Application Repository
//!
//! The record store behind the application lifecycle. Both implementations
//! enforce token uniqueness on insert and report a violation as
//! `PlatformError::Duplicate`.

use std::collections::HashMap;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::{Collection, Database, bson::doc};
use parking_lot::RwLock;
use tracing::debug;

use crate::{Application, NewApplication};
use crate::shared::error::{PlatformError, Result};
use crate::shared::tsid::TsidGenerator;

pub const APPLICATIONS_COLLECTION: &str = "applications";

#[async_trait]
pub trait ApplicationRepository: Send + Sync {
    /// Persist a new record atomically, assigning its identifier.
    async fn create(&self, application: NewApplication) -> Result<Application>;

    /// Remove a record. A missing record is `PlatformError::NotFound`.
    async fn delete(&self, application: &Application) -> Result<()>;

    async fn find_by_id(&self, id: &str) -> Result<Option<Application>>;

    async fn find_by_token(&self, token: &str) -> Result<Option<Application>>;

    async fn find_by_user(&self, user_id: u64) -> Result<Vec<Application>>;

    async fn exists_by_token(&self, token: &str) -> Result<bool> {
        Ok(self.find_by_token(token).await?.is_some())
    }
}

/// MongoDB-backed store. Relies on the unique `token` index created by
/// `initialize_indexes`.
pub struct MongoApplicationRepository {
    collection: Collection<Application>,
}

impl MongoApplicationRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(APPLICATIONS_COLLECTION),
        }
    }
}

#[async_trait]
impl ApplicationRepository for MongoApplicationRepository {
    async fn create(&self, application: NewApplication) -> Result<Application> {
        let token = application.token().to_string();
        let application = application.into_application(TsidGenerator::generate());

        self.collection
            .insert_one(&application)
            .await
            .map_err(|e| PlatformError::from_write_error(e, "Application", "token", &token))?;

        debug!(application_id = %application.id, "Inserted application");
        Ok(application)
    }

    async fn delete(&self, application: &Application) -> Result<()> {
        let result = self.collection
            .delete_one(doc! { "_id": application.id.as_str() })
            .await?;

        if result.deleted_count == 0 {
            return Err(PlatformError::not_found("Application", &application.id));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Application>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Application>> {
        Ok(self.collection.find_one(doc! { "token": token }).await?)
    }

    async fn find_by_user(&self, user_id: u64) -> Result<Vec<Application>> {
        let user_id = i64::try_from(user_id)
            .map_err(|_| PlatformError::validation(format!("User id {} out of range", user_id)))?;
        let cursor = self.collection
            .find(doc! { "userId": user_id })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn exists_by_token(&self, token: &str) -> Result<bool> {
        let count = self.collection
            .count_documents(doc! { "token": token })
            .await?;
        Ok(count > 0)
    }
}

/// In-process store used by tests and local tooling.
///
/// The uniqueness check and the insert happen under one write lock, which is
/// the in-memory equivalent of the unique index.
#[derive(Default)]
pub struct InMemoryApplicationRepository {
    applications: RwLock<HashMap<String, Application>>,
}

impl InMemoryApplicationRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.applications.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.read().is_empty()
    }

    pub fn all(&self) -> Vec<Application> {
        self.applications.read().values().cloned().collect()
    }
}

#[async_trait]
impl ApplicationRepository for InMemoryApplicationRepository {
    async fn create(&self, application: NewApplication) -> Result<Application> {
        let mut applications = self.applications.write();

        if applications.values().any(|a| a.token == application.token()) {
            return Err(PlatformError::duplicate("Application", "token", application.token()));
        }

        let application = application.into_application(TsidGenerator::generate());
        applications.insert(application.id.clone(), application.clone());
        Ok(application)
    }

    async fn delete(&self, application: &Application) -> Result<()> {
        match self.applications.write().remove(&application.id) {
            Some(_) => Ok(()),
            None => Err(PlatformError::not_found("Application", &application.id)),
        }
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Application>> {
        Ok(self.applications.read().get(id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Application>> {
        Ok(self.applications
            .read()
            .values()
            .find(|a| a.token == token)
            .cloned())
    }

    async fn find_by_user(&self, user_id: u64) -> Result<Vec<Application>> {
        let mut applications: Vec<Application> = self.applications
            .read()
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        applications.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(applications)
    }
}
