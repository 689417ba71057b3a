//! User Repository

use std::collections::BTreeMap;

use async_trait::async_trait;
use mongodb::{Collection, Database, bson::doc};
use parking_lot::RwLock;

use crate::User;
use crate::shared::error::{PlatformError, Result};

pub const USERS_COLLECTION: &str = "users";

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>>;

    /// Insert a user. A taken name is `PlatformError::Duplicate`.
    async fn insert(&self, user: &User) -> Result<()>;

    /// Next free numeric identifier.
    async fn next_id(&self) -> Result<u64>;
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection(USERS_COLLECTION),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "name": name }).await?)
    }

    async fn insert(&self, user: &User) -> Result<()> {
        self.collection
            .insert_one(user)
            .await
            .map_err(|e| PlatformError::from_write_error(e, "User", "name", &user.name))?;
        Ok(())
    }

    async fn next_id(&self) -> Result<u64> {
        let last = self.collection
            .find_one(doc! {})
            .sort(doc! { "_id": -1 })
            .await?;
        Ok(last.map(|u| u.id + 1).unwrap_or(1))
    }
}

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<BTreeMap<u64, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let repo = Self::new();
        {
            let mut map = repo.users.write();
            for user in users {
                map.insert(user.id, user);
            }
        }
        repo
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_name(&self, name: &str) -> Result<Option<User>> {
        Ok(self.users.read().values().find(|u| u.name == name).cloned())
    }

    async fn insert(&self, user: &User) -> Result<()> {
        let mut users = self.users.write();
        if users.contains_key(&user.id) || users.values().any(|u| u.name == user.name) {
            return Err(PlatformError::duplicate("User", "name", &user.name));
        }
        users.insert(user.id, user.clone());
        Ok(())
    }

    async fn next_id(&self) -> Result<u64> {
        Ok(self.users.read().keys().next_back().map(|id| id + 1).unwrap_or(1))
    }
}
