//! Admin Seeder
//!
//! Creates the configured administrator on startup so a fresh deployment
//! has an account that can authenticate. An existing account with the same
//! name is left untouched.

use std::sync::Arc;

use tracing::info;

use crate::User;
use crate::auth::PasswordService;
use crate::shared::error::{PlatformError, Result};
use crate::user::UserRepository;

/// Administrator account to ensure on startup
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub password: String,
    pub matrix_id: String,
}

pub struct AdminSeeder {
    users: Arc<dyn UserRepository>,
    passwords: Arc<PasswordService>,
}

impl AdminSeeder {
    pub fn new(users: Arc<dyn UserRepository>, passwords: Arc<PasswordService>) -> Self {
        Self { users, passwords }
    }

    /// Returns the admin user, created or pre-existing.
    pub async fn seed(&self, seed: &AdminSeed) -> Result<User> {
        if let Some(existing) = self.users.find_by_name(&seed.name).await? {
            info!(user_id = existing.id, name = %existing.name, "Admin user already present");
            return Ok(existing);
        }

        if seed.matrix_id.is_empty() {
            return Err(PlatformError::validation("Admin Matrix ID must not be empty"));
        }

        let hash = self.passwords.hash_password(&seed.password)?;
        let id = self.users.next_id().await?;
        let admin = User::new(id, &seed.name, hash, &seed.matrix_id).with_admin(true);

        match self.users.insert(&admin).await {
            Ok(()) => {
                info!(user_id = admin.id, name = %admin.name, "Created admin user");
                Ok(admin)
            }
            // Another instance seeded it first
            Err(e) if e.is_duplicate() => self.users
                .find_by_name(&seed.name)
                .await?
                .ok_or(e),
            Err(e) => Err(e),
        }
    }
}
