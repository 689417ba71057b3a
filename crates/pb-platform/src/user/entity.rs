//! User Entity

use serde::{Deserialize, Serialize};

/// An account that owns applications.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: u64,

    /// Login name, unique across users
    pub name: String,

    /// Argon2id PHC string
    pub password_hash: String,

    /// The user's own address on the bridge; invited to every room created
    /// for their applications
    pub matrix_id: String,

    #[serde(default)]
    pub is_admin: bool,
}

impl User {
    pub fn new(
        id: u64,
        name: impl Into<String>,
        password_hash: impl Into<String>,
        matrix_id: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            password_hash: password_hash.into(),
            matrix_id: matrix_id.into(),
            is_admin: false,
        }
    }

    pub fn with_admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }

    /// Principal identifier recorded on execution contexts.
    pub fn principal_id(&self) -> String {
        self.id.to_string()
    }
}
