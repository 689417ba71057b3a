//! MongoDB Index Initialization
//!
//! Creates indexes for all collections on startup. The unique index on the
//! application token is the authoritative uniqueness guarantee; the token
//! generator's lookup loop only makes collisions at insert time unlikely.

use mongodb::{Database, IndexModel, bson::doc, options::IndexOptions};
use tracing::info;

use crate::application::repository::APPLICATIONS_COLLECTION;
use crate::user::repository::USERS_COLLECTION;

/// Initialize all MongoDB indexes
pub async fn initialize_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    info!("Initializing MongoDB indexes...");

    create_application_indexes(db).await?;
    create_user_indexes(db).await?;

    info!("MongoDB indexes initialized successfully");
    Ok(())
}

async fn create_application_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let collection = db.collection::<mongodb::bson::Document>(APPLICATIONS_COLLECTION);

    collection.create_index(
        IndexModel::builder()
            .keys(doc! { "token": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build(),
    ).await?;

    // Owner listing
    collection.create_index(
        IndexModel::builder()
            .keys(doc! { "userId": 1 })
            .build(),
    ).await?;

    info!("Created indexes on {}", APPLICATIONS_COLLECTION);
    Ok(())
}

async fn create_user_indexes(db: &Database) -> Result<(), mongodb::error::Error> {
    let collection = db.collection::<mongodb::bson::Document>(USERS_COLLECTION);

    collection.create_index(
        IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build(),
    ).await?;

    info!("Created indexes on {}", USERS_COLLECTION);
    Ok(())
}
