use mongodb::{Client, Database};

use crate::config::AppConfig;

pub async fn get_db_client(config: &AppConfig) -> Database {
    let client = Client::with_uri_str(&config.database_url)
        .await
        .expect("Failed to connect to MongoDB");

    let db = client.database(&config.database_name);

    // Verify the database is reachable before serving anything.
    match db.list_collection_names().await {
        Ok(collections) => {
            tracing::info!(
                "Connected to database {} ({} collections)",
                config.database_name,
                collections.len()
            );
        }
        Err(e) => {
            tracing::warn!(
                "Database '{}' may not exist or is inaccessible: {}",
                config.database_name,
                e
            );
        }
    }

    db
}
