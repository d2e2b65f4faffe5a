use std::time::Duration;

use mongodb::{
    bson::doc,
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};

use crate::{config::Config, errors::AppResult};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Handle to the service's MongoDB database.
#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

async fn client_options(conn_string: &str) -> AppResult<ClientOptions> {
    let mut options = ClientOptions::parse(conn_string).await?;

    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    options.app_name = Some(env!("CARGO_PKG_NAME").to_string());
    options.max_pool_size = Some(10);
    options.connect_timeout = Some(CONNECT_TIMEOUT);
    options.server_selection_timeout = Some(CONNECT_TIMEOUT);

    Ok(options)
}

impl Database {
    /// Connects and pings once so a bad connection string fails at startup.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let client = Client::with_options(client_options(&config.mongo_conn_string).await?)?;

        let db = Self {
            client,
            db_name: config.mongo_db_name.clone(),
        };
        db.health_check().await?;

        log::info!("Connected to MongoDB database '{}'", db.db_name);
        Ok(db)
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client
            .database(&self.db_name)
            .collection(collection_name)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.client
            .database(&self.db_name)
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_database_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Database>();
    }

    #[tokio::test]
    async fn test_client_options_apply_service_defaults() {
        let options = client_options("mongodb://localhost:27017").await.unwrap();

        assert_eq!(options.app_name.as_deref(), Some("lecture-quiz-server"));
        assert_eq!(options.connect_timeout, Some(CONNECT_TIMEOUT));
        assert_eq!(options.max_pool_size, Some(10));
    }

    #[tokio::test]
    async fn test_client_options_reject_garbage() {
        assert!(client_options("not-a-connection-string").await.is_err());
    }
}
