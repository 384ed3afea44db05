//! Startup orchestration.
//!
//! # Responsibilities
//! - Open the document collection named by the storage URI
//! - Bind the listener once storage is ready
//!
//! # Design Decisions
//! - Fail fast: a storage error at startup aborts launch
//! - Listener binds last, so traffic only arrives once storage is ready

use std::sync::Arc;

use tokio::net::TcpListener;
use url::Url;

use crate::config::{ServiceConfig, StorageConfig};
use crate::store::{Collection, MemoryCollection, StoreError};

/// Open the collection described by `config`.
pub fn open_collection(config: &StorageConfig) -> Result<Arc<dyn Collection>, StoreError> {
    let url = Url::parse(&config.uri).map_err(|_| StoreError::UnsupportedUri(config.uri.clone()))?;

    let collection = match url.scheme() {
        "memory" => MemoryCollection::new(),
        "file" => {
            let path = url
                .to_file_path()
                .map_err(|_| StoreError::UnsupportedUri(config.uri.clone()))?;
            MemoryCollection::open(path)?
        }
        _ => return Err(StoreError::UnsupportedUri(config.uri.clone())),
    };

    tracing::info!(
        uri = %config.uri,
        documents = collection.len(),
        acknowledge_writes = config.acknowledge_writes,
        "Collection opened"
    );
    Ok(Arc::new(collection.with_acknowledged_writes(config.acknowledge_writes)))
}

/// Bind the configured listener address.
pub async fn bind_listener(config: &ServiceConfig) -> std::io::Result<TcpListener> {
    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::ObjectId;
    use serde_json::json;

    fn storage(uri: &str) -> StorageConfig {
        StorageConfig {
            uri: uri.to_string(),
            acknowledge_writes: true,
        }
    }

    #[tokio::test]
    async fn test_open_memory() {
        let collection = open_collection(&storage("memory://")).unwrap();
        assert!(collection.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_open_file_round_trip() {
        let path = std::env::temp_dir().join(format!("employees-startup-{}.json", ObjectId::new()));
        let uri = Url::from_file_path(&path).unwrap().to_string();

        let collection = open_collection(&storage(&uri)).unwrap();
        let doc = json!({"name": "A"}).as_object().unwrap().clone();
        let id = collection.insert(doc).await.unwrap().inserted_id;
        drop(collection);

        let reopened = open_collection(&storage(&uri)).unwrap();
        assert!(reopened.find_by_id(&id).await.unwrap().is_some());

        std::fs::remove_file(&path).unwrap_or_default();
    }

    #[test]
    fn test_unsupported_uri_is_fatal() {
        for uri in ["mongodb://localhost:27017", "nonsense"] {
            assert!(matches!(
                open_collection(&storage(uri)),
                Err(StoreError::UnsupportedUri(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_unacknowledged_config_is_applied() {
        let mut config = storage("memory://");
        config.acknowledge_writes = false;
        let collection = open_collection(&config).unwrap();
        let doc = json!({}).as_object().unwrap().clone();
        assert!(!collection.insert(doc).await.unwrap().acknowledged);
    }
}
