//! Remote document store mirror for holdings.
//!
//! Talks to a jsonbin-style document API: the first save for an identity
//! creates a named document and the returned document id is remembered in
//! a local index file; later saves overwrite that document, and loads read
//! its latest revision. Intended as the remote half of
//! [`MirroredHoldingsRepository`](super::MirroredHoldingsRepository), not
//! as a primary store.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};
use crate::holdings::{Holding, HoldingsRepositoryTrait};

const BASE_URL: &str = "https://api.jsonbin.io/v3";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Serialized document body.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HoldingsDocument {
    user: String,
    holdings: Vec<Holding>,
    saved_at: DateTime<Utc>,
}

/// Response from document creation.
#[derive(Debug, Deserialize)]
struct CreateResponse {
    metadata: Option<CreateMetadata>,
}

#[derive(Debug, Deserialize)]
struct CreateMetadata {
    id: String,
}

/// Response from a latest-revision read; the document is wrapped in
/// `record`.
#[derive(Debug, Deserialize)]
struct ReadResponse {
    record: HoldingsDocument,
}

pub struct RemoteDocumentRepository {
    client: Client,
    api_key: String,
    /// Local file remembering identity -> document id across restarts.
    index_path: PathBuf,
    index: RwLock<HashMap<String, String>>,
}

impl RemoteDocumentRepository {
    pub fn new(api_key: String, index_path: impl Into<PathBuf>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        let index_path = index_path.into();
        let index = load_index(&index_path);

        Self {
            client,
            api_key,
            index_path,
            index: RwLock::new(index),
        }
    }

    fn document_id(&self, identity: &str) -> Option<String> {
        self.index
            .read()
            .ok()
            .and_then(|index| index.get(identity).cloned())
    }

    fn remember_document_id(&self, identity: &str, id: String) -> Result<()> {
        let mut index = self
            .index
            .write()
            .map_err(|_| Error::Storage("document index lock poisoned".to_string()))?;
        index.insert(identity.to_string(), id);

        if let Some(parent) = self.index_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string(&*index)?;
        std::fs::write(&self.index_path, raw)?;
        Ok(())
    }

    fn document(&self, identity: &str, holdings: &[Holding]) -> HoldingsDocument {
        HoldingsDocument {
            user: identity.to_string(),
            holdings: holdings.to_vec(),
            saved_at: Utc::now(),
        }
    }

    async fn create_document(&self, identity: &str, holdings: &[Holding]) -> Result<()> {
        let response = self
            .client
            .post(format!("{}/b", BASE_URL))
            .header("X-Master-Key", &self.api_key)
            .header("X-Bin-Name", format!("pfx_{}", identity))
            .json(&self.document(identity, holdings))
            .send()
            .await
            .map_err(|e| Error::RemoteStore(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::RemoteStore(format!(
                "document creation failed: HTTP {}",
                response.status()
            )));
        }

        let created: CreateResponse = response
            .json()
            .await
            .map_err(|e| Error::RemoteStore(e.to_string()))?;

        match created.metadata {
            Some(metadata) => {
                debug!("remote store: created document {} for '{}'", metadata.id, identity);
                self.remember_document_id(identity, metadata.id)
            }
            None => Err(Error::RemoteStore(
                "document creation returned no id".to_string(),
            )),
        }
    }

    async fn update_document(
        &self,
        document_id: &str,
        identity: &str,
        holdings: &[Holding],
    ) -> Result<()> {
        let response = self
            .client
            .put(format!("{}/b/{}", BASE_URL, document_id))
            .header("X-Master-Key", &self.api_key)
            .json(&self.document(identity, holdings))
            .send()
            .await
            .map_err(|e| Error::RemoteStore(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::RemoteStore(format!(
                "document update failed: HTTP {}",
                response.status()
            )));
        }
        Ok(())
    }
}

fn load_index(path: &Path) -> HashMap<String, String> {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_default()
}

#[async_trait]
impl HoldingsRepositoryTrait for RemoteDocumentRepository {
    async fn load(&self, identity: &str) -> Result<Option<Vec<Holding>>> {
        let document_id = match self.document_id(identity) {
            Some(id) => id,
            None => return Ok(None),
        };

        let response = self
            .client
            .get(format!("{}/b/{}/latest", BASE_URL, document_id))
            .header("X-Master-Key", &self.api_key)
            .send()
            .await
            .map_err(|e| Error::RemoteStore(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(Error::RemoteStore(format!(
                "document read failed: HTTP {}",
                response.status()
            )));
        }

        let read: ReadResponse = response
            .json()
            .await
            .map_err(|e| Error::RemoteStore(e.to_string()))?;

        Ok(Some(read.record.holdings))
    }

    async fn save(&self, identity: &str, holdings: &[Holding]) -> Result<()> {
        match self.document_id(identity) {
            Some(document_id) => self.update_document(&document_id, identity, holdings).await,
            None => self.create_document(identity, holdings).await,
        }
    }
}
