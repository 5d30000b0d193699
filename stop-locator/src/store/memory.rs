//! In-memory document store.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use futures::StreamExt;
use serde_json::Value;
use tokio::sync::RwLock;

use super::error::StoreError;
use super::filter::Filter;
use super::{Cursor, Document, DocumentStore};

/// A document store held in memory, evaluating filters locally.
///
/// Documents keep their insertion order, which is the order cursors yield
/// them in. Cloning is cheap and clones share the same collections.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, Vec<Document>>>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append documents to a collection, creating it if needed.
    pub async fn insert_many(&self, collection: &str, docs: impl IntoIterator<Item = Document>) {
        let mut guard = self.collections.write().await;
        guard
            .entry(collection.to_string())
            .or_default()
            .extend(docs);
    }

    /// Load a JSON array of documents from disk into a collection.
    ///
    /// Returns the number of documents loaded.
    pub async fn load_json_file(
        &self,
        collection: &str,
        path: impl AsRef<Path>,
    ) -> Result<usize, StoreError> {
        let path = path.as_ref();
        let json = tokio::fs::read_to_string(path).await?;
        let docs = parse_documents(&json).map_err(|message| StoreError::Decode {
            message: format!("{}: {message}", path.display()),
        })?;

        let count = docs.len();
        self.insert_many(collection, docs).await;
        Ok(count)
    }

    /// Number of documents in a collection.
    pub async fn len(&self, collection: &str) -> usize {
        let guard = self.collections.read().await;
        guard.get(collection).map_or(0, Vec::len)
    }

    /// Check if a collection is empty or missing.
    pub async fn is_empty(&self, collection: &str) -> bool {
        self.len(collection).await == 0
    }
}

impl DocumentStore for MemoryStore {
    async fn find(&self, collection: &str, filter: &Filter) -> Result<Cursor, StoreError> {
        // Snapshot the matches so the lock is released before the cursor is read
        let matches: Vec<Document> = {
            let guard = self.collections.read().await;
            guard
                .get(collection)
                .map(|docs| docs.iter().filter(|d| filter.matches(d)).cloned().collect())
                .unwrap_or_default()
        };

        Ok(futures::stream::iter(matches.into_iter().map(Ok)).boxed())
    }
}

fn parse_documents(json: &str) -> Result<Vec<Document>, String> {
    let value: Value = serde_json::from_str(json).map_err(|e| e.to_string())?;
    let Value::Array(items) = value else {
        return Err("expected a JSON array of documents".to_string());
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            Value::Object(doc) => Ok(doc),
            _ => Err(format!("element {i} is not an object")),
        })
        .collect()
}
