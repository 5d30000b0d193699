//! Document store access.
//!
//! The store holding stop data is an external collaborator. This module
//! defines the capability the search engine needs from it, a
//! `find(collection, filter) -> cursor` call, plus an in-memory
//! implementation used for local data files and tests.

mod error;
mod filter;
mod memory;

use std::future::Future;

use futures::stream::BoxStream;

pub use error::StoreError;
pub use filter::{CompareOp, Filter};
pub use memory::MemoryStore;

/// A stored document: a JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;

/// Documents yielded by a query, in store iteration order.
pub type Cursor = BoxStream<'static, Result<Document, StoreError>>;

/// Read access to a document store.
///
/// Implementations must be safe to share between concurrent requests.
/// Any connection needed to serve a query is owned by the returned cursor
/// and released when the cursor is dropped.
pub trait DocumentStore: Send + Sync {
    /// Find documents in `collection` matching `filter`.
    fn find(
        &self,
        collection: &str,
        filter: &Filter,
    ) -> impl Future<Output = Result<Cursor, StoreError>> + Send;
}
