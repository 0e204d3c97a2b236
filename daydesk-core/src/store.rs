//! The document-store seam.
//!
//! The external store holds schema-flexible documents in named
//! collections, queryable by a `userId` equality filter plus a single
//! order-by. [`Remote`](crate::remote::Remote) implements this trait
//! over a provider binary; tests use an in-memory store.

use serde::{Deserialize, Serialize};

use crate::error::DaydeskResult;

/// Collection names used by the data access layer.
pub mod collections {
    pub const TASKS: &str = "tasks";
    pub const NOTES: &str = "notes";
    pub const EVENTS: &str = "events";
}

/// A document as returned by the store: provider-assigned id plus the
/// raw field object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub fields: serde_json::Value,
}

/// An equality-filter-plus-order-by query, the only query shape this
/// layer ever issues. Every query is scoped to one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryFilter {
    /// Matched against the document's `userId` field.
    pub user_id: String,
    /// Wire name of the field to order by.
    pub order_by: String,
    #[serde(default)]
    pub descending: bool,
}

impl QueryFilter {
    /// Query scoped to `user_id`, ordered by `createdAt` descending.
    pub fn for_user(user_id: &str) -> Self {
        QueryFilter {
            user_id: user_id.to_string(),
            order_by: "createdAt".to_string(),
            descending: true,
        }
    }

    pub fn order_asc(mut self, field: &str) -> Self {
        self.order_by = field.to_string();
        self.descending = false;
        self
    }
}

/// CRUD primitives of the external document store.
#[allow(async_fn_in_trait)]
pub trait DocumentStore {
    /// Run a query against a collection.
    async fn query(
        &self,
        collection: &str,
        filter: &QueryFilter,
    ) -> DaydeskResult<Vec<Document>>;

    /// Write a new document; the store assigns and returns the id.
    async fn add(&self, collection: &str, fields: serde_json::Value) -> DaydeskResult<String>;

    /// Write only the supplied fields onto an existing document.
    async fn update(
        &self,
        collection: &str,
        document_id: &str,
        fields: serde_json::Value,
    ) -> DaydeskResult<()>;

    /// Remove a document.
    async fn delete(&self, collection: &str, document_id: &str) -> DaydeskResult<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory store with failure injection, for exercising the data
    //! access layer without a provider binary.

    use std::collections::HashMap;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

    use super::*;
    use crate::error::DaydeskError;

    #[derive(Default)]
    pub struct MemoryStore {
        collections: Mutex<HashMap<String, Vec<Document>>>,
        next_id: AtomicU64,
        fail: AtomicBool,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            MemoryStore::default()
        }

        /// Make every subsequent call fail with a store error.
        pub fn fail_next_calls(&self) {
            self.fail.store(true, Ordering::SeqCst);
        }

        fn check_failure(&self) -> DaydeskResult<()> {
            if self.fail.load(Ordering::SeqCst) {
                Err(DaydeskError::Store("simulated store failure".into()))
            } else {
                Ok(())
            }
        }
    }

    impl DocumentStore for MemoryStore {
        async fn query(
            &self,
            collection: &str,
            filter: &QueryFilter,
        ) -> DaydeskResult<Vec<Document>> {
            self.check_failure()?;
            let collections = self.collections.lock().unwrap();
            let mut docs: Vec<Document> = collections
                .get(collection)
                .map(|docs| {
                    docs.iter()
                        .filter(|doc| {
                            doc.fields.get("userId").and_then(|v| v.as_str())
                                == Some(filter.user_id.as_str())
                        })
                        .cloned()
                        .collect()
                })
                .unwrap_or_default();

            // Instants serialize as RFC3339, so string order is time order.
            docs.sort_by(|a, b| {
                let ka = a.fields.get(&filter.order_by).map(|v| v.to_string());
                let kb = b.fields.get(&filter.order_by).map(|v| v.to_string());
                if filter.descending { kb.cmp(&ka) } else { ka.cmp(&kb) }
            });

            Ok(docs)
        }

        async fn add(
            &self,
            collection: &str,
            fields: serde_json::Value,
        ) -> DaydeskResult<String> {
            self.check_failure()?;
            let id = format!("doc-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
            self.collections
                .lock()
                .unwrap()
                .entry(collection.to_string())
                .or_default()
                .push(Document {
                    id: id.clone(),
                    fields,
                });
            Ok(id)
        }

        async fn update(
            &self,
            collection: &str,
            document_id: &str,
            fields: serde_json::Value,
        ) -> DaydeskResult<()> {
            self.check_failure()?;
            let mut collections = self.collections.lock().unwrap();
            let doc = collections
                .get_mut(collection)
                .and_then(|docs| docs.iter_mut().find(|d| d.id == document_id))
                .ok_or_else(|| {
                    DaydeskError::Store(format!("No document {document_id} in {collection}"))
                })?;

            if let (Some(existing), Some(updates)) =
                (doc.fields.as_object_mut(), fields.as_object())
            {
                for (key, value) in updates {
                    existing.insert(key.clone(), value.clone());
                }
            }
            Ok(())
        }

        async fn delete(&self, collection: &str, document_id: &str) -> DaydeskResult<()> {
            self.check_failure()?;
            let mut collections = self.collections.lock().unwrap();
            if let Some(docs) = collections.get_mut(collection) {
                docs.retain(|d| d.id != document_id);
            }
            Ok(())
        }
    }
}
