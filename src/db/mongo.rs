//! MongoDB client and collection wrapper
//!
//! Every concept is built on one or more [`MongoCollection`]s. The wrapper
//! provides the shared store contract: create, read-one, read-many, partial
//! update, delete, pop (atomic read+delete), and the assertion helpers that
//! turn a missing-or-present document into a typed precondition failure.
//!
//! Only [`MongoCollection::pop_one`] raises for absence; `find_one` returns
//! `None`, `update_one` and `delete_one` are silent no-ops when nothing
//! matches. Callers pre-check uniqueness with `find_one` + `assert_*`;
//! unique indexes back-stop races.

use bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::{options::IndexOptions, results::UpdateResult, Client, Collection, IndexModel};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{error, info};

use crate::db::schemas::Metadata;
use crate::types::{AgoraError, Result};

/// Trait for schemas that provide index definitions
pub trait IntoIndexes {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)>;
}

/// Trait for schemas with mutable metadata
pub trait MutMetadata {
    fn mut_metadata(&mut self) -> &mut Metadata;
}

/// Raise `NotFound` when a prior read came back empty.
pub fn assert_exists<T>(found: Option<T>, entity: &'static str, filter: &Document) -> Result<T> {
    found.ok_or_else(|| AgoraError::not_found(entity, filter))
}

/// Raise `NotAllowed` when a prior read found a document that must not exist.
pub fn assert_not_exists<T>(
    found: &Option<T>,
    entity: &'static str,
    filter: &Document,
) -> Result<()> {
    match found {
        Some(_) => Err(AgoraError::already_exists(entity, filter)),
        None => Ok(()),
    }
}

/// MongoDB client wrapper
#[derive(Clone)]
pub struct MongoClient {
    client: Client,
    db_name: String,
}

impl MongoClient {
    /// Create a new MongoDB client
    pub async fn new(uri: &str, db_name: &str) -> Result<Self> {
        info!("Connecting to MongoDB at {}", uri);

        // Use serverSelectionTimeoutMS to avoid hanging on unreachable MongoDB
        let timeout_uri = if uri.contains('?') {
            format!("{}&serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        } else {
            format!("{}?serverSelectionTimeoutMS=3000&connectTimeoutMS=3000", uri)
        };

        let client = Client::with_uri_str(&timeout_uri)
            .await
            .map_err(|e| AgoraError::Database(format!("Failed to connect to MongoDB: {}", e)))?;

        // Verify connection with timeout
        client
            .database(db_name)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| AgoraError::Database(format!("MongoDB ping failed: {}", e)))?;

        info!("Connected to MongoDB database '{}'", db_name);

        Ok(Self {
            client,
            db_name: db_name.to_string(),
        })
    }

    /// Get a typed collection
    pub async fn collection<T>(&self, name: &str) -> Result<MongoCollection<T>>
    where
        T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes + MutMetadata,
    {
        MongoCollection::new(&self.client, &self.db_name, name).await
    }

    /// Get the raw MongoDB client
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Get the database name
    pub fn db_name(&self) -> &str {
        &self.db_name
    }
}

/// Typed MongoDB collection with automatic indexing
#[derive(Debug, Clone)]
pub struct MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync,
{
    inner: Collection<T>,
}

impl<T> MongoCollection<T>
where
    T: Serialize + DeserializeOwned + Unpin + Send + Sync + IntoIndexes + MutMetadata,
{
    /// Create a new collection and apply indexes
    pub async fn new(client: &Client, db_name: &str, collection_name: &str) -> Result<Self> {
        let collection = client.database(db_name).collection::<T>(collection_name);
        let mongo_collection = MongoCollection { inner: collection };

        // Apply indexes
        mongo_collection.apply_indexes().await?;

        Ok(mongo_collection)
    }

    /// Apply schema-defined indexes
    async fn apply_indexes(&self) -> Result<()> {
        let schema_indices = T::into_indices();

        if schema_indices.is_empty() {
            return Ok(());
        }

        let indices: Vec<IndexModel> = schema_indices
            .into_iter()
            .map(|(keys, opts)| IndexModel::builder().keys(keys).options(opts).build())
            .collect();

        self.inner
            .create_indexes(indices)
            .await
            .map_err(|e| AgoraError::Database(format!("Failed to create indexes: {}", e)))?;

        Ok(())
    }

    /// Insert a document, stamping creation and update timestamps
    pub async fn insert_one(&self, mut item: T) -> Result<ObjectId> {
        let metadata = item.mut_metadata();
        metadata.created_at = Some(DateTime::now());
        metadata.updated_at = Some(DateTime::now());

        let result = self
            .inner
            .insert_one(item)
            .await
            .map_err(|e| AgoraError::Database(format!("Insert failed: {}", e)))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| AgoraError::Database("Failed to get inserted ID".into()))
    }

    /// Find one document by filter; `None` for no match, never an error
    pub async fn find_one(&self, filter: Document) -> Result<Option<T>> {
        self.inner
            .find_one(filter)
            .await
            .map_err(|e| AgoraError::Database(format!("Find failed: {}", e)))
    }

    /// Find many documents by filter; order unspecified
    pub async fn find_many(&self, filter: Document) -> Result<Vec<T>> {
        use futures_util::StreamExt;

        let cursor = self
            .inner
            .find(filter)
            .await
            .map_err(|e| AgoraError::Database(format!("Find failed: {}", e)))?;

        let results: Vec<T> = cursor
            .filter_map(|doc| async {
                match doc {
                    Ok(d) => Some(d),
                    Err(e) => {
                        error!("Error reading document: {}", e);
                        None
                    }
                }
            })
            .collect()
            .await;

        Ok(results)
    }

    /// Merge update clauses into the first match, refreshing the update
    /// timestamp. Silent no-op when nothing matches.
    ///
    /// `update` is a full update document (`$set`/`$unset`/`$push`/`$pull`);
    /// the store injects `metadata.updated_at` into its `$set` clause.
    pub async fn update_one(&self, filter: Document, mut update: Document) -> Result<UpdateResult> {
        if !update.contains_key("$set") {
            update.insert("$set", Document::new());
        }
        if let Ok(set) = update.get_document_mut("$set") {
            set.insert("metadata.updated_at", DateTime::now());
        }

        self.inner
            .update_one(filter, update)
            .await
            .map_err(|e| AgoraError::Database(format!("Update failed: {}", e)))
    }

    /// Remove the first match; silent when nothing matches
    pub async fn delete_one(&self, filter: Document) -> Result<()> {
        self.inner
            .delete_one(filter)
            .await
            .map_err(|e| AgoraError::Database(format!("Delete failed: {}", e)))?;

        Ok(())
    }

    /// Remove every match, returning the number removed
    pub async fn delete_many(&self, filter: Document) -> Result<u64> {
        let result = self
            .inner
            .delete_many(filter)
            .await
            .map_err(|e| AgoraError::Database(format!("Delete failed: {}", e)))?;

        Ok(result.deleted_count)
    }

    /// Atomically remove and return the first match.
    ///
    /// The only store operation that raises for absence.
    pub async fn pop_one(&self, entity: &'static str, filter: Document) -> Result<T> {
        let popped = self
            .inner
            .find_one_and_delete(filter.clone())
            .await
            .map_err(|e| AgoraError::Database(format!("Pop failed: {}", e)))?;

        assert_exists(popped, entity, &filter)
    }

    /// Get the underlying collection for advanced operations
    pub fn inner(&self) -> &Collection<T> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    #[test]
    fn assert_exists_passes_through_the_document() {
        let filter = doc! { "username": "ada" };
        let got = assert_exists(Some(42u32), "user", &filter).unwrap();
        assert_eq!(got, 42);
    }

    #[test]
    fn assert_exists_raises_not_found() {
        let filter = doc! { "username": "ghost" };
        let err = assert_exists::<u32>(None, "user", &filter).unwrap_err();
        assert!(matches!(err, AgoraError::NotFound { entity: "user", .. }));
    }

    #[test]
    fn assert_not_exists_raises_not_allowed() {
        let filter = doc! { "username": "ada" };
        let err = assert_not_exists(&Some(42u32), "user", &filter).unwrap_err();
        assert!(matches!(err, AgoraError::NotAllowed { entity: "user", .. }));
        assert!(assert_not_exists::<u32>(&None, "user", &filter).is_ok());
    }

    // Store CRUD is exercised end-to-end by tests/concepts.rs against a
    // running MongoDB instance.
}
