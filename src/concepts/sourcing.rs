//! Sourcing concept
//!
//! Per-user registration of external content sources (URL, file, folder)
//! plus the cache of contents an ingestion run would populate. Ingestion
//! itself is an external collaborator — given a kind and URI it would
//! produce zero or more opaque bodies — and is not implemented; `refresh`
//! always fails hard without touching state.

use bson::doc;

use crate::concepts::parse_object_id;
use crate::db::mongo::{assert_exists, assert_not_exists};
use crate::db::schemas::{ContentDoc, SourceDoc, SourceKind, CONTENT_COLLECTION, SOURCE_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::types::{AgoraError, Result};

/// Sourcing concept: external sources and their cached contents
#[derive(Clone)]
pub struct Sourcing {
    sources: MongoCollection<SourceDoc>,
    contents: MongoCollection<ContentDoc>,
}

impl Sourcing {
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            sources: client.collection(SOURCE_COLLECTION).await?,
            contents: client.collection(CONTENT_COLLECTION).await?,
        })
    }

    /// Register a source; `NotAllowed` when (owner, kind, uri) exists
    pub async fn register(&self, kind: SourceKind, uri: &str, owner: &str) -> Result<String> {
        if uri.is_empty() {
            return Err(AgoraError::BadValues("source uri must be non-empty".into()));
        }

        let filter = doc! { "owner": owner, "kind": kind.as_str(), "uri": uri };
        let existing = self.sources.find_one(filter.clone()).await?;
        assert_not_exists(&existing, "source", &filter)?;

        let id = self
            .sources
            .insert_one(SourceDoc::new(owner, kind, uri))
            .await?;

        Ok(id.to_hex())
    }

    /// Fetch an owned source: `NotFound` when absent, `NotAllowed` when
    /// owned by another user
    pub async fn lookup(&self, id: &str, owner: &str) -> Result<SourceDoc> {
        let oid = parse_object_id(id, "source")?;
        let filter = doc! { "_id": oid };
        let source = self.sources.find_one(filter.clone()).await?;
        let source = assert_exists(source, "source", &filter)?;

        if source.owner != owner {
            return Err(
                AgoraError::not_allowed("source", "owned by another user")
                    .with_subject(source.owner.clone()),
            );
        }

        Ok(source)
    }

    /// Remove an owned source along with its cached contents
    pub async fn unregister(&self, id: &str, owner: &str) -> Result<()> {
        let source = self.lookup(id, owner).await?;

        // Cascade: contents belong to exactly one source.
        self.contents.delete_many(doc! { "source": id }).await?;
        if let Some(oid) = source._id {
            self.sources.delete_one(doc! { "_id": oid }).await?;
        }

        Ok(())
    }

    /// All sources of the owner
    pub async fn list(&self, owner: &str) -> Result<Vec<SourceDoc>> {
        self.sources.find_many(doc! { "owner": owner }).await
    }

    /// Pull fresh content from the external source into the cache.
    ///
    /// Ingestion is not implemented; always fails hard and mutates nothing.
    pub async fn refresh(&self, _id: &str, _owner: &str) -> Result<()> {
        Err(AgoraError::NotImplemented("source ingestion"))
    }

    /// Cached contents of an owned source
    pub async fn get_contents(&self, id: &str, owner: &str) -> Result<Vec<ContentDoc>> {
        self.lookup(id, owner).await?;

        self.contents.find_many(doc! { "source": id }).await
    }
}
