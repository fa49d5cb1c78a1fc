//! Labelling concept
//!
//! Per-user named tag sets over opaque resource ids. All reads and scans
//! are scoped to the owning user.

use bson::doc;

use crate::db::mongo::{assert_exists, assert_not_exists};
use crate::db::schemas::{LabelDoc, LABEL_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::types::{AgoraError, Result};

/// Labelling concept: named resource sets per user
#[derive(Clone)]
pub struct Labelling {
    labels: MongoCollection<LabelDoc>,
}

impl Labelling {
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            labels: client.collection(LABEL_COLLECTION).await?,
        })
    }

    fn label_filter(owner: &str, name: &str) -> bson::Document {
        doc! { "owner": owner, "name": name }
    }

    /// Register a label; `NotAllowed` when (owner, name) already exists
    pub async fn register(&self, name: &str, owner: &str) -> Result<String> {
        if name.is_empty() {
            return Err(AgoraError::BadValues("label name must be non-empty".into()));
        }

        let filter = Self::label_filter(owner, name);
        let existing = self.labels.find_one(filter.clone()).await?;
        assert_not_exists(&existing, "label", &filter)?;

        let id = self.labels.insert_one(LabelDoc::new(owner, name)).await?;

        Ok(id.to_hex())
    }

    /// Remove a label; `NotFound` when absent
    pub async fn unregister(&self, name: &str, owner: &str) -> Result<()> {
        self.labels
            .pop_one("label", Self::label_filter(owner, name))
            .await?;

        Ok(())
    }

    /// Fetch a label; `NotFound` when absent
    pub async fn lookup(&self, name: &str, owner: &str) -> Result<LabelDoc> {
        let filter = Self::label_filter(owner, name);
        let label = self.labels.find_one(filter.clone()).await?;

        assert_exists(label, "label", &filter)
    }

    /// Tag a resource; the label must exist and must not already contain it
    pub async fn add(&self, resource: &str, name: &str, owner: &str) -> Result<()> {
        let label = self.lookup(name, owner).await?;

        if label.resources.iter().any(|r| r == resource) {
            return Err(AgoraError::already_exists(
                "resource",
                &doc! { "label": name, "resource": resource },
            ));
        }

        self.labels
            .update_one(
                Self::label_filter(owner, name),
                doc! { "$push": { "resources": resource } },
            )
            .await?;

        Ok(())
    }

    /// Untag a resource; the label and the membership must both exist
    pub async fn remove(&self, resource: &str, name: &str, owner: &str) -> Result<()> {
        let label = self.lookup(name, owner).await?;

        if !label.resources.iter().any(|r| r == resource) {
            return Err(AgoraError::not_found(
                "resource",
                &doc! { "label": name, "resource": resource },
            ));
        }

        self.labels
            .update_one(
                Self::label_filter(owner, name),
                doc! { "$pull": { "resources": resource } },
            )
            .await?;

        Ok(())
    }

    /// Names of the owner's labels containing `resource`
    pub async fn get(&self, resource: &str, owner: &str) -> Result<Vec<String>> {
        let labels = self
            .labels
            .find_many(doc! { "owner": owner, "resources": resource })
            .await?;

        Ok(labels.into_iter().map(|l| l.name).collect())
    }

    /// All labels of the owner
    pub async fn list(&self, owner: &str) -> Result<Vec<LabelDoc>> {
        self.labels.find_many(doc! { "owner": owner }).await
    }
}
