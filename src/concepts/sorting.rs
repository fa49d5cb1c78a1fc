//! Sorting concept
//!
//! One weight profile per user: a label → weight mapping with
//! existence-direction-sensitive errors (`add_weight` refuses a label that
//! is already weighted; `set`/`get`/`remove` require it to exist). The
//! ranking step that would consume a profile is declared but not
//! implemented and always fails hard.

use bson::doc;

use crate::db::mongo::{assert_exists, assert_not_exists};
use crate::db::schemas::{SortProfileDoc, SORT_PROFILE_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::types::{AgoraError, Result};

/// Sorting concept: per-user label weights
#[derive(Clone)]
pub struct Sorting {
    profiles: MongoCollection<SortProfileDoc>,
}

impl Sorting {
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            profiles: client.collection(SORT_PROFILE_COLLECTION).await?,
        })
    }

    /// Create an empty weight profile; `NotAllowed` when one already exists
    pub async fn register(&self, owner: &str) -> Result<String> {
        let filter = doc! { "owner": owner };
        let existing = self.profiles.find_one(filter.clone()).await?;
        assert_not_exists(&existing, "sort profile", &filter)?;

        let id = self.profiles.insert_one(SortProfileDoc::new(owner)).await?;

        Ok(id.to_hex())
    }

    async fn profile_of(&self, owner: &str) -> Result<SortProfileDoc> {
        let filter = doc! { "owner": owner };
        let profile = self.profiles.find_one(filter.clone()).await?;

        assert_exists(profile, "sort profile", &filter)
    }

    /// Weight a label for the first time; `NotAllowed` when already weighted
    pub async fn add_weight(&self, label: &str, weight: f64, owner: &str) -> Result<()> {
        if label.is_empty() {
            return Err(AgoraError::BadValues("label must be non-empty".into()));
        }

        let profile = self.profile_of(owner).await?;

        if profile.weights.contains_key(label) {
            return Err(AgoraError::already_exists(
                "weight",
                &doc! { "owner": owner, "label": label },
            ));
        }

        self.profiles
            .update_one(
                doc! { "owner": owner },
                doc! { "$set": { format!("weights.{}", label): weight } },
            )
            .await?;

        Ok(())
    }

    /// Update an existing weight; `NotFound` when the label is not weighted
    pub async fn set_weight(&self, label: &str, weight: f64, owner: &str) -> Result<()> {
        let profile = self.profile_of(owner).await?;

        if !profile.weights.contains_key(label) {
            return Err(AgoraError::not_found(
                "weight",
                &doc! { "owner": owner, "label": label },
            ));
        }

        self.profiles
            .update_one(
                doc! { "owner": owner },
                doc! { "$set": { format!("weights.{}", label): weight } },
            )
            .await?;

        Ok(())
    }

    /// Read a weight; `NotFound` when the label is not weighted
    pub async fn get_weight(&self, label: &str, owner: &str) -> Result<f64> {
        let profile = self.profile_of(owner).await?;

        profile.weights.get(label).copied().ok_or_else(|| {
            AgoraError::not_found("weight", &doc! { "owner": owner, "label": label })
        })
    }

    /// Drop a weight; `NotFound` when the label is not weighted
    pub async fn remove_weight(&self, label: &str, owner: &str) -> Result<()> {
        let profile = self.profile_of(owner).await?;

        if !profile.weights.contains_key(label) {
            return Err(AgoraError::not_found(
                "weight",
                &doc! { "owner": owner, "label": label },
            ));
        }

        self.profiles
            .update_one(
                doc! { "owner": owner },
                doc! { "$unset": { format!("weights.{}", label): "" } },
            )
            .await?;

        Ok(())
    }

    /// Rank candidate resources by the owner's weight profile.
    ///
    /// Declared but not implemented; always fails hard and mutates nothing.
    pub async fn rank(&self, _owner: &str, _resource_ids: &[String]) -> Result<Vec<String>> {
        Err(AgoraError::NotImplemented("feed ranking"))
    }
}
