//! Templating concept
//!
//! Template registration plus render records. The rendering step that
//! would combine a template with a slot-filling map is not implemented and
//! always fails hard; the renders collection is only ever read.

use std::collections::HashMap;

use bson::doc;

use crate::concepts::parse_object_id;
use crate::db::mongo::assert_exists;
use crate::db::schemas::{RenderDoc, TemplateDoc, RENDER_COLLECTION, TEMPLATE_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::types::{AgoraError, Result};

/// Templating concept: templates and render records
#[derive(Clone)]
pub struct Templating {
    templates: MongoCollection<TemplateDoc>,
    renders: MongoCollection<RenderDoc>,
}

impl Templating {
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            templates: client.collection(TEMPLATE_COLLECTION).await?,
            renders: client.collection(RENDER_COLLECTION).await?,
        })
    }

    /// Register a template; returns the new id
    pub async fn add(
        &self,
        owner: &str,
        kind: &str,
        resource_kinds: Vec<String>,
        content: &str,
    ) -> Result<String> {
        if kind.is_empty() {
            return Err(AgoraError::BadValues(
                "template kind must be non-empty".into(),
            ));
        }

        let id = self
            .templates
            .insert_one(TemplateDoc::new(owner, kind, resource_kinds, content))
            .await?;

        Ok(id.to_hex())
    }

    /// Remove an owned template: `NotFound` when absent, `NotAllowed` when
    /// owned by another user
    pub async fn remove(&self, id: &str, owner: &str) -> Result<()> {
        let template = self.get(id).await?;

        if template.owner != owner {
            return Err(
                AgoraError::not_allowed("template", "owned by another user")
                    .with_subject(template.owner.clone()),
            );
        }

        if let Some(oid) = template._id {
            self.templates.delete_one(doc! { "_id": oid }).await?;
        }

        Ok(())
    }

    /// Fetch a template; `NotFound` when absent
    pub async fn get(&self, id: &str) -> Result<TemplateDoc> {
        let oid = parse_object_id(id, "template")?;
        let filter = doc! { "_id": oid };
        let template = self.templates.find_one(filter.clone()).await?;

        assert_exists(template, "template", &filter)
    }

    /// All templates of the owner
    pub async fn list(&self, owner: &str) -> Result<Vec<TemplateDoc>> {
        self.templates.find_many(doc! { "owner": owner }).await
    }

    /// Render a template against a slot → content mapping.
    ///
    /// Not implemented; always fails hard and mutates nothing.
    pub async fn render(
        &self,
        _id: &str,
        _owner: &str,
        _slots: &HashMap<String, String>,
    ) -> Result<String> {
        Err(AgoraError::NotImplemented("template rendering"))
    }

    /// Render records of the owner
    pub async fn list_renders(&self, owner: &str) -> Result<Vec<RenderDoc>> {
        self.renders.find_many(doc! { "owner": owner }).await
    }
}
