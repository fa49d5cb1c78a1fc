//! Authentication concept
//!
//! Owns the users collection: registration, credential checks, lookups,
//! and the best-effort id → username batch resolution the formatting layer
//! leans on.

use std::collections::HashMap;

use bson::{doc, oid::ObjectId};
use tracing::info;

use crate::auth::{hash_password, verify_password};
use crate::concepts::parse_object_id;
use crate::db::mongo::{assert_exists, assert_not_exists};
use crate::db::schemas::{UserDoc, UserView, USER_COLLECTION};
use crate::db::{MongoClient, MongoCollection};
use crate::types::{AgoraError, Result};

/// Sentinel display name for ids that no longer resolve to a user
pub const DELETED_USER: &str = "DELETED_USER";

/// Authentication concept: user identity and credential checks
#[derive(Clone)]
pub struct Authentication {
    users: MongoCollection<UserDoc>,
}

impl Authentication {
    pub async fn new(client: &MongoClient) -> Result<Self> {
        Ok(Self {
            users: client.collection(USER_COLLECTION).await?,
        })
    }

    /// Register a new user; returns the new id
    pub async fn register(&self, username: &str, password: &str) -> Result<String> {
        if username.is_empty() || password.is_empty() {
            return Err(AgoraError::BadValues(
                "username and password must be non-empty".into(),
            ));
        }

        let filter = doc! { "username": username };
        let existing = self.users.find_one(filter.clone()).await?;
        assert_not_exists(&existing, "user", &filter)?;

        let password_hash = hash_password(password)?;
        let id = self
            .users
            .insert_one(UserDoc::new(username.to_string(), password_hash))
            .await?;

        info!("Registered user {} ({})", username, id.to_hex());

        Ok(id.to_hex())
    }

    /// Check a username/password pair; `NotFound` when they do not jointly
    /// match a user
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<UserView> {
        let filter = doc! { "username": username };
        let user = self.users.find_one(filter).await?;

        match user {
            Some(u) if verify_password(password, &u.password_hash)? => Ok(UserView::from(&u)),
            _ => Err(AgoraError::not_found(
                "user",
                &doc! { "username": username, "password": "<redacted>" },
            )),
        }
    }

    /// Look up a user by id; the view carries no credential material
    pub async fn get_user_by_id(&self, id: &str) -> Result<UserView> {
        let oid = parse_object_id(id, "user")?;
        let filter = doc! { "_id": oid };
        let user = self.users.find_one(filter.clone()).await?;
        let user = assert_exists(user, "user", &filter)?;

        Ok(UserView::from(&user))
    }

    /// Look up a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<UserView> {
        let filter = doc! { "username": username };
        let user = self.users.find_one(filter.clone()).await?;
        let user = assert_exists(user, "user", &filter)?;

        Ok(UserView::from(&user))
    }

    /// Best-effort batch id → username resolution.
    ///
    /// Unresolvable or malformed ids map to [`DELETED_USER`]; one stale
    /// reference must never fail a whole listing.
    pub async fn ids_to_usernames(&self, ids: &[String]) -> Result<Vec<String>> {
        let oids: Vec<ObjectId> = ids
            .iter()
            .filter_map(|id| ObjectId::parse_str(id).ok())
            .collect();

        let found = self
            .users
            .find_many(doc! { "_id": { "$in": oids } })
            .await?;

        let by_id: HashMap<String, String> = found
            .into_iter()
            .filter_map(|u| u._id.map(|oid| (oid.to_hex(), u.username)))
            .collect();

        Ok(ids
            .iter()
            .map(|id| {
                by_id
                    .get(id)
                    .cloned()
                    .unwrap_or_else(|| DELETED_USER.to_string())
            })
            .collect())
    }

    /// Change a username; `NotAllowed` when the name is taken by another user
    pub async fn update_username(&self, id: &str, new_username: &str) -> Result<()> {
        if new_username.is_empty() {
            return Err(AgoraError::BadValues("username must be non-empty".into()));
        }

        let oid = parse_object_id(id, "user")?;
        let id_filter = doc! { "_id": oid };
        let user = self.users.find_one(id_filter.clone()).await?;
        assert_exists(user, "user", &id_filter)?;

        let name_filter = doc! { "username": new_username };
        if let Some(holder) = self.users.find_one(name_filter.clone()).await? {
            if holder._id != Some(oid) {
                return Err(AgoraError::already_exists("user", &name_filter));
            }
        }

        self.users
            .update_one(id_filter, doc! { "$set": { "username": new_username } })
            .await?;

        Ok(())
    }

    /// Change a password; `NotFound` unless id and current password jointly
    /// match
    pub async fn update_password(&self, id: &str, current: &str, new_password: &str) -> Result<()> {
        if new_password.is_empty() {
            return Err(AgoraError::BadValues("password must be non-empty".into()));
        }

        let oid = parse_object_id(id, "user")?;
        let filter = doc! { "_id": oid };
        let user = self.users.find_one(filter.clone()).await?;

        let matches = match &user {
            Some(u) => verify_password(current, &u.password_hash)?,
            None => false,
        };
        if !matches {
            return Err(AgoraError::not_found(
                "user",
                &doc! { "_id": oid, "password": "<redacted>" },
            ));
        }

        let password_hash = hash_password(new_password)?;
        self.users
            .update_one(filter, doc! { "$set": { "password_hash": password_hash } })
            .await?;

        Ok(())
    }

    /// Remove a user unconditionally; session ownership is the caller's
    /// responsibility
    pub async fn delete(&self, id: &str) -> Result<()> {
        let oid = parse_object_id(id, "user")?;
        self.users.delete_one(doc! { "_id": oid }).await?;

        info!("Deleted user {}", id);

        Ok(())
    }
}
