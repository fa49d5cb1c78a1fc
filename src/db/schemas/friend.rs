//! Friendship and friend-request document schemas
//!
//! A friendship edge stores its endpoints as a lexicographically ordered
//! pair, so the unordered-pair invariant reduces to a unique compound
//! index. Friend requests keep their direction; terminal rows (accepted or
//! rejected) stay behind as an append-only log.

use bson::{doc, oid::ObjectId, Document};
use mongodb::options::IndexOptions;
use serde::{Deserialize, Serialize};

use crate::db::mongo::{IntoIndexes, MutMetadata};
use crate::db::schemas::Metadata;

/// Collection name for friendship edges
pub const FRIENDSHIP_COLLECTION: &str = "friendships";

/// Collection name for friend requests
pub const FRIEND_REQUEST_COLLECTION: &str = "friend_requests";

/// Order a pair of user ids lexicographically.
///
/// Every friendship edge is stored with `user1 < user2`, so any two ids
/// address at most one edge regardless of who initiated.
pub fn ordered_pair(a: &str, b: &str) -> (String, String) {
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

/// Friendship edge between two users
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FriendshipDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Lexicographically smaller endpoint
    pub user1: String,

    /// Lexicographically larger endpoint
    pub user2: String,
}

impl FriendshipDoc {
    /// Create a new edge; endpoints are canonicalized here
    pub fn new(a: &str, b: &str) -> Self {
        let (user1, user2) = ordered_pair(a, b);
        Self {
            _id: None,
            metadata: Metadata::new(),
            user1,
            user2,
        }
    }

    /// The endpoint opposite `user`, if `user` is part of this edge
    pub fn other(&self, user: &str) -> Option<&str> {
        if self.user1 == user {
            Some(&self.user2)
        } else if self.user2 == user {
            Some(&self.user1)
        } else {
            None
        }
    }
}

impl IntoIndexes for FriendshipDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        vec![(
            doc! { "user1": 1, "user2": 1 },
            Some(
                IndexOptions::builder()
                    .unique(true)
                    .name("pair_unique".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for FriendshipDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

/// Status of a friend request
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
        }
    }
}

/// Friend request document
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct FriendRequestDoc {
    /// MongoDB document ID
    #[serde(skip_serializing_if = "Option::is_none")]
    pub _id: Option<ObjectId>,

    /// Common metadata (created_at, updated_at)
    #[serde(default)]
    pub metadata: Metadata,

    /// Requesting user id
    pub from: String,

    /// Requested user id
    pub to: String,

    /// Request status
    pub status: RequestStatus,
}

impl FriendRequestDoc {
    pub fn new(from: &str, to: &str, status: RequestStatus) -> Self {
        Self {
            _id: None,
            metadata: Metadata::new(),
            from: from.to_string(),
            to: to.to_string(),
            status,
        }
    }
}

impl IntoIndexes for FriendRequestDoc {
    fn into_indices() -> Vec<(Document, Option<IndexOptions>)> {
        // Pending-pair uniqueness is direction-agnostic, so it is enforced
        // by pre-check rather than an index; this just speeds the lookups.
        vec![(
            doc! { "from": 1, "to": 1, "status": 1 },
            Some(
                IndexOptions::builder()
                    .name("request_lookup".to_string())
                    .build(),
            ),
        )]
    }
}

impl MutMetadata for FriendRequestDoc {
    fn mut_metadata(&mut self) -> &mut Metadata {
        &mut self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordered_pair_is_direction_agnostic() {
        assert_eq!(ordered_pair("b", "a"), ordered_pair("a", "b"));
        assert_eq!(ordered_pair("a", "b"), ("a".to_string(), "b".to_string()));
    }

    #[test]
    fn edge_knows_its_other_endpoint() {
        let edge = FriendshipDoc::new("zoe", "ada");
        assert_eq!(edge.user1, "ada");
        assert_eq!(edge.other("ada"), Some("zoe"));
        assert_eq!(edge.other("zoe"), Some("ada"));
        assert_eq!(edge.other("eve"), None);
    }
}
