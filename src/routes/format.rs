//! Response formatting and the error registry
//!
//! Maps raw stored documents to user-facing shapes (stored user ids are
//! substituted with display names, tolerating dangling references) and
//! converts every [`AgoraError`] into a status code + JSON body. Error
//! variants that carry a subject user id get the id resolved to a display
//! name before the message is rendered; variants without an enrichment
//! step fall through with their raw message.

use bson::DateTime;
use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::{Response, StatusCode};
use serde::Serialize;
use tracing::warn;

use crate::concepts::DELETED_USER;
use crate::db::schemas::{FriendRequestDoc, PostDoc};
use crate::routes::BoxBody;
use crate::server::AppState;
use crate::types::{AgoraError, Result};

// =============================================================================
// Response helpers
// =============================================================================

pub fn full_body(data: impl Into<Bytes>) -> BoxBody {
    Full::new(data.into()).map_err(|never| match never {}).boxed()
}

pub fn empty_body() -> BoxBody {
    Full::new(Bytes::new()).map_err(|never| match never {}).boxed()
}

/// Serialize a body as JSON with CORS headers
pub fn json_response<T: Serialize>(status: StatusCode, body: &T) -> Response<BoxBody> {
    let json = serde_json::to_string(body).unwrap_or_else(|_| "{}".to_string());

    Response::builder()
        .status(status)
        .header("Content-Type", "application/json")
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PUT, PATCH, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .body(full_body(json))
        .unwrap()
}

pub fn cors_preflight() -> Response<BoxBody> {
    Response::builder()
        .status(StatusCode::NO_CONTENT)
        .header("Access-Control-Allow-Origin", "*")
        .header("Access-Control-Allow-Methods", "GET, POST, PUT, PATCH, DELETE, OPTIONS")
        .header("Access-Control-Allow-Headers", "Content-Type, Authorization")
        .header("Access-Control-Max-Age", "86400")
        .body(empty_body())
        .unwrap()
}

/// JSON error body
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
}

/// Uniform success acknowledgement for mutations with no payload
#[derive(Debug, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
    pub message: String,
}

impl SuccessResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

// =============================================================================
// Error registry
// =============================================================================

/// Render an error as an HTTP response, enriching it first
pub async fn error_response(state: &AppState, err: AgoraError) -> Response<BoxBody> {
    let err = enrich(state, err).await;
    let status = err.status_code();

    warn!("{} -> {}", err, status);

    json_response(
        status,
        &ErrorBody {
            error: err.to_string(),
            code: err.code(),
        },
    )
}

/// Per-variant enrichment: errors carrying a subject user id get the id
/// resolved to a display name. Other variants pass through untouched.
async fn enrich(state: &AppState, err: AgoraError) -> AgoraError {
    match err {
        AgoraError::NotFound {
            entity,
            detail,
            subject: Some(id),
        } => {
            let name = resolve_display_name(state, &id).await;
            AgoraError::NotFound {
                entity,
                detail: format!("{} (user: {})", detail, name),
                subject: Some(id),
            }
        }
        AgoraError::NotAllowed {
            entity,
            detail,
            subject: Some(id),
        } => {
            let name = resolve_display_name(state, &id).await;
            AgoraError::NotAllowed {
                entity,
                detail: format!("{} (user: {})", detail, name),
                subject: Some(id),
            }
        }
        other => other,
    }
}

async fn resolve_display_name(state: &AppState, id: &str) -> String {
    state
        .authentication
        .ids_to_usernames(&[id.to_string()])
        .await
        .ok()
        .and_then(|mut names| names.pop())
        .unwrap_or_else(|| DELETED_USER.to_string())
}

// =============================================================================
// Presenters: stored ids -> user-facing shapes
// =============================================================================

fn rfc3339(ts: Option<DateTime>) -> String {
    ts.and_then(|t| t.try_to_rfc3339_string().ok())
        .unwrap_or_default()
}

/// Post with its author id resolved to a display name
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: String,
    pub author: String,
    pub author_name: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<bson::Document>,
    pub posted_at: String,
}

pub async fn present_posts(state: &AppState, posts: Vec<PostDoc>) -> Result<Vec<PostView>> {
    let author_ids: Vec<String> = posts.iter().map(|p| p.author.clone()).collect();
    let names = state.authentication.ids_to_usernames(&author_ids).await?;

    Ok(posts
        .into_iter()
        .zip(names)
        .map(|(post, author_name)| PostView {
            id: post._id.map(|oid| oid.to_hex()).unwrap_or_default(),
            author: post.author,
            author_name,
            content: post.content,
            options: post.options,
            posted_at: rfc3339(post.metadata.created_at),
        })
        .collect())
}

/// Friend entry: id plus resolved display name
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendView {
    pub id: String,
    pub username: String,
}

pub async fn present_friends(state: &AppState, ids: Vec<String>) -> Result<Vec<FriendView>> {
    let names = state.authentication.ids_to_usernames(&ids).await?;

    Ok(ids
        .into_iter()
        .zip(names)
        .map(|(id, username)| FriendView { id, username })
        .collect())
}

/// Pending friend request with both endpoints resolved
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequestView {
    pub from: String,
    pub from_name: String,
    pub to: String,
    pub to_name: String,
    pub requested_at: String,
}

pub async fn present_requests(
    state: &AppState,
    requests: Vec<FriendRequestDoc>,
) -> Result<Vec<FriendRequestView>> {
    let mut ids = Vec::with_capacity(requests.len() * 2);
    for request in &requests {
        ids.push(request.from.clone());
        ids.push(request.to.clone());
    }
    let names = state.authentication.ids_to_usernames(&ids).await?;

    Ok(requests
        .into_iter()
        .zip(names.chunks(2))
        .map(|(request, pair)| FriendRequestView {
            from: request.from,
            from_name: pair.first().cloned().unwrap_or_else(|| DELETED_USER.into()),
            to: request.to,
            to_name: pair.get(1).cloned().unwrap_or_else(|| DELETED_USER.into()),
            requested_at: rfc3339(request.metadata.created_at),
        })
        .collect())
}
