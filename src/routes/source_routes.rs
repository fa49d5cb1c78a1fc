//! HTTP routes for sourcing

use hyper::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::schemas::{ContentDoc, SourceDoc, SourceKind};
use crate::routes::format::{json_response, SuccessResponse};
use crate::routes::{Access, BoxBody, RequestContext, RouteDef};
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Deserialize)]
pub struct RegisterSourceBody {
    pub kind: SourceKind,
    pub uri: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Source shape exposed to callers
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceView {
    pub id: String,
    pub kind: &'static str,
    pub uri: String,
}

impl From<SourceDoc> for SourceView {
    fn from(doc: SourceDoc) -> Self {
        Self {
            id: doc._id.map(|oid| oid.to_hex()).unwrap_or_default(),
            kind: doc.kind.as_str(),
            uri: doc.uri,
        }
    }
}

/// Cached content shape exposed to callers
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentView {
    pub id: String,
    pub source: String,
    pub body: String,
}

impl From<ContentDoc> for ContentView {
    fn from(doc: ContentDoc) -> Self {
        Self {
            id: doc._id.map(|oid| oid.to_hex()).unwrap_or_default(),
            source: doc.source,
            body: doc.body,
        }
    }
}

pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef {
            method: Method::POST,
            pattern: "/sources",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_register(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/sources",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_list(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/sources/{id}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_lookup(ctx, state)),
        },
        RouteDef {
            method: Method::DELETE,
            pattern: "/sources/{id}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_unregister(ctx, state)),
        },
        RouteDef {
            method: Method::POST,
            pattern: "/sources/{id}/refresh",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_refresh(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/sources/{id}/contents",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_contents(ctx, state)),
        },
    ]
}

async fn handle_register(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let body: RegisterSourceBody = ctx.json()?;

    let id = state
        .sourcing
        .register(body.kind, &body.uri, &session.sub)
        .await?;

    Ok(json_response(StatusCode::CREATED, &CreatedResponse { id }))
}

async fn handle_list(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;

    let sources = state.sourcing.list(&session.sub).await?;
    let views: Vec<SourceView> = sources.into_iter().map(SourceView::from).collect();

    Ok(json_response(StatusCode::OK, &views))
}

async fn handle_lookup(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let id = ctx.param("id")?;

    let source = state.sourcing.lookup(id, &session.sub).await?;

    Ok(json_response(StatusCode::OK, &SourceView::from(source)))
}

async fn handle_unregister(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let id = ctx.param("id")?;

    state.sourcing.unregister(id, &session.sub).await?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("source removed"),
    ))
}

async fn handle_refresh(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let id = ctx.param("id")?;

    // Always NotImplemented; surfaced as 501, never a silent no-op.
    state.sourcing.refresh(id, &session.sub).await?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("source refreshed"),
    ))
}

async fn handle_contents(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let id = ctx.param("id")?;

    let contents = state.sourcing.get_contents(id, &session.sub).await?;
    let views: Vec<ContentView> = contents.into_iter().map(ContentView::from).collect();

    Ok(json_response(StatusCode::OK, &views))
}
