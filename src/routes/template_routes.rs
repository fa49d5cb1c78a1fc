//! HTTP routes for templating

use std::collections::HashMap;
use std::sync::Arc;

use hyper::{Method, StatusCode};
use serde::{Deserialize, Serialize};

use crate::db::schemas::{RenderDoc, TemplateDoc};
use crate::routes::format::{json_response, SuccessResponse};
use crate::routes::{Access, BoxBody, RequestContext, RouteDef};
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddTemplateBody {
    pub kind: String,
    #[serde(default)]
    pub resource_kinds: Vec<String>,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct RenderBody {
    /// Slot name -> content id
    #[serde(default)]
    pub slots: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Template shape exposed to callers
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateView {
    pub id: String,
    pub kind: String,
    pub resource_kinds: Vec<String>,
    pub content: String,
}

impl From<TemplateDoc> for TemplateView {
    fn from(doc: TemplateDoc) -> Self {
        Self {
            id: doc._id.map(|oid| oid.to_hex()).unwrap_or_default(),
            kind: doc.kind,
            resource_kinds: doc.resource_kinds,
            content: doc.content,
        }
    }
}

/// Render record shape exposed to callers
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderView {
    pub id: String,
    pub template: String,
    pub slots: HashMap<String, String>,
}

impl From<RenderDoc> for RenderView {
    fn from(doc: RenderDoc) -> Self {
        Self {
            id: doc._id.map(|oid| oid.to_hex()).unwrap_or_default(),
            template: doc.template,
            slots: doc.slots,
        }
    }
}

pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef {
            method: Method::POST,
            pattern: "/templates",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_add(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/templates",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_list(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/templates/{id}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_get(ctx, state)),
        },
        RouteDef {
            method: Method::DELETE,
            pattern: "/templates/{id}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_remove(ctx, state)),
        },
        RouteDef {
            method: Method::POST,
            pattern: "/templates/{id}/render",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_render(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/renders",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_list_renders(ctx, state)),
        },
    ]
}

async fn handle_add(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let body: AddTemplateBody = ctx.json()?;

    let id = state
        .templating
        .add(&session.sub, &body.kind, body.resource_kinds, &body.content)
        .await?;

    Ok(json_response(StatusCode::CREATED, &CreatedResponse { id }))
}

async fn handle_list(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;

    let templates = state.templating.list(&session.sub).await?;
    let views: Vec<TemplateView> = templates.into_iter().map(TemplateView::from).collect();

    Ok(json_response(StatusCode::OK, &views))
}

async fn handle_get(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let id = ctx.param("id")?;

    let template = state.templating.get(id).await?;

    Ok(json_response(StatusCode::OK, &TemplateView::from(template)))
}

async fn handle_remove(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let id = ctx.param("id")?;

    state.templating.remove(id, &session.sub).await?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("template removed"),
    ))
}

async fn handle_render(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let id = ctx.param("id")?.to_string();
    let body: RenderBody = ctx.json()?;

    // Always NotImplemented; surfaced as 501, never a silent no-op.
    let rendered = state.templating.render(&id, &session.sub, &body.slots).await?;

    Ok(json_response(StatusCode::OK, &rendered))
}

async fn handle_list_renders(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;

    let renders = state.templating.list_renders(&session.sub).await?;
    let views: Vec<RenderView> = renders.into_iter().map(RenderView::from).collect();

    Ok(json_response(StatusCode::OK, &views))
}
