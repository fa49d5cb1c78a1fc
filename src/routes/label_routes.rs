//! HTTP routes for labelling
//!
//! Tagging a resource may carry an optional weight, in which case the
//! route composes two concept actions: `labelling.add` then
//! `sorting.add_weight`. The concepts stay independent; the composition
//! lives here.

use hyper::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::db::schemas::LabelDoc;
use crate::routes::format::{json_response, SuccessResponse};
use crate::routes::{Access, BoxBody, RequestContext, RouteDef};
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Deserialize)]
pub struct RegisterLabelBody {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TagResourceBody {
    pub resource: String,
    /// Optional sort weight for this label, applied after tagging
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

/// Label shape exposed to callers
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelView {
    pub id: String,
    pub name: String,
    pub resources: Vec<String>,
}

impl From<LabelDoc> for LabelView {
    fn from(doc: LabelDoc) -> Self {
        Self {
            id: doc._id.map(|oid| oid.to_hex()).unwrap_or_default(),
            name: doc.name,
            resources: doc.resources,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ResourceLabelsResponse {
    pub labels: Vec<String>,
}

pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef {
            method: Method::POST,
            pattern: "/labels",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_register(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/labels",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_list(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/labels/{name}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_lookup(ctx, state)),
        },
        RouteDef {
            method: Method::DELETE,
            pattern: "/labels/{name}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_unregister(ctx, state)),
        },
        RouteDef {
            method: Method::POST,
            pattern: "/labels/{name}/resources",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_tag(ctx, state)),
        },
        RouteDef {
            method: Method::DELETE,
            pattern: "/labels/{name}/resources/{resource}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_untag(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/resources/{resource}/labels",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_resource_labels(ctx, state)),
        },
    ]
}

async fn handle_register(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let body: RegisterLabelBody = ctx.json()?;

    let id = state.labelling.register(&body.name, &session.sub).await?;

    Ok(json_response(StatusCode::CREATED, &CreatedResponse { id }))
}

async fn handle_list(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;

    let labels = state.labelling.list(&session.sub).await?;
    let views: Vec<LabelView> = labels.into_iter().map(LabelView::from).collect();

    Ok(json_response(StatusCode::OK, &views))
}

async fn handle_lookup(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let name = ctx.param("name")?;

    let label = state.labelling.lookup(name, &session.sub).await?;

    Ok(json_response(StatusCode::OK, &LabelView::from(label)))
}

async fn handle_unregister(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let name = ctx.param("name")?;

    state.labelling.unregister(name, &session.sub).await?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("label removed"),
    ))
}

async fn handle_tag(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let name = ctx.param("name")?.to_string();
    let body: TagResourceBody = ctx.json()?;

    state
        .labelling
        .add(&body.resource, &name, &session.sub)
        .await?;

    // Composed action: the tag may carry a weight for the sorting profile.
    if let Some(weight) = body.weight {
        state
            .sorting
            .add_weight(&name, weight, &session.sub)
            .await?;
    }

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("resource tagged"),
    ))
}

async fn handle_untag(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let name = ctx.param("name")?;
    let resource = ctx.param("resource")?;

    state
        .labelling
        .remove(resource, name, &session.sub)
        .await?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("resource untagged"),
    ))
}

async fn handle_resource_labels(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let resource = ctx.param("resource")?;

    let labels = state.labelling.get(resource, &session.sub).await?;

    Ok(json_response(StatusCode::OK, &ResourceLabelsResponse { labels }))
}
