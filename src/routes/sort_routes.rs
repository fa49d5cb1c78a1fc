//! HTTP routes for sorting (weight profiles and ranking)

use hyper::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::routes::format::{json_response, SuccessResponse};
use crate::routes::{Access, BoxBody, RequestContext, RouteDef};
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Deserialize)]
pub struct AddWeightBody {
    pub label: String,
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct SetWeightBody {
    pub weight: f64,
}

#[derive(Debug, Deserialize)]
pub struct RankBody {
    pub resources: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct WeightResponse {
    pub label: String,
    pub weight: f64,
}

pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef {
            method: Method::POST,
            pattern: "/sorts",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_register(ctx, state)),
        },
        RouteDef {
            method: Method::POST,
            pattern: "/sorts/weights",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_add_weight(ctx, state)),
        },
        RouteDef {
            method: Method::PUT,
            pattern: "/sorts/weights/{label}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_set_weight(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/sorts/weights/{label}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_get_weight(ctx, state)),
        },
        RouteDef {
            method: Method::DELETE,
            pattern: "/sorts/weights/{label}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_remove_weight(ctx, state)),
        },
        RouteDef {
            method: Method::POST,
            pattern: "/sorts/rank",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_rank(ctx, state)),
        },
    ]
}

async fn handle_register(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;

    let id = state.sorting.register(&session.sub).await?;

    Ok(json_response(StatusCode::CREATED, &CreatedResponse { id }))
}

async fn handle_add_weight(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let body: AddWeightBody = ctx.json()?;

    state
        .sorting
        .add_weight(&body.label, body.weight, &session.sub)
        .await?;

    Ok(json_response(
        StatusCode::CREATED,
        &SuccessResponse::new("weight added"),
    ))
}

async fn handle_set_weight(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let label = ctx.param("label")?.to_string();
    let body: SetWeightBody = ctx.json()?;

    state
        .sorting
        .set_weight(&label, body.weight, &session.sub)
        .await?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("weight updated"),
    ))
}

async fn handle_get_weight(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let label = ctx.param("label")?;

    let weight = state.sorting.get_weight(label, &session.sub).await?;

    Ok(json_response(
        StatusCode::OK,
        &WeightResponse {
            label: label.to_string(),
            weight,
        },
    ))
}

async fn handle_remove_weight(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let label = ctx.param("label")?;

    state.sorting.remove_weight(label, &session.sub).await?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("weight removed"),
    ))
}

async fn handle_rank(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let body: RankBody = ctx.json()?;

    // Always NotImplemented; surfaced as 501, never a silent no-op.
    let ranked = state.sorting.rank(&session.sub, &body.resources).await?;

    Ok(json_response(StatusCode::OK, &ranked))
}
