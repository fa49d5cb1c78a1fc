//! HTTP routes for posting (feeds and posts)

use bson::Document;
use hyper::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::routes::format::{json_response, present_posts, SuccessResponse};
use crate::routes::{Access, BoxBody, RequestContext, RouteDef};
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Deserialize)]
pub struct RegisterFeedBody {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct PostBody {
    pub content: String,
    /// Optional display options, stored opaque
    #[serde(default)]
    pub options: Option<Document>,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef {
            method: Method::POST,
            pattern: "/feeds",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_register_feed(ctx, state)),
        },
        RouteDef {
            method: Method::DELETE,
            pattern: "/feeds/{name}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_unregister_feed(ctx, state)),
        },
        RouteDef {
            method: Method::POST,
            pattern: "/feeds/{name}/posts",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_post(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/feeds/{name}/posts",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_list_posts(ctx, state)),
        },
        RouteDef {
            method: Method::DELETE,
            pattern: "/feeds/{name}/posts/{post_id}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_unpost(ctx, state)),
        },
    ]
}

async fn handle_register_feed(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let body: RegisterFeedBody = ctx.json()?;

    let id = state.posting.register_feed(&body.name).await?;

    Ok(json_response(StatusCode::CREATED, &CreatedResponse { id }))
}

async fn handle_unregister_feed(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let name = ctx.param("name")?;

    state.posting.unregister_feed(name).await?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("feed removed"),
    ))
}

async fn handle_post(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let name = ctx.param("name")?.to_string();
    let body: PostBody = ctx.json()?;

    let id = state
        .posting
        .post(&name, &session.sub, &body.content, body.options)
        .await?;

    Ok(json_response(StatusCode::CREATED, &CreatedResponse { id }))
}

async fn handle_list_posts(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let name = ctx.param("name")?;

    let posts = state.posting.get_posts(name).await?;
    let views = present_posts(&state, posts).await?;

    Ok(json_response(StatusCode::OK, &views))
}

async fn handle_unpost(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let name = ctx.param("name")?;
    let post_id = ctx.param("post_id")?;

    state.posting.unpost(name, post_id).await?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("post removed"),
    ))
}
