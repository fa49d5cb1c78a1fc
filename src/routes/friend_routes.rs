//! HTTP routes for friending
//!
//! The acting user is always the session user; requests are addressed by
//! the other endpoint's user id.

use hyper::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::routes::format::{json_response, present_friends, present_requests, SuccessResponse};
use crate::routes::{Access, BoxBody, RequestContext, RouteDef};
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Deserialize)]
pub struct CreateRequestBody {
    /// User id the request is sent to
    pub to: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequestBody {
    /// User id the pending request came from
    pub from: String,
}

#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: String,
}

pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef {
            method: Method::GET,
            pattern: "/friends",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_list_friends(ctx, state)),
        },
        RouteDef {
            method: Method::DELETE,
            pattern: "/friends/{user_id}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_remove_friend(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/friends/requests",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_list_requests(ctx, state)),
        },
        RouteDef {
            method: Method::POST,
            pattern: "/friends/requests",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_create_request(ctx, state)),
        },
        RouteDef {
            method: Method::POST,
            pattern: "/friends/requests/accept",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_accept_request(ctx, state)),
        },
        RouteDef {
            method: Method::POST,
            pattern: "/friends/requests/reject",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_reject_request(ctx, state)),
        },
        RouteDef {
            method: Method::DELETE,
            pattern: "/friends/requests/{user_id}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_remove_request(ctx, state)),
        },
    ]
}

async fn handle_list_friends(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;

    let ids = state.friending.get_friends(&session.sub).await?;
    let friends = present_friends(&state, ids).await?;

    Ok(json_response(StatusCode::OK, &friends))
}

async fn handle_remove_friend(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let friend = ctx.param("user_id")?;

    state
        .friending
        .remove_friend(&session.sub, friend)
        .await
        .map_err(|e| e.with_subject(friend))?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("friend removed"),
    ))
}

async fn handle_list_requests(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;

    let pending = state.friending.get_requests(&session.sub).await?;
    let requests = present_requests(&state, pending).await?;

    Ok(json_response(StatusCode::OK, &requests))
}

async fn handle_create_request(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let body: CreateRequestBody = ctx.json()?;

    let id = state
        .friending
        .create_request(&session.sub, &body.to)
        .await
        .map_err(|e| e.with_subject(&body.to))?;

    Ok(json_response(StatusCode::CREATED, &CreatedResponse { id }))
}

async fn handle_accept_request(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let body: AnswerRequestBody = ctx.json()?;

    state
        .friending
        .accept_request(&body.from, &session.sub)
        .await
        .map_err(|e| e.with_subject(&body.from))?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("friend request accepted"),
    ))
}

async fn handle_reject_request(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let body: AnswerRequestBody = ctx.json()?;

    state
        .friending
        .reject_request(&body.from, &session.sub)
        .await
        .map_err(|e| e.with_subject(&body.from))?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("friend request rejected"),
    ))
}

async fn handle_remove_request(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;
    let to = ctx.param("user_id")?;

    state
        .friending
        .remove_request(&session.sub, to)
        .await
        .map_err(|e| e.with_subject(to))?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("friend request withdrawn"),
    ))
}
