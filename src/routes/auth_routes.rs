//! HTTP routes for authentication
//!
//! - POST   /auth/register  - create a user, return a session token
//! - POST   /auth/login     - check credentials, return a session token
//! - GET    /auth/me        - current user from the session
//! - PATCH  /auth/username  - change username
//! - PATCH  /auth/password  - change password (current password required)
//! - DELETE /auth/account   - delete the session user
//! - GET    /users/{id}     - look up another user

use hyper::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::routes::format::{json_response, SuccessResponse};
use crate::routes::{Access, BoxBody, RequestContext, RouteDef};
use crate::server::AppState;
use crate::types::Result;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUsernameRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub id: String,
    pub username: String,
    pub expires_at: u64,
}

pub fn routes() -> Vec<RouteDef> {
    vec![
        RouteDef {
            method: Method::POST,
            pattern: "/auth/register",
            access: Access::Public,
            handler: |ctx, state| Box::pin(handle_register(ctx, state)),
        },
        RouteDef {
            method: Method::POST,
            pattern: "/auth/login",
            access: Access::Public,
            handler: |ctx, state| Box::pin(handle_login(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/auth/me",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_me(ctx, state)),
        },
        RouteDef {
            method: Method::PATCH,
            pattern: "/auth/username",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_update_username(ctx, state)),
        },
        RouteDef {
            method: Method::PATCH,
            pattern: "/auth/password",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_update_password(ctx, state)),
        },
        RouteDef {
            method: Method::DELETE,
            pattern: "/auth/account",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_delete_account(ctx, state)),
        },
        RouteDef {
            method: Method::GET,
            pattern: "/users/{id}",
            access: Access::Session,
            handler: |ctx, state| Box::pin(handle_get_user(ctx, state)),
        },
    ]
}

async fn handle_register(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let body: RegisterRequest = ctx.json()?;

    let id = state
        .authentication
        .register(&body.username, &body.password)
        .await?;
    let (token, expires_at) = state.jwt.generate_token(&id, &body.username)?;

    Ok(json_response(
        StatusCode::CREATED,
        &AuthResponse {
            token,
            id,
            username: body.username,
            expires_at,
        },
    ))
}

async fn handle_login(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let body: LoginRequest = ctx.json()?;

    let user = state
        .authentication
        .authenticate(&body.username, &body.password)
        .await?;
    let (token, expires_at) = state.jwt.generate_token(&user.id, &user.username)?;

    Ok(json_response(
        StatusCode::OK,
        &AuthResponse {
            token,
            id: user.id,
            username: user.username,
            expires_at,
        },
    ))
}

async fn handle_me(ctx: RequestContext, state: Arc<AppState>) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;

    // Live lookup rather than echoing claims: catches renames and deletions.
    let user = state.authentication.get_user_by_id(&session.sub).await?;

    Ok(json_response(StatusCode::OK, &user))
}

async fn handle_update_username(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let body: UpdateUsernameRequest = ctx.json()?;

    state
        .authentication
        .update_username(&session.sub, &body.username)
        .await?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("username updated"),
    ))
}

async fn handle_update_password(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?.clone();
    let body: UpdatePasswordRequest = ctx.json()?;

    state
        .authentication
        .update_password(&session.sub, &body.current_password, &body.new_password)
        .await?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("password updated"),
    ))
}

async fn handle_delete_account(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let session = ctx.session()?;

    state.authentication.delete(&session.sub).await?;

    Ok(json_response(
        StatusCode::OK,
        &SuccessResponse::new("account deleted"),
    ))
}

async fn handle_get_user(
    ctx: RequestContext,
    state: Arc<AppState>,
) -> Result<hyper::Response<BoxBody>> {
    let id = ctx.param("id")?;

    let user = state.authentication.get_user_by_id(id).await?;

    Ok(json_response(StatusCode::OK, &user))
}
