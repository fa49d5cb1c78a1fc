//! HTTP server implementation
//!
//! hyper http1 with TokioIo, one task per connection. Dispatch walks the
//! route table built at startup: method + pattern match, session check,
//! body read, handler call. Any error a handler returns is converted here
//! into its status code and JSON body; this is the sole recovery point.

use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper::{Method, Request, Response};
use hyper_util::rt::TokioIo;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::auth::{extract_token_from_header, JwtValidator};
use crate::concepts::{
    Authentication, Friending, Labelling, Posting, Sorting, Sourcing, Templating,
};
use crate::config::Args;
use crate::db::MongoClient;
use crate::routes::{self, format, match_pattern, Access, BoxBody, RequestContext, RouteDef};
use crate::types::{AgoraError, Result};

/// Shared application state
pub struct AppState {
    pub args: Args,
    pub jwt: JwtValidator,
    pub authentication: Authentication,
    pub friending: Friending,
    pub labelling: Labelling,
    pub sorting: Sorting,
    pub sourcing: Sourcing,
    pub posting: Posting,
    pub templating: Templating,
    /// Endpoint table, built once at startup
    pub routes: Vec<RouteDef>,
    pub started_at: Instant,
}

impl AppState {
    /// Build all concepts against the database and assemble the route table
    pub async fn new(args: Args, mongo: &MongoClient) -> Result<Self> {
        let jwt = JwtValidator::new(args.jwt_secret(), args.jwt_expiry_seconds)?;

        Ok(Self {
            jwt,
            authentication: Authentication::new(mongo).await?,
            friending: Friending::new(mongo).await?,
            labelling: Labelling::new(mongo).await?,
            sorting: Sorting::new(mongo).await?,
            sourcing: Sourcing::new(mongo).await?,
            posting: Posting::new(mongo).await?,
            templating: Templating::new(mongo).await?,
            routes: routes::route_table(),
            started_at: Instant::now(),
            args,
        })
    }
}

/// Start the HTTP server
pub async fn run(state: Arc<AppState>) -> Result<()> {
    let listener = TcpListener::bind(state.args.listen).await?;

    info!(
        "Agora listening on {} as node {}",
        state.args.listen, state.args.node_id
    );
    info!("{} routes registered", state.routes.len());

    if state.args.dev_mode {
        warn!("Development mode enabled - default JWT secret may be in use");
    }

    loop {
        match listener.accept().await {
            Ok((stream, addr)) => {
                let state = Arc::clone(&state);
                tokio::spawn(async move {
                    let io = TokioIo::new(stream);

                    let service = service_fn(move |req| {
                        let state = Arc::clone(&state);
                        async move { handle_request(state, addr, req).await }
                    });

                    if let Err(err) = http1::Builder::new().serve_connection(io, service).await {
                        error!("Error serving connection from {}: {:?}", addr, err);
                    }
                });
            }
            Err(e) => {
                error!("Error accepting connection: {:?}", e);
            }
        }
    }
}

/// Route incoming HTTP requests through the endpoint table
async fn handle_request(
    state: Arc<AppState>,
    addr: SocketAddr,
    req: Request<Incoming>,
) -> std::result::Result<Response<BoxBody>, hyper::Error> {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    info!("[{}] {} {}", addr, method, path);

    // CORS preflight
    if method == Method::OPTIONS {
        return Ok(format::cors_preflight());
    }

    let matched = state.routes.iter().find_map(|route| {
        if route.method == method {
            match_pattern(route.pattern, &path).map(|params| (route, params))
        } else {
            None
        }
    });

    let Some((route, params)) = matched else {
        let err = AgoraError::NotFound {
            entity: "route",
            detail: format!("{} {}", method, path),
            subject: None,
        };
        return Ok(format::error_response(&state, err).await);
    };

    // Session check before the handler runs
    let session = match route.access {
        Access::Session => {
            let header = req
                .headers()
                .get(hyper::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok());

            let Some(token) = extract_token_from_header(header) else {
                let err = AgoraError::Unauthenticated("no token provided".into());
                return Ok(format::error_response(&state, err).await);
            };

            match state.jwt.verify_token(token) {
                Ok(claims) => Some(claims),
                Err(e) => return Ok(format::error_response(&state, e).await),
            }
        }
        Access::Public => None,
    };

    let handler = route.handler;

    let body = req.collect().await?.to_bytes();
    if body.len() > state.args.max_body_bytes {
        let err = AgoraError::Http("request body too large".into());
        return Ok(format::error_response(&state, err).await);
    }

    let ctx = RequestContext {
        params,
        body,
        session,
    };

    match handler(ctx, Arc::clone(&state)).await {
        Ok(response) => Ok(response),
        Err(e) => Ok(format::error_response(&state, e).await),
    }
}
