pub mod listing;
pub mod upload;

use std::net::{IpAddr, SocketAddr};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, Method},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use crate::AppState;
use crate::error::AppError;

/// Per-request ambient state, assembled once by the dispatcher so handlers
/// never reach into connection or process globals.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Peer address of the uploading client.
    pub remote_addr: IpAddr,

    /// Whether the client connection was encrypted. Only affects the scheme
    /// of generated URLs, never storage.
    pub encrypted: bool,

    /// Hostname advertised in generated URLs.
    pub host: String,
}

#[derive(Debug, Default, Deserialize)]
struct UploadQuery {
    name: Option<String>,
}

/// Entry point for every request regardless of path: GET lists, POST
/// uploads, anything else is met with a 501.
pub async fn dispatch(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
) -> Result<Response, AppError> {
    if *req.method() == Method::GET {
        listing::list_images(&state)
            .await
            .map(IntoResponse::into_response)
    } else if *req.method() == Method::POST {
        let ctx = RequestContext {
            remote_addr: addr.ip(),
            encrypted: is_encrypted(req.headers()),
            host: state.config.server_name.clone(),
        };
        let query: UploadQuery =
            serde_urlencoded::from_str(req.uri().query().unwrap_or("")).unwrap_or_default();

        upload::upload_image(&state, &ctx, query.name, req.into_body()).await
    } else {
        Err(AppError::NotImplemented)
    }
}

/// TLS is terminated by the fronting proxy (which also serves `/i/`), so the
/// encrypted flag comes from the forwarded protocol header.
fn is_encrypted(headers: &HeaderMap) -> bool {
    headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("https"))
}
