use axum::{
    body::Body,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use futures::TryStreamExt;
use tokio_util::io::StreamReader;

use super::RequestContext;
use crate::AppState;
use crate::error::AppError;
use crate::utils::filename::derive_filename;

/// Receives an upload and saves it, returning its public URL.
///
/// The body is streamed to disk in bounded chunks, never buffered whole. An
/// empty body or one that hits the size cap gets its partial file removed and
/// the request rejected; an I/O failure leaves whatever was written in place
/// since the state on disk is uncertain.
pub async fn upload_image(
    state: &AppState,
    ctx: &RequestContext,
    name: Option<String>,
    body: Body,
) -> Result<Response, AppError> {
    let name = name.unwrap_or_else(|| Utc::now().timestamp().to_string());
    let filename = derive_filename(&name, &ctx.remote_addr.to_string());
    let url = public_url(ctx, &filename);

    let stream = body
        .into_data_stream()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::Other, err));
    let reader = StreamReader::new(stream);

    let size = state.store.save_capped(&filename, reader).await?;

    if size == 0 {
        remove_rejected(state, &filename).await;
        return Err(AppError::BadRequest("Input file was empty".to_string()));
    }

    if size >= state.config.max_upload_size {
        // Only a truncated prefix made it to disk
        remove_rejected(state, &filename).await;
        return Err(AppError::PayloadTooLarge(format!(
            "Input file too large. Must be smaller than {} bytes",
            state.config.max_upload_size
        )));
    }

    Ok((
        StatusCode::CREATED,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_LENGTH, url.len().to_string()),
        ],
        url,
    )
        .into_response())
}

fn public_url(ctx: &RequestContext, filename: &str) -> String {
    let scheme = if ctx.encrypted { "https" } else { "http" };
    format!("{scheme}://{}/i/{filename}", ctx.host)
}

/// Cleanup of a rejected upload is best-effort: a failure here must not mask
/// the rejection being reported to the client.
async fn remove_rejected(state: &AppState, filename: &str) {
    if let Err(e) = state.store.remove(filename).await {
        tracing::warn!("Failed to clean up rejected upload {filename}: {e:#}");
    }
}
