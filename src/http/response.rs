//! Request body extraction and plain-text replies.
//!
//! # Design Decisions
//! - Error bodies are plain text, either a storage message or a sentence
//!   naming the identifier
//! - Body rejections (bad JSON, wrong content type, non-object) become 400
//!   with the rejection text instead of axum's 415/422 defaults; an
//!   over-limit body stays 413

use axum::{
    extract::{FromRequest, Json, Request},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::store::{into_document, Document};

/// Plain-text reply with the given status.
pub fn message(status: StatusCode, body: impl Into<String>) -> Response {
    (status, body.into()).into_response()
}

/// A JSON object request body.
#[derive(Debug)]
pub struct DocumentBody(pub Document);

impl<S> FromRequest<S> for DocumentBody
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state).await.map_err(|rejection| {
            tracing::warn!(error = %rejection.body_text(), "Rejected request body");
            let status = match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
                _ => StatusCode::BAD_REQUEST,
            };
            message(status, rejection.body_text())
        })?;

        into_document(value)
            .map(DocumentBody)
            .map_err(|e| message(StatusCode::BAD_REQUEST, e.to_string()))
    }
}
