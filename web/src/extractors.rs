//! Custom Axum extractors.
//!
//! - `CorrelationId`: the request's correlation ID, for handler logs
//! - `JsonBody`: JSON body whose rejections render as [`AppError`]

use crate::error::AppError;
use crate::middleware::CORRELATION_ID_HEADER;
use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts},
    http::request::Parts,
};
use uuid::Uuid;

/// Correlation ID for request tracing.
///
/// Uses the ID stored by [`crate::middleware::correlation_id_layer`] so the
/// handler sees the same ID as the request span and the response header.
/// Falls back to the `X-Correlation-ID` header, then to a fresh UUID v4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CorrelationId(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for CorrelationId
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(id) = parts.extensions.get::<Self>() {
            return Ok(*id);
        }

        let correlation_id = parts
            .headers
            .get(CORRELATION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| Uuid::parse_str(s).ok())
            .unwrap_or_else(Uuid::new_v4);

        Ok(Self(correlation_id))
    }
}

/// JSON request body.
///
/// Same as [`axum::Json`], but a missing or malformed body is rejected with
/// a 400 [`AppError`] in the usual `{code, message}` shape.
#[derive(Debug, Clone, Copy, Default, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);
