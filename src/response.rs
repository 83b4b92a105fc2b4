//! Uniform response envelope: `{ code, i18n, data?, meta? }`.
//!
//! `i18n` carries an opaque message key resolved caller-side; the HTTP
//! status always mirrors `code`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize = serde_json::Value> {
    pub code: u16,
    pub i18n: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

/// Pagination block returned by `search`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Meta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub last: u64,
}

impl<T: Serialize> Envelope<T> {
    /// Create an envelope with no payload yet.
    pub fn new(code: StatusCode, i18n: &'static str) -> Self {
        Self {
            code: code.as_u16(),
            i18n,
            data: None,
            meta: None,
        }
    }

    /// Attach the `data` payload.
    pub fn data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    /// Attach the `meta` pagination block.
    pub fn meta(mut self, meta: Meta) -> Self {
        self.meta = Some(meta);
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.code)
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self)).into_response()
    }
}
