// HTTP mapping for core errors.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use addrprism_core::error::AddrPrismError;

/// Core error on its way out as an HTTP response.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub AddrPrismError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0 {
            AddrPrismError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AddrPrismError::Engine(_)
            | AddrPrismError::UnsupportedVersion
            | AddrPrismError::Config(_)
            | AddrPrismError::Io(_)
            | AddrPrismError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.to_string(),
        }));
        (self.status(), body).into_response()
    }
}
