//! HTTP-facing error mapping: an `IntoResponse` + JSON body convention keyed
//! off `lineage_engine`'s stable `EngineError::code()` rather than a bespoke
//! status match per variant.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use lineage_engine::EngineError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("traversal error: {0}")]
    Engine(#[from] EngineError),

    #[error("malformed request body: {0}")]
    BadRequest(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Engine(err) => match err {
                EngineError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                EngineError::StartNotFound(_) => StatusCode::NOT_FOUND,
                EngineError::UnknownNodeType(_) => StatusCode::INTERNAL_SERVER_ERROR,
                EngineError::Adapter(_) => StatusCode::BAD_GATEWAY,
                // No standard status distinguishes client- from
                // server-initiated cancellation; 408 reads closest to "the
                // request did not complete" without implying a server fault.
                EngineError::Cancelled => StatusCode::REQUEST_TIMEOUT,
            },
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::Engine(err) => err.code(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.to_string(),
            "code": self.code(),
            "status": status.as_u16(),
        }));
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
