pub mod health;
pub mod tasks;

use axum::{
    Json, Router,
    extract::{
        FromRequest, FromRequestParts, Query,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use taskplan_core::Error;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::state::AppState;

/// All routes with permissive CORS.
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health::router())
        .merge(tasks::router())
        .with_state(state)
        .layer(cors)
}

/// Standard API error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// JSON body extractor whose rejections use the `{"error": ..}` shape
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query string extractor whose rejections use the `{"error": ..}` shape
#[derive(FromRequestParts)]
#[from_request(via(Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Convert anyhow errors to HTTP responses
pub struct AppError(anyhow::Error);

impl AppError {
    fn status(&self) -> StatusCode {
        if self.0.is::<JsonRejection>() || self.0.is::<QueryRejection>() {
            return StatusCode::BAD_REQUEST;
        }
        match self.0.downcast_ref::<Error>() {
            Some(Error::EventNotFound(_)) => StatusCode::NOT_FOUND,
            Some(e) if e.is_invalid_input() => StatusCode::BAD_REQUEST,
            Some(e) if e.is_unreadable_record() => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("request failed: {:#}", self.0);
        }
        let body = Json(ErrorResponse {
            error: self.0.to_string(),
        });
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
