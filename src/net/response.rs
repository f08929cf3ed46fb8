use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;

/// Body sent with every 4xx/5xx from the api.
#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
    pub details: String,
}

pub struct ResponseError(Response);

impl IntoResponse for ResponseError {
    fn into_response(self) -> Response {
        self.0
    }
}

impl<E> From<E> for ResponseError
where
    E: Into<color_eyre::eyre::Error>,
{
    fn from(value: E) -> Self {
        let report = Into::<color_eyre::eyre::Error>::into(value);
        error!("Server error: {report:#}");
        Self::internal_server_error("Internal server error", report.to_string())
    }
}

impl ResponseError {
    pub fn with_status(
        status_code: StatusCode,
        error: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        ResponseError(
            (
                status_code,
                Json(ErrorBody {
                    error: error.into(),
                    details: details.into(),
                }),
            )
                .into_response(),
        )
    }

    pub fn internal_server_error(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::with_status(StatusCode::INTERNAL_SERVER_ERROR, error, details)
    }

    pub fn bad_request(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self::with_status(StatusCode::BAD_REQUEST, error, details)
    }

    #[cfg(test)]
    pub fn status(&self) -> StatusCode {
        self.0.status()
    }
}

pub type Result<T, E = ResponseError> = axum::response::Result<T, E>;
