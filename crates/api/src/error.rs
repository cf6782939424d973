//! Error to HTTP response mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::warn;
use xrate_core::currency::RateError;
use xrate_shared::AppError;

/// Body message returned for every failed request.
pub const USAGE_MESSAGE: &str = "Unexpected Error; Syntax: [amount=<>, currency=<>]";

/// Handler error.
///
/// Every failure answers `410 Gone` with [`USAGE_MESSAGE`]. The underlying
/// error is logged, never sent to the caller.
#[derive(Debug)]
pub struct ApiError(AppError);

impl ApiError {
    #[cfg(test)]
    fn inner(&self) -> &AppError {
        &self.0
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<RateError> for ApiError {
    fn from(err: RateError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        warn!(
            code = self.0.error_code(),
            client_error = self.0.is_client_error(),
            error = %self.0,
            "Request failed"
        );

        (StatusCode::GONE, Json(json!({ "message": USAGE_MESSAGE }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn test_every_error_is_gone_with_usage_message() {
        for err in [
            AppError::InvalidInput("amount".into()),
            AppError::UnknownCurrency("XYZ".into()),
            AppError::SourcesUnavailable("all down".into()),
            AppError::Internal("boom".into()),
        ] {
            let response = ApiError::from(err).into_response();
            assert_eq!(response.status(), StatusCode::GONE);

            let body = response.into_body().collect().await.unwrap().to_bytes();
            let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
            assert_eq!(value, json!({ "message": USAGE_MESSAGE }));
        }
    }

    #[test]
    fn test_from_rate_error() {
        let err = ApiError::from(RateError::InvalidAmount("abc".into()));
        assert!(matches!(err.inner(), AppError::InvalidInput(_)));
    }
}
