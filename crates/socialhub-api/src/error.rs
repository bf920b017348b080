//! Maps domain `AppError` to HTTP responses.
//!
//! The `IntoResponse` impl lives in `socialhub_core::error` because the
//! orphan rule forbids implementing a foreign trait for a foreign type here.

#[cfg(test)]
use axum::http::StatusCode;
#[cfg(test)]
use axum::response::IntoResponse;

#[cfg(test)]
use socialhub_core::error::AppError;
pub use socialhub_core::error::ApiErrorResponse;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AppError::validation("x"), StatusCode::BAD_REQUEST),
            (AppError::unauthorized("x"), StatusCode::UNAUTHORIZED),
            (AppError::forbidden("x"), StatusCode::FORBIDDEN),
            (AppError::not_found("x"), StatusCode::NOT_FOUND),
            (AppError::service_unavailable("x"), StatusCode::SERVICE_UNAVAILABLE),
            (AppError::database("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(err.into_response().status(), expected);
        }
    }
}
