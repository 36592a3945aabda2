//! Error handling for the application

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::PricingErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Rejection(#[from] JsonRejection),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::Pricing(PricingError::HotelNotFound { .. }) => {
                StatusCode::NOT_FOUND
            }
            AppError::Pricing(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Rejection(rejection) => rejection.status(),
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            AppError::NotFound => PricingErrorResponse {
                error_type: "not_found".to_string(),
                message: self.to_string(),
                details: None,
            },
            AppError::Pricing(e) => PricingErrorResponse {
                error_type: e.kind().to_string(),
                message: e.to_string(),
                details: pricing_details(e),
            },
            AppError::Rejection(rejection) => PricingErrorResponse {
                error_type: "invalid_request".to_string(),
                message: rejection.body_text(),
                details: None,
            },
            AppError::Database(e) => {
                tracing::error!("Database error: {}", e);
                PricingErrorResponse {
                    error_type: "database".to_string(),
                    message: "Database error".to_string(),
                    details: None,
                }
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                PricingErrorResponse {
                    error_type: "internal".to_string(),
                    message: "Internal error".to_string(),
                    details: None,
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Field-level context the panel can attach to a form input
fn pricing_details(err: &PricingError) -> Option<serde_json::Value> {
    match err {
        PricingError::HotelNotFound { hotel_id } => {
            Some(serde_json::json!({ "field": "hotel_id", "hotel_id": hotel_id }))
        }
        PricingError::InvalidNumericInput { field, value } => {
            Some(serde_json::json!({ "field": field, "value": value }))
        }
        PricingError::InvalidDateRange {
            check_in,
            check_out,
        } => Some(serde_json::json!({
            "field": "check_out_date",
            "check_in_date": check_in,
            "check_out_date": check_out,
        })),
        PricingError::BelowMinimum { minimum, .. } => Some(serde_json::json!({
            "field": "total_price",
            "minimum": minimum.to_string(),
        })),
        PricingError::MissingField(field) => Some(serde_json::json!({ "field": field })),
        PricingError::UnsupportedLocale(_) | PricingError::Overflow(_) => None,
    }
}

pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hotel_not_found_returns_404() {
        let err = AppError::from(PricingError::HotelNotFound { hotel_id: 3 });
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn invalid_input_returns_422() {
        let err = AppError::from(PricingError::MissingField("status"));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn internal_error_returns_500() {
        let err = AppError::Internal("boom".to_string());
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn pricing_error_display_is_transparent() {
        let err = AppError::from(PricingError::UnsupportedLocale("xx".to_string()));
        assert_eq!(err.to_string(), "Unsupported locale: xx");
    }

    #[tokio::test]
    async fn json_rejection_keeps_its_status() {
        use axum::body::{to_bytes, Body};
        use axum::extract::FromRequest;
        use axum::http::Request;

        let request = Request::new(Body::from("{}"));
        let rejection = Json::<serde_json::Value>::from_request(request, &())
            .await
            .unwrap_err();
        let response = AppError::from(rejection).into_response();

        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error_type"], "invalid_request");
    }

    #[test]
    fn not_found_display() {
        assert_eq!(AppError::NotFound.to_string(), "Not found");
    }
}
