//! Response DTOs for the hook endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::BookingStatus;

/// Editable display text for an amount
#[derive(Debug, Serialize)]
pub struct HydrateAmountResponse {
    pub display: String,
}

/// Value to persist for a displayed amount
#[derive(Debug, Serialize)]
pub struct DehydrateAmountResponse {
    #[serde(with = "rust_decimal::serde::str")]
    pub stored: Decimal,
}

/// Read-only currency label
#[derive(Debug, Serialize)]
pub struct RenderAmountResponse {
    pub label: String,
    pub currency: &'static str,
}

/// One option of the status toggle
#[derive(Debug, Serialize)]
pub struct StatusOptionResponse {
    pub value: BookingStatus,
    pub label: &'static str,
    pub color: &'static str,
    pub icon: &'static str,
}

impl From<BookingStatus> for StatusOptionResponse {
    fn from(status: BookingStatus) -> Self {
        Self {
            value: status,
            label: status.label(),
            color: status.color(),
            icon: status.icon(),
        }
    }
}

/// Generic pricing error response
#[derive(Debug, Serialize)]
pub struct PricingErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}
