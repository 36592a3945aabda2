//! Request DTOs for the hook endpoints.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::models::FormState;

use super::services::FieldChange;

/// A field-change event together with the form it happened in
#[derive(Debug, Deserialize)]
pub struct FieldChangeRequest {
    pub change: FieldChange,
    #[serde(default)]
    pub state: FormState,
}

/// Stored amount to show in an editable field.
///
/// `value` is the raw stored text so formatting noise can be stripped.
#[derive(Debug, Deserialize)]
pub struct HydrateAmountRequest {
    pub value: String,
}

/// Display text to convert into a stored amount
#[derive(Debug, Deserialize)]
pub struct DehydrateAmountRequest {
    pub display: String,
}

/// Stored amount to render as a read-only currency label
#[derive(Debug, Deserialize)]
pub struct RenderAmountRequest {
    pub value: Decimal,
    #[serde(default)]
    pub locale: Option<String>,
}
