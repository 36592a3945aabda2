//! Hook endpoints called by the admin panel.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::error::Result;
use crate::extract::AppJson;
use crate::models::{BookingRecord, BookingStatus, FormState};
use crate::table::{self, BookingListItem, BookingRow};
use crate::AppState;

use super::money::CURRENCY_CODE;
use super::requests::{
    DehydrateAmountRequest, FieldChangeRequest, HydrateAmountRequest, RenderAmountRequest,
};
use super::responses::{
    DehydrateAmountResponse, HydrateAmountResponse, RenderAmountResponse, StatusOptionResponse,
};
use super::services::{self, FieldUpdates, HotelRateLookup};

/// Routes for every form and table hook
pub fn router<L: HotelRateLookup>() -> Router<AppState<L>> {
    Router::new()
        .route("/hooks/field-change", post(field_change::<L>))
        .route("/hooks/hydrate", post(hydrate::<L>))
        .route("/hooks/dehydrate", post(dehydrate::<L>))
        .route("/hooks/amount/hydrate", post(hydrate_amount::<L>))
        .route("/hooks/amount/dehydrate", post(dehydrate_amount::<L>))
        .route("/hooks/amount/render", post(render_amount::<L>))
        .route("/hooks/table-rows", post(table_rows::<L>))
        .route("/hooks/form-defaults", get(form_defaults))
        .route("/hooks/status-options", get(status_options))
        .route("/hooks/hotels/:id/invalidate", post(invalidate_hotel::<L>))
}

async fn field_change<L: HotelRateLookup>(
    State(state): State<AppState<L>>,
    AppJson(req): AppJson<FieldChangeRequest>,
) -> Result<Json<FieldUpdates>> {
    let updates =
        services::apply_field_change(&state.rates, &state.money, &req.change, &req.state).await?;
    Ok(Json(updates))
}

async fn hydrate<L: HotelRateLookup>(
    State(state): State<AppState<L>>,
    AppJson(record): AppJson<BookingRecord>,
) -> Result<Json<FormState>> {
    let form = services::hydrate_record(&state.rates, &state.money, &record).await?;
    Ok(Json(form))
}

async fn dehydrate<L: HotelRateLookup>(
    State(state): State<AppState<L>>,
    AppJson(form): AppJson<FormState>,
) -> Result<Json<BookingRecord>> {
    let record = services::dehydrate_form(&state.money, &form)?;
    Ok(Json(record))
}

async fn hydrate_amount<L: HotelRateLookup>(
    State(state): State<AppState<L>>,
    AppJson(req): AppJson<HydrateAmountRequest>,
) -> Result<Json<HydrateAmountResponse>> {
    let display = state.money.to_display_text(&req.value)?;
    Ok(Json(HydrateAmountResponse { display }))
}

async fn dehydrate_amount<L: HotelRateLookup>(
    State(state): State<AppState<L>>,
    AppJson(req): AppJson<DehydrateAmountRequest>,
) -> Result<Json<DehydrateAmountResponse>> {
    let display_value = state.money.parse_display(&req.display)?;
    let stored = state.money.to_storage(display_value)?;
    Ok(Json(DehydrateAmountResponse { stored }))
}

async fn render_amount<L: HotelRateLookup>(
    State(state): State<AppState<L>>,
    AppJson(req): AppJson<RenderAmountRequest>,
) -> Result<Json<RenderAmountResponse>> {
    let locale = req
        .locale
        .as_deref()
        .unwrap_or(state.money.locale().code);
    let label = state.money.to_currency_label(req.value, locale)?;
    Ok(Json(RenderAmountResponse {
        label,
        currency: CURRENCY_CODE,
    }))
}

async fn table_rows<L: HotelRateLookup>(
    State(state): State<AppState<L>>,
    AppJson(items): AppJson<Vec<BookingListItem>>,
) -> Result<Json<Vec<BookingRow>>> {
    let rows = table::render_rows(&state.money, items)?;
    Ok(Json(rows))
}

async fn form_defaults() -> Json<FormState> {
    Json(FormState::for_create())
}

async fn status_options() -> Json<Vec<StatusOptionResponse>> {
    Json(BookingStatus::ALL.into_iter().map(Into::into).collect())
}

async fn invalidate_hotel<L: HotelRateLookup>(
    State(state): State<AppState<L>>,
    Path(hotel_id): Path<i64>,
) -> StatusCode {
    state.rates.invalidate(hotel_id).await;
    StatusCode::NO_CONTENT
}
