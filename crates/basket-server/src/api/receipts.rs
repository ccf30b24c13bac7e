use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use basket_db::Receipt;
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct ReceiptItem {
    product_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    price: Decimal,
    date: NaiveDate,
}

impl From<Receipt> for ReceiptItem {
    fn from(receipt: Receipt) -> Self {
        Self {
            product_name: receipt.product_name,
            price: receipt.price,
            date: receipt.date,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct ReceiptRequest {
    pub price: Decimal,
    /// Defaults to today (UTC).
    pub date: Option<NaiveDate>,
}

fn validate_receipt(
    req_id: &str,
    product_name: &str,
    body: ReceiptRequest,
) -> Result<Receipt, ApiError> {
    let product_name = product_name.trim();
    if product_name.is_empty() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            "product_name must not be empty",
        ));
    }
    if body.price.is_sign_negative() && !body.price.is_zero() {
        return Err(ApiError::new(
            req_id,
            "validation_error",
            format!("price must not be negative, got {}", body.price),
        ));
    }
    Ok(Receipt {
        product_name: product_name.to_owned(),
        price: body.price,
        date: body.date.unwrap_or_else(|| Utc::now().date_naive()),
    })
}

/// GET /api/v1/receipts
pub(super) async fn list_receipts(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Result<Json<ApiResponse<Vec<ReceiptItem>>>, ApiError> {
    let receipts = basket_db::list_receipts(&state.pool)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: receipts.into_iter().map(ReceiptItem::from).collect(),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PUT /api/v1/receipts/{product_name}: insert or replace.
pub(super) async fn put_receipt(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_name): Path<String>,
    Json(body): Json<ReceiptRequest>,
) -> Result<Json<ApiResponse<ReceiptItem>>, ApiError> {
    let receipt = validate_receipt(&req_id.0, &product_name, body)?;
    basket_db::upsert_receipt(&state.pool, &receipt)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: ReceiptItem::from(receipt),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// PATCH /api/v1/receipts/{product_name}: update an existing receipt only.
pub(super) async fn patch_receipt(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_name): Path<String>,
    Json(body): Json<ReceiptRequest>,
) -> Result<Json<ApiResponse<ReceiptItem>>, ApiError> {
    let receipt = validate_receipt(&req_id.0, &product_name, body)?;
    basket_db::update_receipt(&state.pool, &receipt)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: ReceiptItem::from(receipt),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// DELETE /api/v1/receipts/{product_name}
pub(super) async fn delete_receipt(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(product_name): Path<String>,
) -> Result<StatusCode, ApiError> {
    basket_db::delete_receipt(&state.pool, &product_name)
        .await
        .map_err(|e| map_db_error(req_id.0, &e))?;
    Ok(StatusCode::NO_CONTENT)
}
