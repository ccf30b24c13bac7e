use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use basket_catalog::fetch_concurrently;
use basket_core::TotalsMode;
use basket_engine::{global_cheapest_store_fetched, CompareOptions, ComparisonResult};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{
    basket_body, map_compare_error, parse_basket, ApiError, ApiResponse, AppState, BasketLine,
    ResponseMeta,
};

#[derive(Debug, Deserialize)]
pub(super) struct CompareRequest {
    #[serde(default)]
    pub basket: Option<Vec<BasketLine>>,
    /// Overrides the configured totals mode for this request.
    pub mode: Option<TotalsMode>,
}

/// POST /api/v1/compare: cheapest single store for the whole basket.
pub(super) async fn compare_basket(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<CompareRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ComparisonResult>>, ApiError> {
    let body = basket_body(&req_id.0, body)?;
    let basket = parse_basket(&req_id.0, body.basket)?;
    let options = CompareOptions {
        mode: body.mode.unwrap_or(state.totals_mode),
    };

    let fetched = fetch_concurrently(&state.sources, state.source_timeout).await;
    let result = global_cheapest_store_fetched(fetched, &basket, options)
        .map_err(|e| map_compare_error(req_id.0.clone(), &e))?;

    Ok(Json(ApiResponse {
        data: result,
        meta: ResponseMeta::new(req_id.0),
    }))
}
