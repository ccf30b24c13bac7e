use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use basket_catalog::fetch_concurrently;
use basket_engine::{per_store_breakdown_fetched, PerStoreBreakdown};
use serde::Deserialize;

use crate::middleware::RequestId;

use super::{basket_body, parse_basket, ApiError, ApiResponse, AppState, BasketLine, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct StoreBasketsRequest {
    #[serde(default)]
    pub basket: Option<Vec<BasketLine>>,
}

/// POST /api/v1/store-baskets: each retailer's own cheapest listings,
/// grouped by store. A retailer that fails to load carries `{ "error": … }`.
pub(super) async fn store_baskets(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<StoreBasketsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<PerStoreBreakdown>>, ApiError> {
    let body = basket_body(&req_id.0, body)?;
    let basket = parse_basket(&req_id.0, body.basket)?;

    let fetched = fetch_concurrently(&state.sources, state.source_timeout).await;
    let breakdown = per_store_breakdown_fetched(fetched, &basket);
    for warning in &breakdown.warnings {
        tracing::debug!(%warning, "store basket warning");
    }

    Ok(Json(ApiResponse {
        data: breakdown,
        meta: ResponseMeta::new(req_id.0),
    }))
}
