mod compare;
mod receipts;
mod store_baskets;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post, put},
    Extension, Json, Router,
};
use basket_core::{Basket, CatalogSource, TotalsMode};
use basket_engine::CompareError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_api_key, AuthState, RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub sources: Arc<Vec<Arc<dyn CatalogSource>>>,
    pub totals_mode: TotalsMode,
    pub source_timeout: Duration,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
    sources: usize,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "no_valid_totals" | "empty_catalog" | "price_overflow" => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// A basket line as the web client sends it: a bare name or `{ "name": … }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(super) enum BasketLine {
    Name(String),
    Item { name: String },
}

impl BasketLine {
    fn into_name(self) -> String {
        match self {
            BasketLine::Name(name) | BasketLine::Item { name } => name,
        }
    }
}

/// Unwraps a JSON body, turning an absent or unreadable one into the same
/// `validation_error` an empty basket gets.
pub(super) fn basket_body<T>(
    request_id: &str,
    body: Result<Json<T>, JsonRejection>,
) -> Result<T, ApiError> {
    body.map(|Json(body)| body).map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "rejecting unreadable basket request");
        ApiError::new(request_id, "validation_error", "basket is empty or not provided")
    })
}

pub(super) fn parse_basket(
    request_id: &str,
    lines: Option<Vec<BasketLine>>,
) -> Result<Basket, ApiError> {
    let lines = lines.unwrap_or_default();
    Basket::new(lines.into_iter().map(BasketLine::into_name)).map_err(|e| {
        tracing::debug!(error = %e, "rejecting empty basket");
        ApiError::new(request_id, "validation_error", "basket is empty or not provided")
    })
}

pub(super) fn map_compare_error(request_id: String, error: &CompareError) -> ApiError {
    match error {
        CompareError::EmptyBasket => {
            ApiError::new(request_id, "validation_error", "basket is empty or not provided")
        }
        other => {
            tracing::warn!(error = %other, "comparison failed");
            ApiError::new(request_id, other.code(), other.to_string())
        }
    }
}

pub(super) fn map_db_error(request_id: String, error: &basket_db::DbError) -> ApiError {
    if matches!(error, basket_db::DbError::NotFound) {
        return ApiError::new(request_id, "not_found", "receipt not found");
    }
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
        ])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/compare", post(compare::compare_basket))
        .route(
            "/api/v1/store-baskets",
            post(store_baskets::store_baskets),
        )
        .route("/api/v1/receipts", get(receipts::list_receipts))
        .route(
            "/api/v1/receipts/{product_name}",
            put(receipts::put_receipt)
                .patch(receipts::patch_receipt)
                .delete(receipts::delete_receipt),
        )
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(auth, require_api_key)),
        )
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth, rate_limit))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);
    let sources = state.sources.len();

    match basket_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                    sources,
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                        sources,
                    },
                    meta,
                }),
            )
        }
    }
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
