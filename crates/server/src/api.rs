//! Recommendation API endpoints.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::error;

use crossell_core::domain::CustomerId;
use crossell_core::report::RecommendationReport;
use crossell_core::RecommendationEngine;

#[derive(Clone)]
pub struct ApiState {
    pub engine: Arc<RecommendationEngine>,
}

#[derive(Debug, Serialize)]
struct CustomerListing {
    #[serde(rename = "CustomerID")]
    customer_id: CustomerId,
    #[serde(rename = "CustomerName")]
    customer_name: String,
    #[serde(rename = "CustomerType")]
    customer_type: String,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Region")]
    region: String,
}

#[derive(Debug, Deserialize)]
struct RecommendationRequest {
    customer_id: String,
}

#[derive(Debug, Serialize)]
struct RecommendationResponse {
    success: bool,
    message: String,
    customer_id: String,
    timestamp: String,
    data: Option<RecommendationReport>,
}

#[derive(Debug, Serialize)]
struct CacheResetResponse {
    success: bool,
    cleared_entries: usize,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/api/v1/customers", get(list_customers))
        .route("/api/v1/recommendations", post(create_recommendations))
        .route("/api/v1/cache/reset", post(reset_cache))
        .with_state(state)
}

async fn list_customers(State(state): State<ApiState>) -> Json<Vec<CustomerListing>> {
    let listings = state
        .engine
        .customers()
        .iter()
        .map(|customer| CustomerListing {
            customer_id: customer.id.clone(),
            customer_name: customer.name.clone(),
            customer_type: customer.customer_type.clone(),
            country: customer.country.clone(),
            region: customer.region.clone(),
        })
        .collect();

    Json(listings)
}

async fn create_recommendations(
    State(state): State<ApiState>,
    Json(request): Json<RecommendationRequest>,
) -> (StatusCode, Json<RecommendationResponse>) {
    let customer_id: CustomerId = request.customer_id.as_str().into();

    match state.engine.recommend(&customer_id).await {
        Ok(report) => {
            // Unknown customers get a well-formed empty report, not an error;
            // the message carries the distinction.
            let message = if report.is_classified() {
                "recommendations generated".to_string()
            } else {
                format!("customer `{}` not found; returning empty report", request.customer_id)
            };

            let response = RecommendationResponse {
                success: true,
                message,
                customer_id: request.customer_id,
                timestamp: Utc::now().to_rfc3339(),
                data: Some(report),
            };
            (StatusCode::OK, Json(response))
        }
        Err(err) => {
            error!(
                event_name = "api.recommendations.failed",
                customer_id = %customer_id,
                error = %err,
                "recommendation run failed"
            );
            let response = RecommendationResponse {
                success: false,
                message: err.user_message().to_string(),
                customer_id: request.customer_id,
                timestamp: Utc::now().to_rfc3339(),
                data: None,
            };
            (StatusCode::INTERNAL_SERVER_ERROR, Json(response))
        }
    }
}

async fn reset_cache(State(state): State<ApiState>) -> Json<CacheResetResponse> {
    let cleared_entries = state.engine.ingredient_cache_len();
    state.engine.reset_ingredient_cache();

    Json(CacheResetResponse { success: true, cleared_entries })
}
