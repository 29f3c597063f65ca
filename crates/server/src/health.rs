use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;

use crate::api::ApiState;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub snapshot: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: ApiState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn health(State(state): State<ApiState>) -> (StatusCode, Json<HealthResponse>) {
    let snapshot = snapshot_check(&state);
    let ready = snapshot.status == "ready";

    let payload = HealthResponse {
        status: if ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "crossell-server runtime initialized".to_string(),
        },
        snapshot,
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}

fn snapshot_check(state: &ApiState) -> HealthCheck {
    let snapshot = state.engine.snapshot();
    let customers = snapshot.customers().len();
    let products = snapshot.products().len();

    if customers == 0 || products == 0 {
        HealthCheck {
            status: "degraded",
            detail: format!(
                "snapshot incomplete: {customers} customers, {products} products loaded"
            ),
        }
    } else {
        HealthCheck {
            status: "ready",
            detail: format!(
                "snapshot loaded: {customers} customers, {products} products, {} catalogue items",
                snapshot.catalogue().len()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{extract::State, http::StatusCode, Json};

    use crate::api::tests::{empty_state, demo_state};
    use crate::health::health;

    #[tokio::test]
    async fn health_returns_ready_when_snapshot_is_populated() {
        let (status, Json(payload)) = health(State(demo_state())).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(payload.status, "ready");
        assert_eq!(payload.snapshot.status, "ready");
        assert_eq!(payload.service.status, "ready");
    }

    #[tokio::test]
    async fn health_returns_service_unavailable_when_snapshot_is_empty() {
        let (status, Json(payload)) = health(State(empty_state())).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(payload.status, "degraded");
        assert_eq!(payload.snapshot.status, "degraded");
        assert_eq!(payload.service.status, "ready");
    }
}
