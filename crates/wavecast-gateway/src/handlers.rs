// SPDX-FileCopyrightText: 2026 Wavecast Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers for the gateway REST API.
//!
//! Thin bindings from routes to the campaign service and progress
//! reporter; all domain rules live below this layer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use wavecast_core::types::CampaignId;
use wavecast_core::WavecastError;
use wavecast_dispatch::CampaignSubmission;

use crate::server::GatewayState;

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error description.
    pub error: String,
}

/// Response body for GET /health.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Health status string.
    pub status: String,
    /// Binary version.
    pub version: String,
    /// Seconds since the gateway started.
    pub uptime_secs: u64,
}

/// Response body for GET /v1/connection.
#[derive(Debug, Serialize)]
pub struct ConnectionResponse {
    /// Whether the WhatsApp session is currently paired and live.
    pub connected: bool,
}

/// Map a domain error onto an HTTP response.
fn error_response(err: &WavecastError) -> Response {
    let status = match err {
        WavecastError::Validation(_) => StatusCode::BAD_REQUEST,
        WavecastError::CampaignNotFound(_) | WavecastError::StatusRecordNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
        .into_response()
}

/// POST /v1/campaigns
///
/// Validates and accepts a campaign; dispatch starts before the response
/// is returned. Per-recipient outcomes are discoverable only by polling.
pub async fn post_campaigns(
    State(state): State<GatewayState>,
    Json(body): Json<CampaignSubmission>,
) -> Response {
    match state.service.submit_campaign(body).await {
        Ok(accepted) => (StatusCode::OK, Json(accepted)).into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET /v1/campaigns
pub async fn get_campaigns(State(state): State<GatewayState>) -> Response {
    Json(state.service.campaigns().await).into_response()
}

/// GET /v1/campaigns/{id}
///
/// The campaign, its status records, and derived progress counters.
pub async fn get_campaign_status(
    State(state): State<GatewayState>,
    Path(id): Path<i64>,
) -> Response {
    match state.service.campaign_status(CampaignId(id)).await {
        Ok(status) => Json(status).into_response(),
        Err(err) => error_response(&err),
    }
}

/// GET /v1/status-records
///
/// Every status record across all campaigns, for polling UIs.
pub async fn get_status_records(State(state): State<GatewayState>) -> Response {
    Json(state.reporter.all_status_records().await).into_response()
}

/// GET /v1/statistics
pub async fn get_statistics(State(state): State<GatewayState>) -> Response {
    Json(state.reporter.global_statistics().await).into_response()
}

/// POST /v1/statistics/clear
///
/// Purges completed campaigns and their records; in-flight campaigns are
/// untouched.
pub async fn post_clear_statistics(State(state): State<GatewayState>) -> Response {
    Json(state.service.clear_statistics().await).into_response()
}

/// GET /v1/connection
pub async fn get_connection(State(state): State<GatewayState>) -> Json<ConnectionResponse> {
    Json(ConnectionResponse {
        connected: state.service.transport_connected(),
    })
}

/// GET /health
///
/// Unauthenticated liveness endpoint for process supervisors.
pub async fn get_health(State(state): State<GatewayState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_response_serializes() {
        let resp = ErrorResponse {
            error: "something went wrong".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("something went wrong"));
    }

    #[test]
    fn health_response_serializes() {
        let resp = HealthResponse {
            status: "ok".to_string(),
            version: "0.1.0".to_string(),
            uptime_secs: 42,
        };
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("\"status\":\"ok\""));
        assert!(json.contains("\"uptime_secs\":42"));
    }

    #[test]
    fn submission_body_deserializes() {
        let json = r#"{
            "content": "Hello",
            "delay_ms": 6000,
            "phone_numbers": ["08031234567", "08029876543"]
        }"#;
        let body: CampaignSubmission = serde_json::from_str(json).unwrap();
        assert_eq!(body.content, "Hello");
        assert_eq!(body.delay_ms, 6000);
        assert_eq!(body.phone_numbers.len(), 2);
    }

    #[test]
    fn validation_errors_map_to_bad_request() {
        let response = error_response(&WavecastError::Validation("empty".into()));
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_found_errors_map_to_404() {
        let response = error_response(&WavecastError::CampaignNotFound(CampaignId(9)));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn other_errors_map_to_500() {
        let response = error_response(&WavecastError::Internal("boom".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
