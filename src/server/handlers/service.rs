// 服务信息与健康检查

use crate::server::AppState;
use axum::{extract::State, Json};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::{json, Value};

/// 健康检查响应
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    /// ISO-8601 UTC 时间
    pub time: String,
}

/// 服务说明
///
/// GET /
pub async fn service_info(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Resolve netdisk share links into file metadata and download links",
        "endpoints": {
            "/api/get?url=<share-link>": "Resolve a share link",
            "/api/list?url=<share-link>": "Alias of /api/get",
            "/health": "Health check"
        },
        "example": "/api/get?url=https://www.terabox.com/s/1xxxxxxxxxxxxxxxx",
        "strategies": state.resolver.strategy_ids(),
    }))
}

/// 健康检查
///
/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        time: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}
