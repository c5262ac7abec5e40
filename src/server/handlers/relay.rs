// 分享链接解析 API 处理器

use crate::config::ListAliasMode;
use crate::resolver::LookupResult;
use crate::server::AppState;
use crate::share::FileData;
use axum::{
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// 缺少 url 参数时的错误信息
pub const MISSING_URL_MESSAGE: &str = "URL parameter required";

/// 解析请求参数
///
/// 查询串按键值对列表解析，重复的 url 只取第一个，
/// 不会因为查询串格式问题被 axum 直接拒绝
#[derive(Debug, Default, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct ShareQuery {
    /// 分享链接
    pub url: Option<String>,
}

impl From<Vec<(String, String)>> for ShareQuery {
    fn from(pairs: Vec<(String, String)>) -> Self {
        Self {
            url: pairs.into_iter().find(|(k, _)| k == "url").map(|(_, v)| v),
        }
    }
}

/// 查询串无法解析时视为缺少 url
fn share_query(query: Option<Query<ShareQuery>>) -> ShareQuery {
    query.map(|Query(q)| q).unwrap_or_default()
}

/// 解析响应
///
/// 无论成功与否 HTTP 状态码都是 200，调用方需要检查 success 字段
#[derive(Debug, Serialize)]
pub struct RelayResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<FileData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}

impl RelayResponse {
    pub fn success(data: FileData, source: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            source: Some(source.into()),
            error: None,
            details: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            source: None,
            error: Some(message.into()),
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<LookupResult> for RelayResponse {
    fn from(result: LookupResult) -> Self {
        match result {
            LookupResult::Found { data, source } => RelayResponse::success(data, source),
            LookupResult::Exhausted { error, details } => {
                RelayResponse::error(error).with_details(details)
            }
        }
    }
}

/// 解析分享链接
///
/// GET /api/get?url=<分享链接>
pub async fn get_share(
    State(state): State<AppState>,
    query: Option<Query<ShareQuery>>,
) -> Json<RelayResponse> {
    resolve_share(&state, share_query(query)).await
}

async fn resolve_share(state: &AppState, params: ShareQuery) -> Json<RelayResponse> {
    let url = match params.url.filter(|u| !u.is_empty()) {
        Some(url) => url,
        None => return Json(RelayResponse::error(MISSING_URL_MESSAGE)),
    };

    info!("API: 解析分享链接 url={}", url);

    Json(state.resolver.resolve(&url).await.into())
}

/// /api/get 的别名
///
/// GET /api/list?url=<分享链接>
pub async fn list_share(
    State(state): State<AppState>,
    query: Option<Query<ShareQuery>>,
) -> Response {
    let params = share_query(query);
    match state.config.server.list_alias {
        ListAliasMode::Dispatch => resolve_share(&state, params).await.into_response(),
        ListAliasMode::Redirect => {
            let target = match params.url {
                Some(url) => format!("/api/get?url={}", urlencoding::encode(&url)),
                None => "/api/get".to_string(),
            };
            Redirect::temporary(&target).into_response()
        }
    }
}
