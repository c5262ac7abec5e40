// 路由与中间件

use crate::server::handlers;
use crate::server::AppState;
use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// 构建完整应用路由
///
/// - GET /            服务说明
/// - GET /health      健康检查
/// - GET /api/get     解析分享链接
/// - GET /api/list    /api/get 的别名
pub fn build_router(state: AppState) -> Router {
    // 所有响应都带 CORS 头
    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([Method::GET, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        );

    Router::new()
        .route("/", get(handlers::service_info))
        .route("/health", get(handlers::health_check))
        .route("/api/get", get(handlers::get_share))
        .route("/api/list", get(handlers::list_share))
        .with_state(state)
        .layer(middleware)
}
