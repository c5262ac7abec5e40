use netdisk_share_relay::{build_router, config::LogConfig, logging, AppConfig, AppState};
use tracing::info;

/// 加载日志配置
///
/// 日志系统要先于完整配置初始化，这里只读取 [log] 段，失败时返回默认配置
async fn load_log_config(config_path: &str) -> LogConfig {
    if let Ok(content) = tokio::fs::read_to_string(config_path).await {
        if let Ok(config) = toml::from_str::<toml::Value>(&content) {
            if let Some(log_table) = config.get("log") {
                if let Ok(log_config) = log_table.clone().try_into::<LogConfig>() {
                    return log_config;
                }
            }
        }
    }

    LogConfig::default()
}

/// 等待关闭信号
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("监听 Ctrl+C 失败: {}", e);
        std::future::pending::<()>().await;
    }
    info!("收到 Ctrl+C，开始优雅关闭...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config_path = AppConfig::config_path();

    // 必须保持 _log_guard 存活
    let log_config = load_log_config(&config_path).await;
    let _log_guard = logging::init_logging(&log_config);

    info!("Netdisk Share Relay v{} 启动中...", env!("CARGO_PKG_VERSION"));

    let config = AppConfig::load_or_default(&config_path).await;
    let addr = format!("{}:{}", config.server.host, config.server.port);

    let app_state = AppState::new(config)?;
    info!("解析策略链: {:?}", app_state.resolver.strategy_ids());

    let app = build_router(app_state);

    info!("服务器启动在: http://{}", addr);
    info!("解析接口: http://{}/api/get?url=<分享链接>", addr);
    info!("健康检查: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;

    // 收到 Ctrl+C 后停止接收新连接，等待进行中的请求结束
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("服务已退出");

    Ok(())
}
