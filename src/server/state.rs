// 应用状态

use crate::config::AppConfig;
use crate::resolver::FallbackResolver;
use std::sync::Arc;

/// 应用全局状态
///
/// 只包含启动时构建的只读数据，请求之间不共享可变状态
#[derive(Clone)]
pub struct AppState {
    /// 回退式解析器
    pub resolver: Arc<FallbackResolver>,
    /// 应用配置
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// 按配置构建解析策略链
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        let resolver = FallbackResolver::from_config(&config.lookup)?;
        Ok(Self::with_resolver(config, resolver))
    }

    /// 使用自定义解析器（测试中替换策略链）
    pub fn with_resolver(config: AppConfig, resolver: FallbackResolver) -> Self {
        Self {
            resolver: Arc::new(resolver),
            config: Arc::new(config),
        }
    }
}
