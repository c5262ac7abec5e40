// 配置管理模块

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_PATH: &str = "config/app.toml";

/// 覆盖配置文件路径的环境变量
pub const CONFIG_PATH_ENV: &str = "SHARE_RELAY_CONFIG";

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 解析策略配置
    #[serde(default)]
    pub lookup: LookupConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 是否启用日志文件持久化
    #[serde(default = "default_log_enabled")]
    pub enabled: bool,
    /// 日志文件保存目录
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
    /// 日志保留天数（默认 7 天）
    #[serde(default = "default_log_retention_days")]
    pub retention_days: u32,
    /// 日志级别（默认 info）
    #[serde(default = "default_log_level")]
    pub level: String,
    /// 单个日志文件最大大小（字节，默认 20MB）
    #[serde(default = "default_log_max_file_size")]
    pub max_file_size: u64,
}

fn default_log_enabled() -> bool {
    true
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs")
}

fn default_log_retention_days() -> u32 {
    7
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_max_file_size() -> u64 {
    20 * 1024 * 1024 // 20MB
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: default_log_enabled(),
            log_dir: default_log_dir(),
            retention_days: default_log_retention_days(),
            level: default_log_level(),
            max_file_size: default_log_max_file_size(),
        }
    }
}

/// /api/list 的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListAliasMode {
    /// 内部转交给 /api/get 处理
    #[default]
    Dispatch,
    /// 307 重定向到 /api/get
    Redirect,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// /api/list 别名处理方式
    #[serde(default)]
    pub list_alias: ListAliasMode,
}

fn default_host() -> String {
    // 容器内使用 0.0.0.0 以便从宿主机访问
    if running_in_container() {
        "0.0.0.0".to_string()
    } else {
        "127.0.0.1".to_string()
    }
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            list_alias: ListAliasMode::default(),
        }
    }
}

/// 镜像接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorConfig {
    /// 是否启用
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 接口地址
    pub endpoint: String,
    /// 传递分享链接的查询参数名
    #[serde(default = "default_query_param")]
    pub query_param: String,
    /// 请求超时（秒）
    #[serde(default = "default_mirror_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_true() -> bool {
    true
}

fn default_query_param() -> String {
    "url".to_string()
}

fn default_mirror_timeout_secs() -> u64 {
    30
}

impl MirrorConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            enabled: true,
            endpoint: endpoint.into(),
            query_param: default_query_param(),
            timeout_secs: default_mirror_timeout_secs(),
        }
    }
}

/// 网盘接口直连配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VendorConfig {
    /// 是否启用
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 每次请求的超时（秒）
    #[serde(default = "default_vendor_timeout_secs")]
    pub timeout_secs: u64,
    /// 固定使用的 API 站点（不设置时按链接域名选择）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_override: Option<String>,
}

fn default_vendor_timeout_secs() -> u64 {
    15
}

impl Default for VendorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_vendor_timeout_secs(),
            base_override: None,
        }
    }
}

/// 分享页面抓取配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// 是否启用
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// 请求超时（秒）
    #[serde(default = "default_scrape_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_scrape_timeout_secs() -> u64 {
    20
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timeout_secs: default_scrape_timeout_secs(),
        }
    }
}

/// 解析策略配置
///
/// 策略按 mirror_a → mirror_b → vendor → scrape 的固定顺序执行
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupConfig {
    /// 请求使用的 User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// 出站代理（http:// 或 socks5://）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proxy: Option<String>,
    /// 第一个镜像接口
    #[serde(default = "default_mirror_a")]
    pub mirror_a: MirrorConfig,
    /// 第二个镜像接口
    #[serde(default = "default_mirror_b")]
    pub mirror_b: MirrorConfig,
    /// 网盘接口直连
    #[serde(default)]
    pub vendor: VendorConfig,
    /// 分享页面抓取
    #[serde(default)]
    pub scrape: ScrapeConfig,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
     (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36"
        .to_string()
}

fn default_mirror_a() -> MirrorConfig {
    MirrorConfig::new("https://teraboxvideodownloader.nepcoderdevs.workers.dev/")
}

fn default_mirror_b() -> MirrorConfig {
    MirrorConfig::new("https://terabox-dl.qtcloud.workers.dev/api/get-info")
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            proxy: None,
            mirror_a: default_mirror_a(),
            mirror_b: default_mirror_b(),
            vendor: VendorConfig::default(),
            scrape: ScrapeConfig::default(),
        }
    }
}

/// 检测是否运行在容器中
///
/// 1. /.dockerenv 文件存在
/// 2. /proc/1/cgroup 中包含 docker / containerd
/// 3. 设置了 container 环境变量
pub fn running_in_container() -> bool {
    if Path::new("/.dockerenv").exists() {
        return true;
    }

    if let Ok(content) = std::fs::read_to_string("/proc/1/cgroup") {
        if content.contains("docker") || content.contains("containerd") {
            return true;
        }
    }

    std::env::var("container").is_ok()
}

impl AppConfig {
    /// 配置文件路径（环境变量优先）
    pub fn config_path() -> String {
        std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string())
    }

    /// 从文件加载配置
    pub async fn load_from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .context("Failed to read config file")?;

        let config: AppConfig = toml::from_str(&content).context("Failed to parse config file")?;

        config.validate().context("配置校验失败")?;

        Ok(config)
    }

    /// 保存配置到文件
    pub async fn save_to_file(&self, path: &str) -> Result<()> {
        if let Some(parent) = Path::new(path).parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .context("Failed to create config directory")?;
            }
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content)
            .await
            .context("Failed to write config file")?;

        Ok(())
    }

    /// 加载配置，失败时使用默认配置并尝试写回
    pub async fn load_or_default(path: &str) -> Self {
        match Self::load_from_file(path).await {
            Ok(config) => {
                tracing::info!("配置文件加载成功: {}", path);
                config
            }
            Err(e) => {
                tracing::warn!("配置文件加载失败，使用默认配置: {:#}", e);
                let default_config = Self::default();

                // 文件已存在但内容有误时不覆盖
                if !Path::new(path).exists() {
                    if let Err(e) = default_config.save_to_file(path).await {
                        tracing::error!("保存默认配置失败: {}", e);
                    }
                }

                default_config
            }
        }
    }

    /// 校验超时与端点设置
    pub fn validate(&self) -> Result<()> {
        let lookup = &self.lookup;
        for (name, mirror) in [("mirror_a", &lookup.mirror_a), ("mirror_b", &lookup.mirror_b)] {
            if mirror.enabled && mirror.endpoint.trim().is_empty() {
                anyhow::bail!("{} 已启用但未配置 endpoint", name);
            }
            check_timeout(name, mirror.timeout_secs)?;
        }
        check_timeout("vendor", lookup.vendor.timeout_secs)?;
        check_timeout("scrape", lookup.scrape.timeout_secs)?;
        Ok(())
    }
}

/// 每个出站请求都必须有上限，最长 60 秒
fn check_timeout(name: &str, secs: u64) -> Result<()> {
    if secs == 0 || secs > 60 {
        anyhow::bail!("{} 的 timeout_secs 必须在 1..=60 之间，当前为 {}", name, secs);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.list_alias, ListAliasMode::Dispatch);
        assert_eq!(config.lookup.mirror_a.timeout_secs, 30);
        assert_eq!(config.lookup.vendor.timeout_secs, 15);
        assert_eq!(config.lookup.scrape.timeout_secs, 20);
        assert!(config.lookup.proxy.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_log_config() {
        let config = LogConfig::default();
        assert!(config.enabled);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.retention_days, 7);
        assert_eq!(config.level, "info");
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        let mut config = AppConfig::default();
        config.server.port = 8080;
        config.server.list_alias = ListAliasMode::Redirect;
        config.lookup.vendor.base_override = Some("http://127.0.0.1:9000".to_string());
        config.save_to_file(path).await.unwrap();

        let loaded = AppConfig::load_from_file(path).await.unwrap();
        assert_eq!(loaded.server.port, 8080);
        assert_eq!(loaded.server.list_alias, ListAliasMode::Redirect);
        assert_eq!(
            loaded.lookup.vendor.base_override.as_deref(),
            Some("http://127.0.0.1:9000")
        );
        assert_eq!(loaded.lookup.mirror_b.endpoint, config.lookup.mirror_b.endpoint);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let content = r#"
            [server]
            port = 9999
            list_alias = "redirect"

            [lookup.mirror_a]
            endpoint = "http://localhost:1/a"
            timeout_secs = 10

            [lookup.scrape]
            enabled = false
        "#;

        let config: AppConfig = toml::from_str(content).unwrap();
        assert_eq!(config.server.port, 9999);
        assert_eq!(config.server.list_alias, ListAliasMode::Redirect);
        assert_eq!(config.lookup.mirror_a.endpoint, "http://localhost:1/a");
        assert_eq!(config.lookup.mirror_a.query_param, "url");
        assert_eq!(config.lookup.mirror_a.timeout_secs, 10);
        assert!(config.lookup.mirror_b.enabled);
        assert!(!config.lookup.scrape.enabled);
        assert_eq!(config.lookup.scrape.timeout_secs, 20);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_validate_rejects_unbounded_timeout() {
        let mut config = AppConfig::default();
        config.lookup.scrape.timeout_secs = 0;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.lookup.mirror_b.timeout_secs = 120;
        assert!(config.validate().is_err());

        let mut config = AppConfig::default();
        config.lookup.mirror_a.endpoint = " ".to_string();
        assert!(config.validate().is_err());

        config.lookup.mirror_a.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[tokio::test]
    async fn test_load_or_default_writes_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("app.toml");
        let path = path.to_str().unwrap();

        let config = AppConfig::load_or_default(path).await;
        assert_eq!(config.server.port, 3000);
        assert!(Path::new(path).exists());
    }
}
