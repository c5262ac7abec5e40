// Netdisk Share Relay Library
// 网盘分享链接解析中转服务核心库

// 配置管理模块
pub mod config;

// 日志模块
pub mod logging;

// 分享链接领域模块（链接解析、大小格式化、响应归一化）
pub mod share;

// 解析策略与回退编排
pub mod resolver;

// Web服务器模块
pub mod server;

// 导出常用类型
pub use config::AppConfig;
pub use resolver::{FallbackResolver, LookupResult, LookupStrategy};
pub use server::{build_router, AppState};
pub use share::{FileData, FileEntry, LookupError, ShareLink};
