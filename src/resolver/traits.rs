// 解析策略 trait

use crate::share::{FileData, LookupError, ShareLink};
use async_trait::async_trait;

/// 单个解析策略
///
/// 实现必须是无状态的（或只持有只读数据），同一实例会被并发请求共享
#[async_trait]
pub trait LookupStrategy: Send + Sync {
    /// 策略标识（用于日志、错误明细和响应中的 source 字段）
    fn id(&self) -> &str;

    /// 尝试解析分享链接
    async fn attempt(&self, link: &ShareLink) -> Result<FileData, LookupError>;
}
