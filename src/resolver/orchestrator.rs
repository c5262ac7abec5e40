// 解析编排器
//
// 策略按固定顺序串行执行：
// Pending → Attempting(0) → Succeeded | Attempting(1) → ... → Exhausted
//
// - 第一个成功的策略即为结果，后续策略不再执行
// - 策略内部不重试，策略之间不并发
// - 每个失败都记录为 "{策略ID}: {错误信息}"

use crate::config::LookupConfig;
use crate::resolver::{LookupStrategy, MirrorApiStrategy, PageScrapeStrategy, VendorDirectStrategy};
use crate::share::{FileData, ShareLink};
use anyhow::Result;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// 全部策略失败时的错误信息
pub const EXHAUSTED_MESSAGE: &str = "All lookup methods failed";

/// 一次解析的最终结果
#[derive(Debug, Clone)]
pub enum LookupResult {
    /// 某个策略成功
    Found {
        data: FileData,
        /// 成功策略的 ID
        source: String,
    },
    /// 全部策略失败
    Exhausted {
        error: String,
        /// 按策略顺序排列的失败明细
        details: Vec<String>,
    },
}

impl LookupResult {
    pub fn is_success(&self) -> bool {
        matches!(self, LookupResult::Found { .. })
    }
}

/// 回退式解析器
///
/// 启动时构建一次，之后被所有请求只读共享
#[derive(Clone)]
pub struct FallbackResolver {
    strategies: Vec<Arc<dyn LookupStrategy>>,
}

impl FallbackResolver {
    pub fn new(strategies: Vec<Arc<dyn LookupStrategy>>) -> Self {
        Self { strategies }
    }

    /// 按配置构建策略链：mirror_a → mirror_b → vendor_direct → page_scrape
    ///
    /// 被禁用的策略直接跳过，顺序不变
    pub fn from_config(lookup: &LookupConfig) -> Result<Self> {
        let mut strategies: Vec<Arc<dyn LookupStrategy>> = Vec::new();

        if lookup.mirror_a.enabled {
            strategies.push(Arc::new(MirrorApiStrategy::new("mirror_a", &lookup.mirror_a, lookup)?));
        }
        if lookup.mirror_b.enabled {
            strategies.push(Arc::new(MirrorApiStrategy::new("mirror_b", &lookup.mirror_b, lookup)?));
        }
        if lookup.vendor.enabled {
            strategies.push(Arc::new(VendorDirectStrategy::new(&lookup.vendor, lookup)?));
        }
        if lookup.scrape.enabled {
            strategies.push(Arc::new(PageScrapeStrategy::new(&lookup.scrape, lookup)?));
        }

        if strategies.is_empty() {
            warn!("所有解析策略均已禁用，所有请求都将失败");
        }

        Ok(Self::new(strategies))
    }

    /// 策略 ID 列表（按执行顺序）
    pub fn strategy_ids(&self) -> Vec<&str> {
        self.strategies.iter().map(|s| s.id()).collect()
    }

    /// 依次尝试各策略，返回第一个成功结果或全部失败明细
    pub async fn resolve(&self, raw_url: &str) -> LookupResult {
        let link = ShareLink::new(raw_url);
        let mut details = Vec::with_capacity(self.strategies.len());

        for (index, strategy) in self.strategies.iter().enumerate() {
            let id = strategy.id();
            let started = Instant::now();
            info!("[{}/{}] 尝试解析策略: {}", index + 1, self.strategies.len(), id);

            match strategy.attempt(&link).await {
                Ok(data) => {
                    info!(
                        "解析成功: strategy={}, files={}, 耗时={}ms",
                        id,
                        data.file_count(),
                        started.elapsed().as_millis()
                    );
                    return LookupResult::Found {
                        data,
                        source: id.to_string(),
                    };
                }
                Err(e) => {
                    warn!(
                        "解析策略失败: strategy={}, timeout={}, 耗时={}ms, 错误: {}",
                        id,
                        e.is_timeout(),
                        started.elapsed().as_millis(),
                        e
                    );
                    details.push(format!("{}: {}", id, e));
                }
            }
        }

        warn!("所有解析策略均失败: url={}, attempts={}", raw_url, details.len());

        LookupResult::Exhausted {
            error: EXHAUSTED_MESSAGE.to_string(),
            details,
        }
    }
}

impl std::fmt::Debug for FallbackResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackResolver")
            .field("strategies", &self.strategy_ids())
            .finish()
    }
}
