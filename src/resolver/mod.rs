// 分享链接解析模块
//
// 四种解析策略按固定顺序依次尝试，第一个成功的结果即为最终结果

pub mod client;
pub mod mirror;
pub mod orchestrator;
pub mod scrape;
pub mod traits;
pub mod vendor;

pub use mirror::MirrorApiStrategy;
pub use orchestrator::{FallbackResolver, LookupResult};
pub use scrape::PageScrapeStrategy;
pub use traits::LookupStrategy;
pub use vendor::VendorDirectStrategy;
