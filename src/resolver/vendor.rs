// 网盘接口直连策略
//
// 1. /api/shorturlinfo 获取分享会话信息（shareid / uk / sign / timestamp）
// 2. /share/list 获取分享根目录文件列表

use crate::config::{LookupConfig, VendorConfig};
use crate::resolver::client::build_client;
use crate::resolver::LookupStrategy;
use crate::share::{normalize_listing, FileData, LookupError, ShareInfo, ShareLink};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

/// 单页最多获取的文件数
const PAGE_SIZE: u32 = 100;

/// shorturlinfo 响应
#[derive(Debug, Deserialize)]
struct ShortUrlInfoResponse {
    /// 错误码（0表示成功）
    #[serde(default = "missing_errno")]
    errno: i64,
    #[serde(default)]
    errmsg: Option<String>,
    #[serde(default)]
    shareid: Value,
    #[serde(default)]
    uk: Value,
    #[serde(default)]
    sign: Value,
    #[serde(default)]
    timestamp: Value,
}

/// share/list 响应
#[derive(Debug, Deserialize)]
struct ShareListResponse {
    #[serde(default = "missing_errno")]
    errno: i64,
    #[serde(default)]
    errmsg: Option<String>,
    /// 上游偶尔返回 "list": null，按空列表处理
    #[serde(default)]
    list: Option<Vec<Value>>,
}

/// 响应中没有 errno 时视为失败
fn missing_errno() -> i64 {
    -1
}

/// 网盘接口直连策略
#[derive(Debug, Clone)]
pub struct VendorDirectStrategy {
    client: Client,
    base_override: Option<String>,
}

impl VendorDirectStrategy {
    pub const ID: &'static str = "vendor_direct";

    pub fn new(vendor: &VendorConfig, lookup: &LookupConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(lookup, vendor.timeout_secs, true)?,
            base_override: vendor
                .base_override
                .as_ref()
                .map(|b| b.trim_end_matches('/').to_string()),
        })
    }

    fn base_url<'a>(&'a self, link: &'a ShareLink) -> &'a str {
        self.base_override.as_deref().unwrap_or_else(|| link.vendor_base())
    }

    /// 获取分享会话信息
    async fn fetch_share_info(&self, base: &str, share_id: &str) -> Result<ShareInfo, LookupError> {
        let url = format!("{}/api/shorturlinfo", base);
        let referer = format!("{}/s/{}", base, share_id);

        let body = self
            .client
            .get(&url)
            .query(&[("shorturl", share_id), ("root", "1")])
            .header("Referer", &referer)
            .send()
            .await?
            .text()
            .await?;
        debug!("shorturlinfo 响应: {}", body);

        let info: ShortUrlInfoResponse = serde_json::from_str(&body)?;
        if info.errno != 0 {
            return Err(LookupError::upstream(info.errno, info.errmsg.as_deref()));
        }

        Ok(ShareInfo {
            share_id: info.shareid,
            user_key: info.uk,
            signature: info.sign,
            timestamp: info.timestamp,
        })
    }

    /// 获取分享根目录文件列表
    async fn fetch_file_list(&self, base: &str, share_id: &str) -> Result<Vec<Value>, LookupError> {
        let url = format!("{}/share/list", base);
        let referer = format!("{}/s/{}", base, share_id);
        let page_size = PAGE_SIZE.to_string();

        let body = self
            .client
            .get(&url)
            .query(&[
                ("shorturl", share_id),
                ("root", "1"),
                ("page", "1"),
                ("num", page_size.as_str()),
            ])
            .header("Referer", &referer)
            .send()
            .await?
            .text()
            .await?;
        debug!("share/list 响应: {}", body);

        let list: ShareListResponse = serde_json::from_str(&body)?;
        if list.errno != 0 {
            return Err(LookupError::upstream(list.errno, list.errmsg.as_deref()));
        }

        Ok(list.list.unwrap_or_default())
    }
}

#[async_trait]
impl LookupStrategy for VendorDirectStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn attempt(&self, link: &ShareLink) -> Result<FileData, LookupError> {
        let share_id = link.share_id()?;
        let base = self.base_url(link);

        let share_info = self.fetch_share_info(base, &share_id).await?;
        let records = self.fetch_file_list(base, &share_id).await?;

        if records.is_empty() {
            return Err(LookupError::NoFiles);
        }

        info!("网盘接口获取文件列表成功: share_id={}, files={}", share_id, records.len());

        Ok(FileData::Listing(normalize_listing(&records, Some(share_info))))
    }
}
