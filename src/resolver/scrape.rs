// 分享页面抓取策略
//
// 直接请求分享页面 HTML，从内嵌脚本中用正则提取文件信息

use crate::config::{LookupConfig, ScrapeConfig};
use crate::resolver::client::build_client;
use crate::resolver::LookupStrategy;
use crate::share::{
    format_size, normalize_listing, FileData, LookupError, ShareLink, SingleFile,
};
use anyhow::Result;
use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::sync::LazyLock;
use tracing::debug;

/// 页面要求人机验证时出现的标记
const VERIFY_MARKERS: [&str; 2] = ["need_verify", "security_verify"];

/// "list": [...] 后接逗号或右花括号
static LIST_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)"list"\s*:\s*(\[.*?\])\s*[,}]"#).expect("Invalid list regex")
});

static FILENAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#""server_filename"\s*:\s*"([^"]+)""#).expect("Invalid filename regex")
});

static FS_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""fs_id"\s*:\s*"?(\d+)"#).expect("Invalid fs_id regex"));

static SIZE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""size"\s*:\s*"?(\d+)"#).expect("Invalid size regex"));

static DLINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""dlink"\s*:\s*"([^"]+)""#).expect("Invalid dlink regex"));

/// 分享页面抓取策略
#[derive(Debug, Clone)]
pub struct PageScrapeStrategy {
    client: Client,
}

impl PageScrapeStrategy {
    pub const ID: &'static str = "page_scrape";

    pub fn new(scrape: &ScrapeConfig, lookup: &LookupConfig) -> Result<Self> {
        Ok(Self {
            client: build_client(lookup, scrape.timeout_secs, true)?,
        })
    }
}

#[async_trait]
impl LookupStrategy for PageScrapeStrategy {
    fn id(&self) -> &str {
        Self::ID
    }

    async fn attempt(&self, link: &ShareLink) -> Result<FileData, LookupError> {
        let response = self
            .client
            .get(link.raw_url())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;

        debug!("分享页面响应: status={}, body_len={}", status, body.len());

        extract_from_page(&body)
    }
}

/// 从分享页面 HTML 中提取文件信息
///
/// 依次尝试：
/// 1. 内嵌的 `"list": [...]` 数组
/// 2. 单独的 server_filename / fs_id / size / dlink 字段
pub fn extract_from_page(html: &str) -> Result<FileData, LookupError> {
    if VERIFY_MARKERS.iter().any(|m| html.contains(m)) {
        return Err(LookupError::VerificationRequired);
    }

    if let Some(listing) = extract_embedded_list(html) {
        return Ok(listing);
    }

    extract_single_fields(html)
        .map(FileData::Single)
        .ok_or(LookupError::ScrapeFailed)
}

/// 内嵌列表解析失败或为空时返回 None，继续尝试单字段提取
fn extract_embedded_list(html: &str) -> Option<FileData> {
    let raw = LIST_RE.captures(html)?.get(1)?.as_str();

    let records: Vec<Value> = match serde_json::from_str(raw) {
        Ok(records) => records,
        Err(e) => {
            debug!("内嵌列表解析失败，尝试单字段提取: {}", e);
            return None;
        }
    };

    if records.is_empty() {
        return None;
    }

    Some(FileData::Listing(normalize_listing(&records, None)))
}

/// 至少需要文件名和 fs_id
fn extract_single_fields(html: &str) -> Option<SingleFile> {
    let capture = |re: &Regex| {
        re.captures(html)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };

    let filename = capture(&FILENAME_RE)?;
    let id = capture(&FS_ID_RE)?;
    let size = capture(&SIZE_RE).and_then(|s| s.parse::<u64>().ok());
    let download_link = capture(&DLINK_RE).map(|l| strip_escapes(&l));

    Some(SingleFile {
        id: Some(id),
        filename: strip_escapes(&filename),
        size: size.map(Value::from).unwrap_or(Value::Null),
        size_formatted: format_size(size),
        thumbnail: None,
        download_link,
        resolutions: None,
    })
}

/// 去掉 JS 字符串里的反斜杠转义（`https:\/\/` → `https://`）
fn strip_escapes(s: &str) -> String {
    s.replace('\\', "")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_verification_marker() {
        let html = r#"<html><script>var need_verify = 1;</script></html>"#;
        assert!(matches!(
            extract_from_page(html),
            Err(LookupError::VerificationRequired)
        ));

        let html = r#"<div class="security_verify">"#;
        assert!(matches!(
            extract_from_page(html),
            Err(LookupError::VerificationRequired)
        ));
    }

    #[test]
    fn test_embedded_list() {
        let html = r#"<script>window.data = {"errno":0,"list":[{"fs_id":11,"server_filename":"a.mp4","size":1536,"isdir":0,"thumbs":{"url3":"https://t/3"}},{"fs_id":"12","server_filename":"dir","isdir":"1"}],"uk":5};</script>"#;

        let FileData::Listing(listing) = extract_from_page(html).unwrap() else {
            panic!("expected listing");
        };
        assert_eq!(listing.files.len(), 2);
        assert_eq!(listing.files[0].id, "11");
        assert_eq!(listing.files[0].size_formatted, "1.50 KB");
        assert_eq!(listing.files[0].thumbnail.as_deref(), Some("https://t/3"));
        assert_eq!(listing.files[1].id, "12");
        assert!(listing.files[1].is_directory);
        assert!(listing.share_info.is_none());
    }

    #[test]
    fn test_embedded_list_at_object_end() {
        let html = r#"{"list":[{"fs_id":1,"server_filename":"x"}]}"#;
        let data = extract_from_page(html).unwrap();
        assert_eq!(data.file_count(), 1);
    }

    #[test]
    fn test_empty_list_falls_through_to_single_fields() {
        let html = r#"{"list":[],"file":{"server_filename":"only.zip","fs_id":"77","size":"2048","dlink":"https:\/\/d.example\/file?x=1"}}"#;

        let FileData::Single(file) = extract_from_page(html).unwrap() else {
            panic!("expected single file");
        };
        assert_eq!(file.id.as_deref(), Some("77"));
        assert_eq!(file.filename, "only.zip");
        assert_eq!(file.size, json!(2048));
        assert_eq!(file.size_formatted, "2.00 KB");
        assert_eq!(file.download_link.as_deref(), Some("https://d.example/file?x=1"));
    }

    #[test]
    fn test_broken_list_falls_through() {
        // 记录内部的数组让非贪婪匹配提前截断，JSON 解析失败
        let html = r#"{"list":[{"fs_id":5,"server_filename":"v.mkv","tags":["a"], "size":10}]}"#;

        let FileData::Single(file) = extract_from_page(html).unwrap() else {
            panic!("expected single file");
        };
        assert_eq!(file.id.as_deref(), Some("5"));
        assert_eq!(file.filename, "v.mkv");
        assert_eq!(file.size_formatted, "10.00 B");
        assert!(file.download_link.is_none());
    }

    #[test]
    fn test_single_fields_without_size() {
        let html = r#"var f = {"server_filename":"a\\b.txt","fs_id":9};"#;
        let FileData::Single(file) = extract_from_page(html).unwrap() else {
            panic!("expected single file");
        };
        assert_eq!(file.filename, "ab.txt");
        assert_eq!(file.size, Value::Null);
        assert_eq!(file.size_formatted, "Unknown");
    }

    #[test]
    fn test_missing_id_fails() {
        let html = r#"<script>{"server_filename":"lonely.txt"}</script>"#;
        assert!(matches!(extract_from_page(html), Err(LookupError::ScrapeFailed)));
        assert!(matches!(extract_from_page(""), Err(LookupError::ScrapeFailed)));
    }
}
