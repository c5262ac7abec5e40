// 分享链接解析

use crate::share::LookupError;
use regex::Regex;
use std::sync::LazyLock;

/// /s/{key} 格式，如 https://www.terabox.com/s/1abcDEFg
static PATH_FORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"/s/(1?[A-Za-z0-9_-]+)").expect("Invalid share path regex")
});

/// ?surl={key} 格式，如 https://www.terabox.com/sharing/link?surl=abcDEFg
static QUERY_FORM_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[?&]surl=(1?[A-Za-z0-9_-]+)").expect("Invalid surl regex")
});

/// 默认网盘站点
pub const DEFAULT_VENDOR_BASE: &str = "https://www.terabox.com";

/// 已知镜像域名（按优先级排列）及其 API 站点
const VENDOR_HOSTS: &[(&str, &str)] = &[
    ("1024terabox.com", "https://www.1024terabox.com"),
    ("teraboxapp.com", "https://www.teraboxapp.com"),
    ("terabox.app", "https://www.terabox.app"),
    ("4funbox.com", "https://www.4funbox.com"),
    ("mirrobox.com", "https://www.mirrobox.com"),
    ("nephobox.com", "https://www.nephobox.com"),
    ("freeterabox.com", "https://www.freeterabox.com"),
    ("momerybox.com", "https://www.momerybox.com"),
    ("tibibox.com", "https://www.tibibox.com"),
];

/// 从链接中提取分享 ID
///
/// 支持格式：
/// - https://www.terabox.com/s/1abcDEFg → "1abcDEFg"
/// - https://www.terabox.com/sharing/link?surl=abcDEFg → "abcDEFg"
///
/// 先匹配路径形式，再匹配查询参数形式。不做大小写转换，也不补 "1" 前缀。
pub fn extract_share_id(url: &str) -> Result<String, LookupError> {
    [&*PATH_FORM_RE, &*QUERY_FORM_RE]
        .iter()
        .find_map(|re| re.captures(url))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| LookupError::InvalidLink(url.to_string()))
}

/// 根据链接中的域名选择 API 站点
///
/// 只做查表，不做校验：任何输入都会得到一个站点，未命中时返回默认站点
pub fn resolve_vendor_base(url: &str) -> &'static str {
    VENDOR_HOSTS
        .iter()
        .find(|(host, _)| url.contains(host))
        .map(|(_, base)| *base)
        .unwrap_or(DEFAULT_VENDOR_BASE)
}

/// 用户提交的原始分享链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareLink {
    raw_url: String,
}

impl ShareLink {
    pub fn new(raw_url: impl Into<String>) -> Self {
        Self {
            raw_url: raw_url.into(),
        }
    }

    /// 原始链接（镜像接口和页面抓取直接使用）
    pub fn raw_url(&self) -> &str {
        &self.raw_url
    }

    /// 分享 ID，链接格式不对时返回 `InvalidLink`
    pub fn share_id(&self) -> Result<String, LookupError> {
        extract_share_id(&self.raw_url)
    }

    /// 对应的网盘 API 站点
    pub fn vendor_base(&self) -> &'static str {
        resolve_vendor_base(&self.raw_url)
    }
}

impl std::fmt::Display for ShareLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw_url)
    }
}
