// 第三方镜像接口策略
//
// 把原始分享链接交给外部镜像服务解析，返回的 JSON 交给归一化器处理

use crate::config::{LookupConfig, MirrorConfig};
use crate::resolver::client::build_client;
use crate::resolver::LookupStrategy;
use crate::share::{detect_shape, normalize, FileData, LookupError, ResponseShape, ShareLink};
use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// 镜像接口策略（mirror_a / mirror_b 各一个实例）
#[derive(Debug, Clone)]
pub struct MirrorApiStrategy {
    id: String,
    endpoint: String,
    query_param: String,
    client: Client,
}

impl MirrorApiStrategy {
    pub fn new(id: impl Into<String>, mirror: &MirrorConfig, lookup: &LookupConfig) -> Result<Self> {
        Ok(Self {
            id: id.into(),
            endpoint: mirror.endpoint.clone(),
            query_param: mirror.query_param.clone(),
            client: build_client(lookup, mirror.timeout_secs, false)?,
        })
    }

    /// 拼接请求地址，分享链接做 URL 编码后作为查询参数
    fn request_url(&self, raw_url: &str) -> String {
        let separator = if self.endpoint.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}={}",
            self.endpoint,
            separator,
            self.query_param,
            urlencoding::encode(raw_url)
        )
    }
}

#[async_trait]
impl LookupStrategy for MirrorApiStrategy {
    fn id(&self) -> &str {
        &self.id
    }

    async fn attempt(&self, link: &ShareLink) -> Result<FileData, LookupError> {
        let url = self.request_url(link.raw_url());
        debug!("[{}] 请求镜像接口: {}", self.id, url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        debug!("[{}] 镜像接口响应: status={}, body_len={}", self.id, status, body.len());

        if !status.is_success() {
            return Err(LookupError::HttpStatus(status.as_u16()));
        }

        let json: Value = serde_json::from_str(&body)?;

        // 文件名 / 清晰度 / 下载链接 至少要有一个
        if detect_shape(&json) != ResponseShape::SingleFile {
            return Err(LookupError::UnrecognizedResponse);
        }

        Ok(normalize(json))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strategy(endpoint: &str) -> MirrorApiStrategy {
        let lookup = LookupConfig::default();
        MirrorApiStrategy::new("mirror_a", &MirrorConfig::new(endpoint), &lookup).unwrap()
    }

    #[test]
    fn test_request_url_encodes_share_link() {
        let s = strategy("https://mirror.example/api");
        assert_eq!(
            s.request_url("https://www.terabox.com/s/1abc?pwd=x y"),
            "https://mirror.example/api?url=https%3A%2F%2Fwww.terabox.com%2Fs%2F1abc%3Fpwd%3Dx%20y"
        );
    }

    #[test]
    fn test_request_url_appends_to_existing_query() {
        let s = strategy("https://mirror.example/api?key=k");
        assert_eq!(
            s.request_url("https://t/s/1a"),
            "https://mirror.example/api?key=k&url=https%3A%2F%2Ft%2Fs%2F1a"
        );
    }

    #[test]
    fn test_id() {
        assert_eq!(strategy("https://m").id(), "mirror_a");
    }
}
