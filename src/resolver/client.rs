// 出站 HTTP 客户端构建

use crate::config::LookupConfig;
use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

/// 为单个策略构建 HTTP 客户端
///
/// 每个策略在启动时构建一次，之后在请求间共享（reqwest 内部自带连接池）
pub fn build_client(lookup: &LookupConfig, timeout_secs: u64, cookie_store: bool) -> Result<Client> {
    let mut builder = Client::builder()
        .user_agent(lookup.user_agent.as_str())
        .timeout(Duration::from_secs(timeout_secs))
        .redirect(reqwest::redirect::Policy::limited(10))
        .cookie_store(cookie_store);

    if let Some(ref proxy) = lookup.proxy {
        let proxy = reqwest::Proxy::all(proxy.as_str())
            .with_context(|| format!("无效的代理地址: {}", proxy))?;
        builder = builder.proxy(proxy);
    }

    builder.build().context("Failed to create HTTP client")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_client_default() {
        let lookup = LookupConfig::default();
        assert!(build_client(&lookup, 10, false).is_ok());
        assert!(build_client(&lookup, 10, true).is_ok());
    }

    #[test]
    fn test_build_client_with_proxy() {
        let mut lookup = LookupConfig::default();
        lookup.proxy = Some("socks5://127.0.0.1:1080".to_string());
        assert!(build_client(&lookup, 10, false).is_ok());

        lookup.proxy = Some("not a proxy".to_string());
        assert!(build_client(&lookup, 10, false).is_err());
    }
}
