//! 集成测试共用的配置构建

#![allow(dead_code)]

use netdisk_share_relay::config::{LookupConfig, MirrorConfig, VendorConfig};

/// 所有策略都指向本地 mock 服务器的配置
pub fn lookup_config(server_url: &str) -> LookupConfig {
    let mut mirror_a = MirrorConfig::new(format!("{}/mirror-a", server_url));
    mirror_a.timeout_secs = 5;
    let mut mirror_b = MirrorConfig::new(format!("{}/mirror-b", server_url));
    mirror_b.timeout_secs = 5;

    let mut lookup = LookupConfig {
        mirror_a,
        mirror_b,
        vendor: VendorConfig {
            enabled: true,
            timeout_secs: 5,
            base_override: Some(server_url.to_string()),
        },
        ..LookupConfig::default()
    };
    lookup.scrape.timeout_secs = 5;
    lookup
}

/// mock 服务器上的分享链接
pub fn share_link(server_url: &str, share_id: &str) -> String {
    format!("{}/s/{}", server_url, share_id)
}
