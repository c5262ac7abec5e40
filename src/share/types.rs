// 解析结果数据类型

use crate::share::size::format_size;
use serde::Serialize;
use serde_json::Value;

/// 分享中的单个文件（或目录）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    /// 文件 fs_id（字符串形式）
    pub id: String,
    /// 文件名
    pub name: String,
    /// 文件大小（字节），未知时为 None
    pub size_bytes: Option<u64>,
    /// 可读大小，始终由 size_bytes 推导
    pub size_formatted: String,
    /// 是否为目录
    pub is_directory: bool,
    /// 下载链接
    pub download_link: Option<String>,
    /// 缩略图
    pub thumbnail: Option<String>,
}

impl FileEntry {
    pub fn new(id: impl Into<String>, name: impl Into<String>, size_bytes: Option<u64>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            size_bytes,
            size_formatted: format_size(size_bytes),
            is_directory: false,
            download_link: None,
            thumbnail: None,
        }
    }

    pub fn with_directory(mut self, is_directory: bool) -> Self {
        self.is_directory = is_directory;
        self
    }

    pub fn with_download_link(mut self, link: Option<String>) -> Self {
        self.download_link = link;
        self
    }

    pub fn with_thumbnail(mut self, thumbnail: Option<String>) -> Self {
        self.thumbnail = thumbnail;
        self
    }
}

/// 网盘接口返回的会话信息，原样透传
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShareInfo {
    pub share_id: Value,
    pub user_key: Value,
    pub signature: Value,
    pub timestamp: Value,
}

/// 单文件结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SingleFile {
    /// 文件 fs_id（页面抓取时可得）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub filename: String,
    /// 上游原始 size 字段
    pub size: Value,
    pub size_formatted: String,
    pub thumbnail: Option<String>,
    pub download_link: Option<String>,
    /// 不同清晰度的播放/下载地址，原样透传
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolutions: Option<Value>,
}

/// 多文件结果
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileListing {
    pub files: Vec<FileEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_info: Option<ShareInfo>,
}

/// 策略成功后返回的数据
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FileData {
    Single(SingleFile),
    Listing(FileListing),
    /// 无法识别的上游结构，原样透传
    Raw(Value),
}

impl FileData {
    /// 结果中的文件数
    pub fn file_count(&self) -> usize {
        match self {
            FileData::Single(_) => 1,
            FileData::Listing(listing) => listing.files.len(),
            FileData::Raw(_) => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_entry_derives_formatted_size() {
        let entry = FileEntry::new("42", "movie.mp4", Some(1_048_576));
        assert_eq!(entry.size_formatted, "1.00 MB");
        assert!(!entry.is_directory);

        let entry = FileEntry::new("43", "folder", None).with_directory(true);
        assert_eq!(entry.size_formatted, "Unknown");
        assert!(entry.is_directory);
    }

    #[test]
    fn test_file_entry_serializes_camel_case() {
        let entry = FileEntry::new("1", "a.txt", Some(1536))
            .with_download_link(Some("https://d/1".to_string()));
        let json = serde_json::to_value(&entry).unwrap();

        assert_eq!(
            json,
            json!({
                "id": "1",
                "name": "a.txt",
                "sizeBytes": 1536,
                "sizeFormatted": "1.50 KB",
                "isDirectory": false,
                "downloadLink": "https://d/1",
                "thumbnail": null
            })
        );
    }

    #[test]
    fn test_file_data_untagged() {
        let raw = FileData::Raw(json!({"foo": "bar"}));
        assert_eq!(serde_json::to_value(&raw).unwrap(), json!({"foo": "bar"}));
        assert_eq!(raw.file_count(), 0);

        let listing = FileData::Listing(FileListing {
            files: vec![FileEntry::new("1", "a", None), FileEntry::new("2", "b", None)],
            share_info: None,
        });
        let json = serde_json::to_value(&listing).unwrap();
        assert_eq!(json["files"].as_array().unwrap().len(), 2);
        assert!(json.get("shareInfo").is_none());
        assert_eq!(listing.file_count(), 2);
    }
}
