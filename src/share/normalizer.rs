// 上游响应归一化
//
// 镜像接口、网盘接口和页面内嵌 JSON 的结构各不相同，这里统一转换为
// SingleFile / FileListing 两种输出

use crate::share::size::format_size_value;
use crate::share::types::{FileData, FileEntry, FileListing, ShareInfo, SingleFile};
use serde_json::Value;

/// 单文件结构的特征字段
const FILENAME_KEYS: [&str; 2] = ["file_name", "filename"];
const DOWNLOAD_LINK_KEYS: [&str; 2] = ["download_link", "dlink"];
const RESOLUTIONS_KEY: &str = "resolutions";

const SIZE_KEYS: [&str; 2] = ["sizebytes", "size"];
const THUMBNAIL_KEYS: [&str; 2] = ["thumb", "thumbnail"];

/// 列表记录中的文件名字段
const RECORD_NAME_KEYS: [&str; 2] = ["server_filename", "filename"];
/// 缩略图尺寸，按优先级
const THUMB_VARIANTS: [&str; 2] = ["url3", "url2"];

/// 上游 JSON 的结构类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseShape {
    /// 单文件记录（含文件名、清晰度或下载链接）
    SingleFile,
    /// 文件列表（含 list 数组）
    Listing,
    /// 无法识别
    Unrecognized,
}

/// 判断上游 JSON 的结构
pub fn detect_shape(value: &Value) -> ResponseShape {
    let has_any = |keys: &[&str]| keys.iter().any(|k| present(value, k).is_some());

    if has_any(&FILENAME_KEYS) || has_any(&DOWNLOAD_LINK_KEYS) || has_any(&[RESOLUTIONS_KEY]) {
        ResponseShape::SingleFile
    } else if value.get("list").map_or(false, Value::is_array) {
        ResponseShape::Listing
    } else {
        ResponseShape::Unrecognized
    }
}

/// 归一化任意上游 JSON
///
/// 无法识别的结构原样透传，不视为失败
pub fn normalize(value: Value) -> FileData {
    match detect_shape(&value) {
        ResponseShape::SingleFile => FileData::Single(normalize_single(&value)),
        ResponseShape::Listing => {
            let records = value["list"].as_array().map(Vec::as_slice).unwrap_or(&[]);
            FileData::Listing(normalize_listing(records, None))
        }
        ResponseShape::Unrecognized => FileData::Raw(value),
    }
}

/// 单文件结构 → SingleFile
pub fn normalize_single(value: &Value) -> SingleFile {
    let size = first_present(value, &SIZE_KEYS).cloned().unwrap_or(Value::Null);

    SingleFile {
        id: None,
        filename: first_str(value, &FILENAME_KEYS).unwrap_or_else(|| "Unknown".to_string()),
        size_formatted: format_size_value(&size),
        size,
        thumbnail: first_str(value, &THUMBNAIL_KEYS),
        download_link: first_str(value, &DOWNLOAD_LINK_KEYS),
        resolutions: present(value, RESOLUTIONS_KEY).cloned(),
    }
}

/// 文件列表记录 → FileListing
pub fn normalize_listing(records: &[Value], share_info: Option<ShareInfo>) -> FileListing {
    FileListing {
        files: records.iter().map(entry_from_record).collect(),
        share_info,
    }
}

/// 单条列表记录 → FileEntry
///
/// 网盘接口和分享页面内嵌数据使用同一种记录格式：
/// `fs_id` / `server_filename` / `size` / `isdir` / `dlink` / `thumbs`
pub fn entry_from_record(record: &Value) -> FileEntry {
    // fs_id 可能是字符串或数字
    let id = match &record["fs_id"] {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        _ => String::new(),
    };

    let name = first_str(record, &RECORD_NAME_KEYS).unwrap_or_else(|| "Unknown".to_string());

    let size = match &record["size"] {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };

    let is_dir = match &record["isdir"] {
        Value::Number(n) => n.as_i64() == Some(1),
        Value::String(s) => s == "1",
        Value::Bool(b) => *b,
        _ => false,
    };

    let thumbnail = THUMB_VARIANTS
        .iter()
        .find_map(|k| record["thumbs"][*k].as_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    FileEntry::new(id, name, size)
        .with_directory(is_dir)
        .with_download_link(non_empty_str(&record["dlink"]))
        .with_thumbnail(thumbnail)
}

/// 字段存在且不为 null
fn present<'a>(value: &'a Value, key: &str) -> Option<&'a Value> {
    value.get(key).filter(|v| !v.is_null())
}

fn first_present<'a>(value: &'a Value, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|k| present(value, k))
}

/// 依次取第一个非空字符串字段
pub(crate) fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|k| non_empty_str(&value[*k]))
}

fn non_empty_str(value: &Value) -> Option<String> {
    value.as_str().filter(|s| !s.is_empty()).map(str::to_string)
}
