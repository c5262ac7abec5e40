// 文件大小格式化

use serde_json::Value;

const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];

/// 未知大小的占位文本
pub const UNKNOWN_SIZE: &str = "Unknown";

/// 字节数格式化为可读字符串
///
/// - 缺失或为 0 时返回 `"Unknown"`
/// - 最多除 4 次 1024（B → TB），保留两位小数
///
/// # Examples
///
/// ```
/// use netdisk_share_relay::share::format_size;
///
/// assert_eq!(format_size(Some(1536)), "1.50 KB");
/// assert_eq!(format_size(None), "Unknown");
/// ```
pub fn format_size(bytes: Option<u64>) -> String {
    match bytes {
        None | Some(0) => UNKNOWN_SIZE.to_string(),
        Some(b) => scale(b as f64),
    }
}

/// 格式化上游 JSON 中的原始 size 字段
///
/// 上游的 size 可能是数字、数字字符串，甚至已经是 "12 MB" 这样的文本：
/// - null / false / 0 / 空串 → `"Unknown"`
/// - 可解析为整数 → 按字节格式化
/// - 其余原样返回
pub fn format_size_value(value: &Value) -> String {
    match value {
        Value::Null | Value::Bool(false) => UNKNOWN_SIZE.to_string(),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                format_size(Some(u))
            } else if let Some(f) = n.as_f64() {
                let whole = f.trunc();
                if whole == 0.0 {
                    UNKNOWN_SIZE.to_string()
                } else {
                    scale(whole)
                }
            } else {
                n.to_string()
            }
        }
        Value::String(s) if s.is_empty() => UNKNOWN_SIZE.to_string(),
        Value::String(s) => match parse_integer(s) {
            Some(n) if n == 0.0 => UNKNOWN_SIZE.to_string(),
            Some(n) => scale(n),
            None => s.clone(),
        },
        other => other.to_string(),
    }
}

/// 字符串形式的字节数："1536"、" 2048 "、"1536.7"
fn parse_integer(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if let Ok(n) = trimmed.parse::<i64>() {
        return Some(n as f64);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .map(f64::trunc)
}

fn scale(bytes: f64) -> String {
    let mut size = bytes;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.2} {}", size, UNITS[unit])
}
