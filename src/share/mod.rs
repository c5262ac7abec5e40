// 分享链接领域模块
//
// 链接解析、文件大小格式化、上游响应归一化

pub mod error;
pub mod link;
pub mod normalizer;
pub mod size;
pub mod types;

pub use error::LookupError;
pub use link::{extract_share_id, resolve_vendor_base, ShareLink, DEFAULT_VENDOR_BASE};
pub use normalizer::{
    detect_shape, entry_from_record, normalize, normalize_listing, normalize_single, ResponseShape,
};
pub use size::{format_size, format_size_value};
pub use types::{FileData, FileEntry, FileListing, ShareInfo, SingleFile};
