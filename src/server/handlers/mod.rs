// API处理器模块

pub mod relay;
pub mod service;

pub use relay::*;
pub use service::*;
