// Web服务器模块

pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
