//! 数据查询服务公共模块
//!
//! 提供配置加载、错误类型、中间件、数据模型以及行数据序列化工具。

pub mod config;
pub mod errors;
pub mod middleware;
pub mod models;
pub mod response;
pub mod utils;

/// Version string reported by the ping endpoint.
pub const VERSION: &str = "0.1.3_hybrid";
