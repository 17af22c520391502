//! # 仓库库存服务
//!
//! 以 Google Sheets 表格作为库存记录存储的 HTTP 后端：
//! - 列表、搜索、按公司筛选库存
//! - 新增产品、出库扣减数量
//! - 仪表盘指标、手动同步与健康检查

pub mod app;
pub mod config;
pub mod core;
pub mod infrastructure;

pub use app::{build_app, router, AppState};
pub use config::{Config, ConfigError};
