//! 任务平台客户端
//!
//! 封装 REST API 调用，并提供各页面的状态与业务编排：
//! 任务目录、任务提交、审核后台、徽章管理和全局会话。
//!
//! ## 模块结构
//!
//! - `api`: `QuestApi` trait 与基于 reqwest 的实现
//! - `storage`: 本地 token 与界面偏好
//! - `session`: 全局当前用户
//! - `service`: 任务目录、详情、提交和首页统计
//! - `review`: 审核后台
//! - `catalog`: 任务目录筛选
//! - `badge_admin`: 徽章管理
//! - `config`: 客户端配置
//! - `error`: 错误类型定义

pub mod api;
pub mod badge_admin;
pub mod catalog;
pub mod config;
pub mod error;
pub mod review;
pub mod service;
pub mod session;
pub mod storage;

pub use api::{ApiClient, QuestApi};
pub use badge_admin::{BadgeAdmin, Confirm};
pub use catalog::QuestCatalog;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use review::ReviewBoard;
pub use service::{DashboardStats, QuestDetails, QuestService};
pub use session::Session;
pub use storage::{ClientStorage, FileStorage, MemoryStorage, UiPreferences};

use std::sync::Arc;

/// 按配置创建客户端：配置了 `storage_path` 时使用文件存储
pub fn connect(config: &ClientConfig) -> Result<ApiClient> {
    let storage: Arc<dyn ClientStorage> = match &config.storage_path {
        Some(path) => Arc::new(FileStorage::open(path)?),
        None => Arc::new(MemoryStorage::new()),
    };
    ApiClient::new(config, storage)
}
