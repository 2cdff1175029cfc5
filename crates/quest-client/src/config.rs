//! 客户端配置

use std::path::PathBuf;

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::Result;

/// 客户端配置
///
/// 环境变量覆盖使用 QUEST_CLIENT_ 前缀，如 QUEST_CLIENT_BASE_URL
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// 请求超时（秒），不设置则不限制
    pub timeout_secs: Option<u64>,
    /// 本地状态文件，不设置则只保存在内存中
    pub storage_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            timeout_secs: None,
            storage_path: None,
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// 从环境变量加载，未设置的字段使用默认值
    pub fn from_env() -> Result<Self> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("QUEST_CLIENT")
                    .prefix_separator("_")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}
