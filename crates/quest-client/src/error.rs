//! 客户端错误类型定义

use quest_core::{ContentError, ReviewError, SubmitError};
use thiserror::Error;

/// 客户端错误
#[derive(Debug, Error)]
pub enum ClientError {
    /// 本地没有访问 token，请求未发出
    #[error("需要登录后操作")]
    AuthenticationRequired,

    #[error("表单校验失败: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Review(#[from] ReviewError),

    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("API 错误 {status} [{code}]: {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("网络错误: {0}")]
    Network(#[source] reqwest::Error),

    #[error("响应解析失败: {0}")]
    Decode(String),

    #[error("本地存储错误: {0}")]
    Storage(String),

    #[error("记录不存在: {0}")]
    NotFound(String),

    #[error("操作已取消")]
    Cancelled,

    #[error("配置错误: {0}")]
    Config(#[from] config::ConfigError),
}

impl ClientError {
    /// 服务端返回的错误码；本地错误返回 None
    pub fn api_code(&self) -> Option<&str> {
        match self {
            Self::Api { code, .. } => Some(code),
            _ => None,
        }
    }

    pub fn is_auth_error(&self) -> bool {
        match self {
            Self::AuthenticationRequired => true,
            Self::Api { status, .. } => *status == 401,
            _ => false,
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Network(err)
        }
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
