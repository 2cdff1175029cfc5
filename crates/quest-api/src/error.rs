//! 服务错误类型定义

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quest_core::{ReviewError, SubmitError};
use serde_json::json;

/// API 错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("未授权: {0}")]
    Unauthorized(String),
    #[error("禁止访问: {0}")]
    Forbidden(String),

    #[error("参数验证失败: {0}")]
    Validation(String),

    #[error("任务不存在: {0}")]
    QuestNotFound(String),
    #[error("提交不存在: {0}")]
    SubmissionNotFound(String),
    #[error("徽章不存在: {0}")]
    BadgeNotFound(String),
    #[error("用户不存在: {0}")]
    UserNotFound(String),

    #[error(transparent)]
    Review(#[from] ReviewError),
    #[error(transparent)]
    Submit(#[from] SubmitError),

    #[error("Discord 登录未配置")]
    OAuthNotConfigured,

    #[error("内部错误: {0}")]
    Internal(String),
}

impl ApiError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,

            Self::Validation(_) => StatusCode::BAD_REQUEST,

            Self::QuestNotFound(_)
            | Self::SubmissionNotFound(_)
            | Self::BadgeNotFound(_)
            | Self::UserNotFound(_) => StatusCode::NOT_FOUND,

            Self::Review(ReviewError::Content(_)) => StatusCode::BAD_REQUEST,
            Self::Review(_) => StatusCode::CONFLICT,

            Self::Submit(SubmitError::Content(_)) => StatusCode::BAD_REQUEST,
            Self::Submit(SubmitError::QuestClosed(_) | SubmitError::MissingPrerequisites(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Submit(_) => StatusCode::CONFLICT,

            Self::OAuthNotConfigured | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::QuestNotFound(_) => "QUEST_NOT_FOUND",
            Self::SubmissionNotFound(_) => "SUBMISSION_NOT_FOUND",
            Self::BadgeNotFound(_) => "BADGE_NOT_FOUND",
            Self::UserNotFound(_) => "USER_NOT_FOUND",
            Self::Review(e) => e.code(),
            Self::Submit(e) => e.code(),
            Self::OAuthNotConfigured => "OAUTH_NOT_CONFIGURED",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 内部错误只返回通用提示，详细信息记录日志
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!(error = %e, "内部错误");
                "服务内部错误，请稍后重试".to_string()
            }
            Self::OAuthNotConfigured => {
                tracing::error!("DISCORD_CLIENT_ID 未配置");
                self.to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "error": message,
            "data": serde_json::Value::Null
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use quest_core::{ContentError, SubmissionStatus, SubmissionType};

    #[test]
    fn test_status_codes() {
        let conflict = ApiError::from(ReviewError::InvalidTransition {
            from: SubmissionStatus::Approved,
            to: SubmissionStatus::Rejected,
        });
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(conflict.error_code(), "INVALID_TRANSITION");

        let bad_content = ApiError::from(SubmitError::Content(ContentError::Empty(
            SubmissionType::Text,
        )));
        assert_eq!(bad_content.status_code(), StatusCode::BAD_REQUEST);

        assert_eq!(
            ApiError::OAuthNotConfigured.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_message_is_generic() {
        let response = ApiError::Internal("lock poisoned at store.rs".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
