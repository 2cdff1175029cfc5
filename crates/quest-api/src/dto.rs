//! 请求与响应 DTO

use quest_core::{Difficulty, QuestCategory, QuestStatus, SubmissionContent};
use serde::{Deserialize, Serialize};

/// API 统一响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn success_empty() -> Self {
        Self {
            success: true,
            code: "SUCCESS".to_string(),
            message: "操作成功".to_string(),
            data: None,
        }
    }
}

/// 任务列表查询参数
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestListQuery {
    pub status: Option<QuestStatus>,
    pub category: Option<QuestCategory>,
    pub difficulty: Option<Difficulty>,
}

/// 提交或重新提交的请求体
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub content: SubmissionContent,
}

/// Discord 授权地址
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscordConnectResponse {
    pub url: String,
}

/// Discord 回调参数
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiscordCallbackQuery {
    pub code: Option<String>,
    pub error: Option<String>,
}
