//! 任务提交实体
//!
//! 管理后台的"提交"和任务详情页的"任务完成记录"是同一实体，统一用 `Submission` 表示。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::ValidateUrl;

use super::{SubmissionStatus, SubmissionType};
use crate::error::ContentError;

/// 文本类提交的最大长度（字符）
pub const MAX_TEXT_CHARS: usize = 10_000;

/// 提交内容
///
/// 按任务要求的提交类型区分，序列化为 `{"type": "...", "value": "..."}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "kebab-case")]
pub enum SubmissionContent {
    Url(String),
    Text(String),
    TransactionId(String),
    AccountId(String),
    /// 上传文件名
    File(String),
}

impl SubmissionContent {
    pub fn kind(&self) -> SubmissionType {
        match self {
            Self::Url(_) => SubmissionType::Url,
            Self::Text(_) => SubmissionType::Text,
            Self::TransactionId(_) => SubmissionType::TransactionId,
            Self::AccountId(_) => SubmissionType::AccountId,
            Self::File(_) => SubmissionType::File,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Url(v)
            | Self::Text(v)
            | Self::TransactionId(v)
            | Self::AccountId(v)
            | Self::File(v) => v,
        }
    }

    /// 列表展示用的截断文本，按字符截断并追加省略号
    pub fn preview(&self, max_chars: usize) -> String {
        let value = self.value().trim();
        if value.chars().count() <= max_chars {
            return value.to_string();
        }
        let mut truncated: String = value.chars().take(max_chars).collect();
        truncated.push('…');
        truncated
    }

    /// 校验内容格式
    pub fn validate(&self) -> Result<(), ContentError> {
        let value = self.value().trim();
        if value.is_empty() {
            return Err(ContentError::Empty(self.kind()));
        }

        match self {
            Self::Url(_) => {
                let is_http = value.starts_with("http://") || value.starts_with("https://");
                if !is_http || !value.validate_url() {
                    return Err(ContentError::InvalidUrl(value.to_string()));
                }
            }
            Self::Text(_) => {
                if value.chars().count() > MAX_TEXT_CHARS {
                    return Err(ContentError::TooLong {
                        max: MAX_TEXT_CHARS,
                    });
                }
            }
            Self::TransactionId(_) | Self::AccountId(_) => {
                if value.chars().any(char::is_whitespace) {
                    return Err(ContentError::ContainsWhitespace(self.kind()));
                }
            }
            Self::File(_) => {}
        }

        Ok(())
    }

    /// 去除首尾空白后的副本
    pub fn normalized(&self) -> Self {
        let v = self.value().trim().to_string();
        match self {
            Self::Url(_) => Self::Url(v),
            Self::Text(_) => Self::Text(v),
            Self::TransactionId(_) => Self::TransactionId(v),
            Self::AccountId(_) => Self::AccountId(v),
            Self::File(_) => Self::File(v),
        }
    }
}

/// 任务提交记录
///
/// 一条提交只属于一个任务和一个用户；状态只由管理员审核推进
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: String,
    pub quest_id: String,
    pub user_id: String,
    pub content: SubmissionContent,
    pub status: SubmissionStatus,
    /// 审核意见（拒绝时即拒绝原因）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward_earned: Option<u32>,
    pub submitted_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reviewed_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected_at: Option<DateTime<Utc>>,
    /// 审核管理员 ID
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validated_by: Option<String>,
}

impl Submission {
    /// 创建待审核提交
    pub fn new(
        quest_id: impl Into<String>,
        user_id: impl Into<String>,
        content: SubmissionContent,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            quest_id: quest_id.into(),
            user_id: user_id.into(),
            content,
            status: SubmissionStatus::Pending,
            feedback: None,
            reward_earned: None,
            submitted_at: now,
            reviewed_at: None,
            validated_at: None,
            rejected_at: None,
            validated_by: None,
        }
    }

    /// 是否仍占用该任务的提交名额（待审或已通过）
    pub fn is_blocking_resubmission(&self) -> bool {
        matches!(
            self.status,
            SubmissionStatus::Pending | SubmissionStatus::Approved
        )
    }
}
