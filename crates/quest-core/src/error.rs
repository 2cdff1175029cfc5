//! 领域错误类型定义

use thiserror::Error;

use crate::models::{SubmissionStatus, SubmissionType};

/// 提交内容校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ContentError {
    #[error("提交内容不能为空: {0}")]
    Empty(SubmissionType),

    #[error("无效的链接: {0}")]
    InvalidUrl(String),

    #[error("{0} 不能包含空白字符")]
    ContainsWhitespace(SubmissionType),

    #[error("提交内容过长，最多 {max} 个字符")]
    TooLong { max: usize },

    #[error("提交类型不匹配: 任务要求 {expected}，实际 {actual}")]
    TypeMismatch {
        expected: SubmissionType,
        actual: SubmissionType,
    },
}

/// 审核流程错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("不允许的状态流转: {from} -> {to}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error("只有需修改的提交才能重新提交，当前状态: {0}")]
    NotAwaitingRevision(SubmissionStatus),

    #[error(transparent)]
    Content(#[from] ContentError),
}

/// 提交资格错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("任务当前不接受提交: {0}")]
    QuestClosed(String),

    #[error("前置任务未完成: {}", .0.join(", "))]
    MissingPrerequisites(Vec<String>),

    #[error("任务已完成: {0}")]
    AlreadyCompleted(String),

    #[error("已有待审核或已通过的提交: {0}")]
    DuplicateSubmission(String),
}

impl SubmitError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Content(_) => "INVALID_CONTENT",
            Self::QuestClosed(_) => "QUEST_CLOSED",
            Self::MissingPrerequisites(_) => "PREREQUISITES_NOT_MET",
            Self::AlreadyCompleted(_) => "QUEST_ALREADY_COMPLETED",
            Self::DuplicateSubmission(_) => "DUPLICATE_SUBMISSION",
        }
    }
}

impl ReviewError {
    /// 返回错误码（用于 API 响应）
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::NotAwaitingRevision(_) => "NOT_AWAITING_REVISION",
            Self::Content(_) => "INVALID_CONTENT",
        }
    }
}
