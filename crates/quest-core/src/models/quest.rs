//! 任务实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Difficulty, QuestCategory, QuestStatus, SubmissionType};

/// 任务定义
///
/// 由管理员创建（草稿或直接上线），通过编辑表单修改，从不物理删除
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: QuestCategory,
    pub difficulty: Difficulty,
    /// 审核通过后发放的默认积分
    pub reward: u32,
    pub status: QuestStatus,
    pub submission_type: SubmissionType,
    /// 有序的完成要求
    #[serde(default)]
    pub requirements: Vec<String>,
    /// 前置任务 ID
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quest {
    /// 当前是否接受提交
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.status == QuestStatus::Active
            && self.start_date.is_none_or(|start| start <= now)
            && self.end_date.is_none_or(|end| end > now)
    }

    pub fn is_open(&self) -> bool {
        self.is_open_at(Utc::now())
    }

    /// 未满足的前置任务
    pub fn missing_prerequisites<'a>(&'a self, completed: &[String]) -> Vec<&'a str> {
        self.prerequisites
            .iter()
            .filter(|id| !completed.contains(id))
            .map(String::as_str)
            .collect()
    }
}
