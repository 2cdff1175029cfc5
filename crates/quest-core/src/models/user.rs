//! 用户实体

use serde::{Deserialize, Serialize};

use super::UserRole;

/// 绑定的社交账号
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialProfiles {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discord: Option<String>,
}

/// 平台用户
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    /// 积分余额
    #[serde(default)]
    pub points: u64,
    /// 已完成任务 ID（按字符串比较）
    #[serde(default)]
    pub completed_quests: Vec<String>,
    #[serde(default)]
    pub social_profiles: SocialProfiles,
}

impl User {
    pub fn has_completed(&self, quest_id: &str) -> bool {
        self.completed_quests.iter().any(|id| id == quest_id)
    }

    /// 管理员或版主，可访问审核后台
    pub fn is_staff(&self) -> bool {
        matches!(self.role, UserRole::Admin | UserRole::Moderator)
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let full = full.trim();
        if !full.is_empty() {
            return full.to_string();
        }
        self.username.clone().unwrap_or_else(|| self.id.clone())
    }

    /// 记录完成任务，重复完成不重复记录
    pub fn mark_completed(&mut self, quest_id: &str) -> bool {
        if self.has_completed(quest_id) {
            return false;
        }
        self.completed_quests.push(quest_id.to_string());
        true
    }
}
