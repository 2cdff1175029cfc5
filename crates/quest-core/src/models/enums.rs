//! 领域枚举类型定义
//!
//! 所有枚举都以 kebab-case 字符串进行 JSON 序列化，与前端约定一致

use std::fmt;

use serde::{Deserialize, Serialize};

/// 任务分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestCategory {
    Defi,
    Nft,
    Social,
    Development,
    Education,
    Community,
    /// 未识别的分类统一落到这里，避免整条记录反序列化失败
    #[serde(other)]
    Other,
}

impl QuestCategory {
    pub const ALL: [QuestCategory; 7] = [
        Self::Defi,
        Self::Nft,
        Self::Social,
        Self::Development,
        Self::Education,
        Self::Community,
        Self::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Defi => "defi",
            Self::Nft => "nft",
            Self::Social => "social",
            Self::Development => "development",
            Self::Education => "education",
            Self::Community => "community",
            Self::Other => "other",
        }
    }
}

/// 任务难度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
    Expert,
}

impl Difficulty {
    pub const ALL: [Difficulty; 4] = [Self::Easy, Self::Medium, Self::Hard, Self::Expert];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Expert => "expert",
        }
    }
}

/// 任务状态
///
/// 任务从不物理删除，下线即 Expired
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestStatus {
    /// 草稿 - 配置中，不对用户开放
    #[default]
    Draft,
    /// 进行中 - 可提交
    Active,
    /// 已结束
    Completed,
    /// 已过期/已下线
    Expired,
}

impl QuestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Expired => "expired",
        }
    }
}

/// 提交内容类型，由任务定义决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionType {
    Url,
    Text,
    TransactionId,
    AccountId,
    File,
}

impl SubmissionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Url => "url",
            Self::Text => "text",
            Self::TransactionId => "transaction-id",
            Self::AccountId => "account-id",
            Self::File => "file",
        }
    }
}

/// 提交审核状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SubmissionStatus {
    /// 待审核
    #[default]
    Pending,
    /// 已通过（终态）
    Approved,
    /// 已拒绝（终态）
    Rejected,
    /// 需修改 - 用户可重新提交，管理员也可直接再次审核
    NeedsRevision,
}

impl SubmissionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::NeedsRevision => "needs-revision",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

/// 徽章稀有度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BadgeRarity {
    Common,
    /// 仅展示层使用，徽章表单不接受
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl BadgeRarity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Common => "common",
            Self::Uncommon => "uncommon",
            Self::Rare => "rare",
            Self::Epic => "epic",
            Self::Legendary => "legendary",
        }
    }

    /// 管理员表单可选的稀有度
    pub fn is_assignable(&self) -> bool {
        !matches!(self, Self::Uncommon)
    }
}

/// 用户角色
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UserRole {
    #[default]
    User,
    Admin,
    Moderator,
}

macro_rules! impl_display_via_as_str {
    ($($ty:ty),*) => {
        $(impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        })*
    };
}

impl_display_via_as_str!(
    QuestCategory,
    Difficulty,
    QuestStatus,
    SubmissionType,
    SubmissionStatus,
    BadgeRarity
);
