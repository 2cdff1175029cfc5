//! 徽章定义实体

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BadgeRarity;

/// 徽章定义
///
/// 后台不校验已发放数量与 max_to_obtain 的关系
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rarity: BadgeRarity,
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_to_obtain: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
