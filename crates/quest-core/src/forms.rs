//! 管理后台表单校验
//!
//! 客户端在发起请求前、服务端在写入前使用同一套规则校验。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::models::{
    Badge, BadgeRarity, Difficulty, Quest, QuestCategory, QuestStatus, SubmissionType,
};

fn default_true() -> bool {
    true
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank").with_message("不能为空白".into()));
    }
    Ok(())
}

fn assignable_rarity(rarity: &BadgeRarity) -> Result<(), ValidationError> {
    if !rarity.is_assignable() {
        return Err(ValidationError::new("rarity").with_message("不支持的稀有度".into()));
    }
    Ok(())
}

/// 徽章表单
///
/// 数值字段使用有符号类型，以便负数在校验阶段给出明确错误而不是反序列化失败
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct BadgeForm {
    #[validate(
        length(min = 1, max = 100, message = "徽章名称长度必须在1-100个字符之间"),
        custom(function = "not_blank")
    )]
    pub name: String,
    #[validate(
        length(min = 1, max = 1000, message = "徽章描述长度必须在1-1000个字符之间"),
        custom(function = "not_blank")
    )]
    pub description: String,
    #[validate(custom(function = "assignable_rarity"))]
    pub rarity: BadgeRarity,
    #[validate(range(min = 0, max = 4294967295_i64, message = "积分不能为负数"))]
    pub points: i64,
    #[validate(range(min = 1, max = 1000, message = "最大获取数量必须在1-1000之间"))]
    #[serde(default)]
    pub max_to_obtain: Option<i64>,
    #[validate(url(message = "图片地址必须是有效的URL"))]
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// 校验后的徽章请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeRequest {
    pub name: String,
    pub description: String,
    pub rarity: BadgeRarity,
    pub points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_to_obtain: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub is_active: bool,
}

impl BadgeForm {
    /// 校验并转换为请求体
    pub fn into_request(self) -> Result<BadgeRequest, ValidationErrors> {
        self.validate()?;
        Ok(BadgeRequest {
            name: self.name.trim().to_string(),
            description: self.description.trim().to_string(),
            rarity: self.rarity,
            // 范围已由校验保证
            points: self.points as u32,
            max_to_obtain: self.max_to_obtain.map(|v| v as u32),
            image: self.image.filter(|s| !s.trim().is_empty()),
            is_active: self.is_active,
        })
    }
}

impl From<&Badge> for BadgeForm {
    fn from(badge: &Badge) -> Self {
        Self {
            name: badge.name.clone(),
            description: badge.description.clone(),
            rarity: badge.rarity,
            points: i64::from(badge.points),
            max_to_obtain: badge.max_to_obtain.map(i64::from),
            image: badge.image.clone(),
            is_active: badge.is_active,
        }
    }
}

impl BadgeRequest {
    pub fn into_badge(self, id: String, now: DateTime<Utc>) -> Badge {
        Badge {
            id,
            name: self.name,
            description: self.description,
            rarity: self.rarity,
            points: self.points,
            max_to_obtain: self.max_to_obtain,
            image: self.image,
            is_active: self.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    /// 覆盖已有徽章的可编辑字段
    pub fn apply_to(self, badge: &mut Badge, now: DateTime<Utc>) {
        badge.name = self.name;
        badge.description = self.description;
        badge.rarity = self.rarity;
        badge.points = self.points;
        badge.max_to_obtain = self.max_to_obtain;
        badge.image = self.image;
        badge.is_active = self.is_active;
        badge.updated_at = now;
    }
}

fn non_blank_items(items: &[String]) -> Result<(), ValidationError> {
    if items.iter().any(|item| item.trim().is_empty()) {
        return Err(ValidationError::new("blank_item").with_message("列表项不能为空白".into()));
    }
    Ok(())
}

fn creatable_status(status: &QuestStatus) -> Result<(), ValidationError> {
    match status {
        QuestStatus::Draft | QuestStatus::Active => Ok(()),
        _ => Err(ValidationError::new("status").with_message("新任务只能是草稿或进行中".into())),
    }
}

fn quest_window(form: &QuestForm) -> Result<(), ValidationError> {
    check_window(form.start_date, form.end_date)
}

fn check_window(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), ValidationError> {
    match (start, end) {
        (Some(start), Some(end)) if end <= start => Err(ValidationError::new("window")
            .with_message("结束时间必须晚于开始时间".into())),
        _ => Ok(()),
    }
}

/// 创建任务表单
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "quest_window"))]
pub struct QuestForm {
    #[validate(
        length(min = 1, max = 200, message = "任务标题长度必须在1-200个字符之间"),
        custom(function = "not_blank")
    )]
    pub title: String,
    #[validate(
        length(min = 1, max = 5000, message = "任务描述长度必须在1-5000个字符之间"),
        custom(function = "not_blank")
    )]
    pub description: String,
    pub category: QuestCategory,
    pub difficulty: Difficulty,
    #[validate(range(min = 0, max = 4294967295_i64, message = "奖励积分不能为负数"))]
    pub reward: i64,
    #[validate(custom(function = "creatable_status"))]
    #[serde(default)]
    pub status: QuestStatus,
    pub submission_type: SubmissionType,
    #[validate(custom(function = "non_blank_items"))]
    #[serde(default)]
    pub requirements: Vec<String>,
    #[serde(default)]
    pub prerequisites: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
}

impl QuestForm {
    pub fn into_quest(self, id: String, now: DateTime<Utc>) -> Result<Quest, ValidationErrors> {
        self.validate()?;
        Ok(Quest {
            id,
            title: self.title.trim().to_string(),
            description: self.description.trim().to_string(),
            category: self.category,
            difficulty: self.difficulty,
            reward: self.reward as u32,
            status: self.status,
            submission_type: self.submission_type,
            requirements: self.requirements.into_iter().map(|r| r.trim().to_string()).collect(),
            prerequisites: self.prerequisites,
            start_date: self.start_date,
            end_date: self.end_date,
            created_at: now,
            updated_at: now,
        })
    }
}

/// 编辑任务表单，未提供的字段保持不变
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct QuestUpdate {
    #[validate(
        length(min = 1, max = 200, message = "任务标题长度必须在1-200个字符之间"),
        custom(function = "not_blank")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[validate(
        length(min = 1, max = 5000, message = "任务描述长度必须在1-5000个字符之间"),
        custom(function = "not_blank")
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<QuestCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub difficulty: Option<Difficulty>,
    #[validate(range(min = 0, max = 4294967295_i64, message = "奖励积分不能为负数"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reward: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<QuestStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_type: Option<SubmissionType>,
    #[validate(custom(function = "non_blank_items"))]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirements: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prerequisites: Option<Vec<String>>,
    /// 字段缺省表示不修改，显式 `null` 表示清除
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub start_date: Option<Option<DateTime<Utc>>>,
    #[serde(
        default,
        deserialize_with = "explicit_null",
        skip_serializing_if = "Option::is_none"
    )]
    pub end_date: Option<Option<DateTime<Utc>>>,
}

/// 区分字段缺省（外层 None）和显式 null（Some(None)）
fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

impl QuestUpdate {
    /// 校验并应用到已有任务
    ///
    /// 合并后的时间窗口同样需要满足结束晚于开始
    pub fn apply_to(self, quest: &mut Quest, now: DateTime<Utc>) -> Result<(), ValidationErrors> {
        self.validate()?;

        let start = self.start_date.unwrap_or(quest.start_date);
        let end = self.end_date.unwrap_or(quest.end_date);
        if let Err(e) = check_window(start, end) {
            let mut errors = ValidationErrors::new();
            errors.add("endDate", e);
            return Err(errors);
        }

        if let Some(title) = self.title {
            quest.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            quest.description = description.trim().to_string();
        }
        if let Some(category) = self.category {
            quest.category = category;
        }
        if let Some(difficulty) = self.difficulty {
            quest.difficulty = difficulty;
        }
        if let Some(reward) = self.reward {
            quest.reward = reward as u32;
        }
        if let Some(status) = self.status {
            quest.status = status;
        }
        if let Some(submission_type) = self.submission_type {
            quest.submission_type = submission_type;
        }
        if let Some(requirements) = self.requirements {
            quest.requirements = requirements.into_iter().map(|r| r.trim().to_string()).collect();
        }
        if let Some(prerequisites) = self.prerequisites {
            quest.prerequisites = prerequisites;
        }
        quest.start_date = start;
        quest.end_date = end;
        quest.updated_at = now;
        Ok(())
    }
}
