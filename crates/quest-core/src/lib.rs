//! 任务平台领域核心
//!
//! 客户端与 mock API 服务共用的领域模型和纯逻辑，不涉及 IO。
//!
//! ## 模块结构
//!
//! - `models`: 任务、提交、徽章、用户等实体
//! - `catalog`: 任务目录过滤与提交排序
//! - `eligibility`: 任务提交资格检查
//! - `review`: 提交审核状态机与统计
//! - `forms`: 徽章/任务表单校验
//! - `error`: 错误类型定义

pub mod catalog;
pub mod eligibility;
pub mod error;
pub mod forms;
pub mod models;
pub mod review;

pub use catalog::{QuestFilter, sort_submissions_newest_first};
pub use eligibility::{check_no_duplicate, check_submission};
pub use error::{ContentError, ReviewError, SubmitError};
pub use forms::{BadgeForm, BadgeRequest, QuestForm, QuestUpdate};
pub use models::{
    Badge, BadgeRarity, Difficulty, Quest, QuestCategory, QuestStatus, SocialProfiles, Submission,
    SubmissionContent, SubmissionStatus, SubmissionType, User, UserRole,
};
pub use review::{ReviewDecision, ReviewRequest, SubmissionQuery, SubmissionStats};
