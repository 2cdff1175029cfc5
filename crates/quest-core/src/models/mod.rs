//! 领域模型定义

mod badge;
mod enums;
mod quest;
mod submission;
mod user;

pub use badge::Badge;
pub use enums::{
    BadgeRarity, Difficulty, QuestCategory, QuestStatus, SubmissionStatus, SubmissionType,
    UserRole,
};
pub use quest::Quest;
pub use submission::{Submission, SubmissionContent};
pub use user::{SocialProfiles, User};
