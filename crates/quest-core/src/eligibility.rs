//! 任务提交资格检查

use chrono::{DateTime, Utc};

use crate::error::{ContentError, SubmitError};
use crate::models::{Quest, Submission, SubmissionContent, User};

/// 检查用户能否向任务提交该内容
///
/// 依次检查：提交类型、内容格式、任务开放、前置任务、是否已完成
pub fn check_submission(
    quest: &Quest,
    content: &SubmissionContent,
    user: &User,
    now: DateTime<Utc>,
) -> Result<(), SubmitError> {
    if content.kind() != quest.submission_type {
        return Err(ContentError::TypeMismatch {
            expected: quest.submission_type,
            actual: content.kind(),
        }
        .into());
    }
    content.validate()?;

    if !quest.is_open_at(now) {
        return Err(SubmitError::QuestClosed(quest.id.clone()));
    }

    let missing = quest.missing_prerequisites(&user.completed_quests);
    if !missing.is_empty() {
        return Err(SubmitError::MissingPrerequisites(
            missing.into_iter().map(str::to_string).collect(),
        ));
    }

    if user.has_completed(&quest.id) {
        return Err(SubmitError::AlreadyCompleted(quest.id.clone()));
    }
    Ok(())
}

/// 同一用户对同一任务只能有一条待审或已通过的提交
pub fn check_no_duplicate<'a, I>(quest_id: &str, existing: I) -> Result<(), SubmitError>
where
    I: IntoIterator<Item = &'a Submission>,
{
    if existing
        .into_iter()
        .any(|s| s.quest_id == quest_id && s.is_blocking_resubmission())
    {
        return Err(SubmitError::DuplicateSubmission(quest_id.to_string()));
    }
    Ok(())
}
