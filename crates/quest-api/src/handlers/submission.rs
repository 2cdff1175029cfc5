//! 提交与审核 API 处理器

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use quest_core::{
    ReviewDecision, ReviewRequest, Submission, SubmissionQuery, check_no_duplicate,
    check_submission, sort_submissions_newest_first,
};
use quest_shared::observability::metrics;
use tracing::{info, warn};

use crate::{
    dto::{ApiResponse, SubmitRequest},
    error::{ApiError, Result},
    middleware::{CurrentUser, StaffUser},
    state::AppState,
};

/// 提交列表，按提交时间倒序
///
/// 普通用户只能看到自己的提交，忽略传入的 userId
///
/// GET /api/submissions
pub async fn list_submissions(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(mut query): Query<SubmissionQuery>,
) -> Json<ApiResponse<Vec<Submission>>> {
    if !user.is_staff() {
        query.user_id = Some(user.id.clone());
    }
    let mut submissions = state.submissions.list_by(|s| query.matches(s));
    sort_submissions_newest_first(&mut submissions);
    Json(ApiResponse::success(submissions))
}

/// 提交任务
///
/// POST /api/quests/{id}/submissions
pub async fn submit_quest(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(quest_id): Path<String>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<ApiResponse<Submission>>> {
    let quest = state
        .quests
        .get(&quest_id)
        .ok_or_else(|| ApiError::QuestNotFound(quest_id.clone()))?;
    // 以存储中的用户为准，token 解析出的副本可能已过期
    let user = state.users.get(&user.id).unwrap_or(user);

    let now = Utc::now();
    check_submission(&quest, &req.content, &user, now)?;

    // 重复检查与写入必须在同一把锁内完成
    let lock_key = format!("{}:{}", user.id, quest.id);
    let submission = state.submit_locks.with_lock(&lock_key, |_| {
        let existing = state.submissions.list_by(|s| s.user_id == user.id);
        check_no_duplicate(&quest.id, &existing)?;

        let submission = Submission::new(&quest.id, &user.id, req.content.normalized(), now);
        state.submissions.insert(&submission.id, submission.clone());
        Ok::<_, ApiError>(submission)
    })?;
    metrics::record_submission(submission.content.kind().as_str());

    info!(
        submission_id = %submission.id,
        quest_id = %quest.id,
        user_id = %user.id,
        kind = %submission.content.kind(),
        "任务已提交"
    );
    Ok(Json(ApiResponse::success(submission)))
}

/// 针对"需修改"的提交重新提交
///
/// POST /api/submissions/{id}/resubmit
pub async fn resubmit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<SubmitRequest>,
) -> Result<Json<ApiResponse<Submission>>> {
    let submission = state
        .submissions
        .update(&id, |submission| {
            // 非本人提交按不存在处理，不暴露他人提交
            if submission.user_id != user.id {
                return Err(ApiError::SubmissionNotFound(id.clone()));
            }
            submission.resubmit(req.content, Utc::now())?;
            Ok::<_, ApiError>(submission.clone())
        })
        .ok_or_else(|| ApiError::SubmissionNotFound(id.clone()))??;

    info!(submission_id = %id, user_id = %user.id, "已重新提交");
    Ok(Json(ApiResponse::success(submission)))
}

/// 审核提交
///
/// 通过时把奖励积分（未指定则使用任务积分）计入用户，并记录任务完成
///
/// POST /api/submissions/{id}/review
pub async fn review_submission(
    State(state): State<AppState>,
    StaffUser(reviewer): StaffUser,
    Path(id): Path<String>,
    Json(req): Json<ReviewRequest>,
) -> Result<Json<ApiResponse<Submission>>> {
    let current = state
        .submissions
        .get(&id)
        .ok_or_else(|| ApiError::SubmissionNotFound(id.clone()))?;

    let points = match req.status {
        ReviewDecision::Approved => {
            let default_reward = state.quests.get(&current.quest_id).map(|q| q.reward);
            req.points.or(default_reward)
        }
        _ => None,
    };

    let submission = state
        .submissions
        .update(&id, |submission| {
            submission.apply_review(req.status, &req.feedback, points, &reviewer.id, Utc::now())?;
            Ok::<_, ApiError>(submission.clone())
        })
        .ok_or_else(|| ApiError::SubmissionNotFound(id.clone()))??;

    let awarded = submission.reward_earned.unwrap_or(0);
    if req.status == ReviewDecision::Approved {
        let credited = state.users.update(&submission.user_id, |user| {
            user.points += u64::from(awarded);
            user.mark_completed(&submission.quest_id);
        });
        if credited.is_none() {
            warn!(user_id = %submission.user_id, "审核通过但用户不存在，积分未发放");
        }
    }
    metrics::record_review(req.status.as_str(), awarded);

    info!(
        submission_id = %id,
        decision = req.status.as_str(),
        points = awarded,
        reviewer = %reviewer.id,
        "提交已审核"
    );
    Ok(Json(ApiResponse::success(submission)))
}
