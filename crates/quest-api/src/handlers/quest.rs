//! 任务 API 处理器

use axum::{
    Json,
    extract::{Path, Query, State},
};
use chrono::Utc;
use quest_core::{Quest, QuestForm, QuestStatus, QuestUpdate};
use tracing::info;

use crate::{
    dto::{ApiResponse, QuestListQuery},
    error::{ApiError, Result},
    middleware::AdminUser,
    state::AppState,
};

/// 获取任务列表
///
/// GET /api/quests
pub async fn list_quests(
    State(state): State<AppState>,
    Query(query): Query<QuestListQuery>,
) -> Json<ApiResponse<Vec<Quest>>> {
    let mut quests = state.quests.list_by(|q| {
        query.status.is_none_or(|s| q.status == s)
            && query.category.is_none_or(|c| q.category == c)
            && query.difficulty.is_none_or(|d| q.difficulty == d)
    });
    // DashMap 无序，按创建时间输出保证列表稳定
    quests.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Json(ApiResponse::success(quests))
}

/// 获取任务详情
///
/// GET /api/quests/{id}
pub async fn get_quest(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Quest>>> {
    let quest = state
        .quests
        .get(&id)
        .ok_or_else(|| ApiError::QuestNotFound(id))?;
    Ok(Json(ApiResponse::success(quest)))
}

/// 创建任务
///
/// POST /api/quests
pub async fn create_quest(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(form): Json<QuestForm>,
) -> Result<Json<ApiResponse<Quest>>> {
    let quest = form.into_quest(uuid::Uuid::new_v4().to_string(), Utc::now())?;
    state.quests.insert(&quest.id, quest.clone());

    info!(quest_id = %quest.id, admin = %admin.id, "任务已创建");
    Ok(Json(ApiResponse::success(quest)))
}

/// 更新任务，未提供的字段保持不变
///
/// PUT /api/quests/{id}
pub async fn update_quest(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(update): Json<QuestUpdate>,
) -> Result<Json<ApiResponse<Quest>>> {
    let quest = state
        .quests
        .update(&id, |quest| {
            update.apply_to(quest, Utc::now())?;
            Ok::<_, ApiError>(quest.clone())
        })
        .ok_or_else(|| ApiError::QuestNotFound(id.clone()))??;

    info!(quest_id = %id, admin = %admin.id, "任务已更新");
    Ok(Json(ApiResponse::success(quest)))
}

/// 删除任务
///
/// 已有提交引用任务，不做物理删除，只标记为过期
///
/// DELETE /api/quests/{id}
pub async fn delete_quest(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Quest>>> {
    let quest = state
        .quests
        .update(&id, |quest| {
            quest.status = QuestStatus::Expired;
            quest.updated_at = Utc::now();
            quest.clone()
        })
        .ok_or_else(|| ApiError::QuestNotFound(id.clone()))?;

    info!(quest_id = %id, admin = %admin.id, "任务已下线");
    Ok(Json(ApiResponse::success(quest)))
}
