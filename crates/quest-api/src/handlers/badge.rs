//! 徽章 API 处理器

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::Utc;
use quest_core::{Badge, BadgeForm};
use tracing::info;

use crate::{
    dto::ApiResponse,
    error::{ApiError, Result},
    middleware::AdminUser,
    state::AppState,
};

/// 获取徽章列表
///
/// GET /api/badges
pub async fn list_badges(State(state): State<AppState>) -> Json<ApiResponse<Vec<Badge>>> {
    let mut badges = state.badges.list();
    badges.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
    Json(ApiResponse::success(badges))
}

/// 创建徽章
///
/// POST /api/badges
pub async fn create_badge(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Json(form): Json<BadgeForm>,
) -> Result<Json<ApiResponse<Badge>>> {
    let badge = form
        .into_request()?
        .into_badge(uuid::Uuid::new_v4().to_string(), Utc::now());
    state.badges.insert(&badge.id, badge.clone());

    info!(badge_id = %badge.id, rarity = %badge.rarity, admin = %admin.id, "徽章已创建");
    Ok(Json(ApiResponse::success(badge)))
}

/// 更新徽章
///
/// PUT /api/badges/{id}
pub async fn update_badge(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
    Json(form): Json<BadgeForm>,
) -> Result<Json<ApiResponse<Badge>>> {
    let request = form.into_request()?;
    let badge = state
        .badges
        .update(&id, |badge| {
            request.apply_to(badge, Utc::now());
            badge.clone()
        })
        .ok_or_else(|| ApiError::BadgeNotFound(id.clone()))?;

    info!(badge_id = %id, admin = %admin.id, "徽章已更新");
    Ok(Json(ApiResponse::success(badge)))
}

/// 删除徽章
///
/// DELETE /api/badges/{id}
pub async fn delete_badge(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state
        .badges
        .remove(&id)
        .ok_or_else(|| ApiError::BadgeNotFound(id.clone()))?;

    info!(badge_id = %id, admin = %admin.id, "徽章已删除");
    Ok(Json(ApiResponse::success_empty()))
}
