//! 用户 API 处理器

use axum::{Json, extract::State};
use quest_core::User;

use crate::{
    dto::ApiResponse,
    middleware::{CurrentUser, StaffUser},
    state::AppState,
};

/// 用户列表，积分从高到低
///
/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    StaffUser(_): StaffUser,
) -> Json<ApiResponse<Vec<User>>> {
    let mut users = state.users.list();
    users.sort_by(|a, b| b.points.cmp(&a.points).then_with(|| a.id.cmp(&b.id)));
    Json(ApiResponse::success(users))
}

/// 当前登录用户
///
/// 从存储中重新读取，保证积分和已完成任务是最新的
///
/// GET /api/users/me
pub async fn current_user(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Json<ApiResponse<User>> {
    let latest = state.users.get(&user.id).unwrap_or(user);
    Json(ApiResponse::success(latest))
}
