//! 路由配置模块

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// 任务相关路由
fn quest_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/quests",
            get(handlers::quest::list_quests).post(handlers::quest::create_quest),
        )
        .route(
            "/quests/{id}",
            get(handlers::quest::get_quest)
                .put(handlers::quest::update_quest)
                .delete(handlers::quest::delete_quest),
        )
        .route(
            "/quests/{id}/submissions",
            post(handlers::submission::submit_quest),
        )
}

/// 提交与审核路由
fn submission_routes() -> Router<AppState> {
    Router::new()
        .route("/submissions", get(handlers::submission::list_submissions))
        .route(
            "/submissions/{id}/resubmit",
            post(handlers::submission::resubmit),
        )
        .route(
            "/submissions/{id}/review",
            post(handlers::submission::review_submission),
        )
}

/// 徽章管理路由
fn badge_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/badges",
            get(handlers::badge::list_badges).post(handlers::badge::create_badge),
        )
        .route(
            "/badges/{id}",
            axum::routing::put(handlers::badge::update_badge)
                .delete(handlers::badge::delete_badge),
        )
}

fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(handlers::user::list_users))
        .route("/users/me", get(handlers::user::current_user))
}

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/discord", get(handlers::oauth::discord_connect))
        .route(
            "/auth/discord/callback",
            get(handlers::oauth::discord_callback),
        )
}

/// 构建 `/api` 下的全部路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(quest_routes())
        .merge(submission_routes())
        .merge(badge_routes())
        .merge(user_routes())
        .merge(auth_routes())
}
