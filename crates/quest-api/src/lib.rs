//! 任务平台 mock API 服务
//!
//! 在内存存储上实现前端使用的 REST 接口：任务、提交审核、徽章、用户和 Discord 绑定。
//! 所有响应使用 `{ success, code, message, data }` 统一包装。
//!
//! ## 模块结构
//!
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型定义
//! - `handlers`: HTTP 请求处理器
//! - `middleware`: Bearer Token 认证
//! - `routes`: 路由配置
//! - `state`: 应用状态
//! - `store`: DashMap 内存存储

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;
pub mod store;

use axum::{Json, Router, middleware as axum_middleware, routing::get};
use quest_shared::observability::middleware as obs_middleware;

pub use dto::ApiResponse;
pub use error::{ApiError, Result};
pub use state::AppState;
pub use store::MemoryStore;

/// 组装完整的应用路由（不含 CORS，由入口按配置添加）
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .nest("/api", routes::api_routes())
        .route("/health", get(health_check))
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::auth_middleware,
        ))
        .layer(axum_middleware::from_fn(obs_middleware::http_tracing))
        .layer(axum_middleware::from_fn(obs_middleware::request_id))
        .with_state(state)
}

/// 存活探针
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "service": "quest-api"
    }))
}
