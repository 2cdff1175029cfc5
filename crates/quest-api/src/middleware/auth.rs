//! Bearer Token 认证
//!
//! 中间件只负责把 token 解析为用户并注入请求扩展，
//! 是否必须登录、需要什么角色由处理器通过提取器声明。

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use quest_core::User;

use crate::{error::ApiError, state::AppState};

/// 已登录用户
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// 管理员或版主
#[derive(Debug, Clone)]
pub struct StaffUser(pub User);

/// 管理员
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

fn bearer_token(headers: &axum::http::HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// 认证中间件
///
/// 携带了 token 但无法识别时直接返回 401；未携带 token 时放行给公开路由
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(token) = bearer_token(request.headers()).map(str::to_owned) else {
        return next.run(request).await;
    };

    match state.authenticate(&token) {
        Some(user) => {
            tracing::debug!(user_id = %user.id, "请求已认证");
            request.extensions_mut().insert(CurrentUser(user));
            next.run(request).await
        }
        None => ApiError::Unauthorized("无效的认证 Token".into()).into_response(),
    }
}

impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentUser>()
            .cloned()
            .ok_or_else(|| ApiError::Unauthorized("缺少认证 Token".into()))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for StaffUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_staff() {
            return Err(ApiError::Forbidden("需要管理员或版主权限".into()));
        }
        Ok(Self(user))
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        if !user.is_admin() {
            return Err(ApiError::Forbidden("需要管理员权限".into()));
        }
        Ok(Self(user))
    }
}
