//! Discord 账号绑定

use axum::{
    Json,
    extract::{Query, State},
    response::Redirect,
};
use tracing::{info, warn};
use url::Url;

use crate::{
    dto::{ApiResponse, DiscordCallbackQuery, DiscordConnectResponse},
    error::{ApiError, Result},
    state::AppState,
};

const DISCORD_AUTHORIZE_URL: &str = "https://discord.com/api/oauth2/authorize";

/// 生成 Discord 授权地址
///
/// 未配置 DISCORD_CLIENT_ID 时返回 500，而不是拼出一个无效地址
///
/// GET /api/auth/discord
pub async fn discord_connect(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<DiscordConnectResponse>>> {
    let client_id = state
        .oauth
        .discord_client_id
        .as_deref()
        .ok_or(ApiError::OAuthNotConfigured)?;

    // 防 CSRF 的一次性 state
    let nonce = format!("{:016x}", rand::random::<u64>());
    let redirect_uri = state.oauth.redirect_uri();
    let url = Url::parse_with_params(
        DISCORD_AUTHORIZE_URL,
        &[
            ("client_id", client_id),
            ("redirect_uri", redirect_uri.as_str()),
            ("response_type", "code"),
            ("scope", "identify"),
            ("state", nonce.as_str()),
        ],
    )
    .map_err(|e| ApiError::Internal(format!("构建 Discord 授权地址失败: {e}")))?
    .to_string();
    Ok(Json(ApiResponse::success(DiscordConnectResponse { url })))
}

/// Discord 回调，跳转回个人资料页
///
/// GET /api/auth/discord/callback
pub async fn discord_callback(
    State(state): State<AppState>,
    Query(query): Query<DiscordCallbackQuery>,
) -> Redirect {
    let base = state.oauth.app_base_url.trim_end_matches('/');
    let outcome = match (&query.code, &query.error) {
        (Some(_), None) => {
            info!("Discord 授权成功");
            "connected"
        }
        (_, error) => {
            warn!(error = ?error, "Discord 授权失败");
            "error"
        }
    };
    Redirect::to(&format!("{base}/profile?discord={outcome}"))
}
