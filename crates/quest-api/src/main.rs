//! 任务平台 mock API 服务

use axum::http::HeaderValue;
use quest_api::{AppState, build_router};
use quest_shared::{
    config::{AppConfig, OAuthConfig},
    observability,
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load("quest-api")?;
    let _guard = observability::init(&config.observability).await?;

    info!("Starting quest-api on {}", config.server_addr());

    let oauth = OAuthConfig::from_env();
    if oauth.discord_client_id.is_none() {
        warn!("DISCORD_CLIENT_ID 未配置，Discord 绑定将不可用");
    }
    if config.is_production() && config.auth.admin_token == "quest-admin-dev-token" {
        warn!("生产环境仍在使用默认管理员 Token，请设置 QUEST_AUTH__ADMIN_TOKEN");
    }

    let state = AppState::new(&config.auth, oauth);
    let app = build_router(state).layer(cors_layer(&config.auth.cors_origins));

    let listener = TcpListener::bind(config.server_addr()).await?;
    info!("Listening on {}", config.server_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// CORS 配置："*" 允许全部来源，否则按逗号分隔的列表
fn cors_layer(allowed_origins: &str) -> CorsLayer {
    if allowed_origins.trim() == "*" {
        info!("CORS allowed_origins: *");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    info!("CORS allowed_origins: {}", allowed_origins);
    let origins: Vec<_> = allowed_origins
        .split(',')
        .filter_map(|s| s.trim().parse::<HeaderValue>().ok())
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// 监听 Ctrl+C 或 SIGTERM，触发优雅关闭
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "注册 Ctrl+C 处理器失败");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "注册 SIGTERM 处理器失败");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, initiating graceful shutdown..."),
        _ = terminate => info!("Received SIGTERM, initiating graceful shutdown..."),
    }
}
