//! 配置管理模块
//!
//! 支持多格式配置文件加载，环境变量覆盖，以及类型安全的配置访问。

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::observability::ObservabilityConfig;

/// 服务配置
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// 内置管理员配置
///
/// mock API 服务不做登录流程，启动时把该 Token 绑定到内置管理员账号
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub admin_token: String,
    pub admin_user_id: String,
    /// 允许的跨域来源，逗号分隔；"*" 表示全部
    pub cors_origins: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_token: "quest-admin-dev-token".to_string(),
            admin_user_id: "admin".to_string(),
            cors_origins: "http://localhost:3000".to_string(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub service_name: String,
    pub environment: String,
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub observability: ObservabilityConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            service_name: "quest-api".to_string(),
            environment: "development".to_string(),
            server: ServerConfig::default(),
            auth: AuthConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

impl AppConfig {
    /// 从配置文件和环境变量加载配置
    ///
    /// 加载顺序（后加载的会覆盖先加载的同名配置项）：
    /// 1. config/default.toml（默认配置）
    /// 2. config/{environment}.toml（环境特定配置）
    /// 3. config/{service_name}.toml（服务特定配置）
    /// 4. 环境变量（QUEST_ 前缀，如 QUEST_SERVER__PORT -> server.port）
    /// 5. 服务特定端口环境变量（如 QUEST_API_PORT）
    pub fn load(service_name: &str) -> Result<Self, ConfigError> {
        // .env 文件不存在时忽略
        let _ = dotenvy::dotenv();

        let env = std::env::var("QUEST_ENV").unwrap_or_else(|_| "development".to_string());
        let config_dir = std::env::var("CONFIG_DIR").unwrap_or_else(|_| "config".to_string());

        let builder = Config::builder()
            .set_default("service_name", service_name)?
            .set_default("environment", env.clone())?
            .add_source(File::from(Path::new(&config_dir).join("default.toml")).required(false))
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", env))).required(false),
            )
            .add_source(
                File::from(Path::new(&config_dir).join(format!("{}.toml", service_name)))
                    .required(false),
            )
            // 双下划线作为层级分隔符，避免与字段名中的下划线冲突
            .add_source(
                Environment::with_prefix("QUEST")
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;
        config.observability.service_name = config.service_name.clone();

        if let Some(port) = Self::service_port_from_env(service_name) {
            config.server.port = port;
        }

        Ok(config)
    }

    /// 将 "quest-api" 转换为 "QUEST_API_PORT" 并读取
    fn service_port_from_env(service_name: &str) -> Option<u16> {
        std::env::var(Self::port_env_var(service_name))
            .ok()
            .and_then(|v| v.parse().ok())
    }

    fn port_env_var(service_name: &str) -> String {
        format!("{}_PORT", service_name.to_uppercase().replace('-', "_"))
    }

    /// 获取服务地址
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// 是否为生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Discord OAuth 配置
///
/// 仅 Discord 账号绑定流程使用，直接读取环境变量：
/// `DISCORD_CLIENT_ID`、`DISCORD_REDIRECT_URI`、`APP_BASE_URL`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OAuthConfig {
    pub discord_client_id: Option<String>,
    pub discord_redirect_uri: Option<String>,
    pub app_base_url: String,
}

impl OAuthConfig {
    pub const DEFAULT_APP_BASE_URL: &'static str = "http://localhost:3000";

    pub fn from_env() -> Self {
        let non_empty = |key: &str| std::env::var(key).ok().filter(|v| !v.trim().is_empty());

        Self {
            discord_client_id: non_empty("DISCORD_CLIENT_ID"),
            discord_redirect_uri: non_empty("DISCORD_REDIRECT_URI"),
            app_base_url: non_empty("APP_BASE_URL")
                .unwrap_or_else(|| Self::DEFAULT_APP_BASE_URL.to_string()),
        }
    }

    /// 回调地址：未显式配置时由应用地址推导
    pub fn redirect_uri(&self) -> String {
        self.discord_redirect_uri.clone().unwrap_or_else(|| {
            format!(
                "{}/api/auth/discord/callback",
                self.app_base_url.trim_end_matches('/')
            )
        })
    }
}
