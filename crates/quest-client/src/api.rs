//! REST API 客户端
//!
//! 所有请求在本地有 token 时携带 `Authorization: Bearer <token>`；
//! 写操作在没有 token 时直接返回 [`ClientError::AuthenticationRequired`]，不发出请求。

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use quest_core::{
    Badge, BadgeRequest, Quest, QuestForm, QuestUpdate, ReviewRequest, Submission,
    SubmissionContent, SubmissionQuery, User,
};
use reqwest::{Client, Method, RequestBuilder};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::storage::ClientStorage;

/// 任务平台 API
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait QuestApi: Send + Sync {
    /// 本地是否持有访问 token
    fn has_token(&self) -> bool;

    async fn list_quests(&self) -> Result<Vec<Quest>>;
    async fn get_quest(&self, id: &str) -> Result<Quest>;
    async fn create_quest(&self, form: &QuestForm) -> Result<Quest>;
    async fn update_quest(&self, id: &str, update: &QuestUpdate) -> Result<Quest>;
    /// 服务端不做物理删除，返回标记为过期后的任务
    async fn delete_quest(&self, id: &str) -> Result<Quest>;

    async fn list_submissions(&self, query: &SubmissionQuery) -> Result<Vec<Submission>>;
    async fn submit_quest(&self, quest_id: &str, content: &SubmissionContent)
    -> Result<Submission>;
    async fn resubmit(&self, submission_id: &str, content: &SubmissionContent)
    -> Result<Submission>;
    async fn review_submission(&self, id: &str, review: &ReviewRequest) -> Result<Submission>;

    async fn list_badges(&self) -> Result<Vec<Badge>>;
    async fn create_badge(&self, badge: &BadgeRequest) -> Result<Badge>;
    async fn update_badge(&self, id: &str, badge: &BadgeRequest) -> Result<Badge>;
    async fn delete_badge(&self, id: &str) -> Result<()>;

    async fn list_users(&self) -> Result<Vec<User>>;
    async fn current_user(&self) -> Result<User>;

    /// Discord 绑定授权地址
    async fn discord_connect_url(&self) -> Result<String>;
}

/// 基于 reqwest 的 API 客户端
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
    storage: Arc<dyn ClientStorage>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig, storage: Arc<dyn ClientStorage>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            http: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            storage,
        })
    }

    pub fn storage(&self) -> &Arc<dyn ClientStorage> {
        &self.storage
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.url(path));
        match self.storage.access_token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    /// 写操作：没有 token 时不发请求
    fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        if !self.storage.has_token() {
            warn!(%method, path, "未登录，请求未发送");
            return Err(ClientError::AuthenticationRequired);
        }
        Ok(self.request(method, path))
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.request(Method::GET, path)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.authorized(Method::POST, path)?.json(body))
            .await
    }

    async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        self.send(self.authorized(Method::PUT, path)?.json(body))
            .await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.send(self.authorized(Method::DELETE, path)?).await
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let bytes = response.bytes().await?;
        debug!(status, len = bytes.len(), "API 响应");
        decode_response(status, &bytes)
    }
}

/// 统一解析响应
///
/// 同时接受 `{ success, data, error?/message?, code? }` 包装和直接返回的 JSON
pub(crate) fn decode_response<T: DeserializeOwned>(status: u16, bytes: &[u8]) -> Result<T> {
    let is_success = (200..300).contains(&status);
    let body: Value = if bytes.iter().all(u8::is_ascii_whitespace) {
        Value::Null
    } else {
        match serde_json::from_slice(bytes) {
            Ok(value) => value,
            Err(_) if !is_success => {
                return Err(ClientError::Api {
                    status,
                    code: format!("HTTP_{status}"),
                    message: String::from_utf8_lossy(bytes).trim().to_string(),
                });
            }
            Err(e) => return Err(e.into()),
        }
    };

    let envelope_success = body.get("success").and_then(Value::as_bool);
    if !is_success || envelope_success == Some(false) {
        let message = ["error", "message"]
            .iter()
            .find_map(|key| body.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| format!("请求失败 ({status})"));
        let code = body
            .get("code")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("HTTP_{status}"));
        return Err(ClientError::Api {
            status,
            code,
            message,
        });
    }

    let payload = match (envelope_success, body) {
        (Some(true), Value::Object(mut map)) => map.remove("data").unwrap_or(Value::Null),
        (_, body) => body,
    };
    Ok(serde_json::from_value(payload)?)
}

#[async_trait]
impl QuestApi for ApiClient {
    fn has_token(&self) -> bool {
        self.storage.has_token()
    }

    async fn list_quests(&self) -> Result<Vec<Quest>> {
        self.get("/api/quests").await
    }

    async fn get_quest(&self, id: &str) -> Result<Quest> {
        self.get(&format!("/api/quests/{id}")).await
    }

    async fn create_quest(&self, form: &QuestForm) -> Result<Quest> {
        self.post("/api/quests", form).await
    }

    async fn update_quest(&self, id: &str, update: &QuestUpdate) -> Result<Quest> {
        self.put(&format!("/api/quests/{id}"), update).await
    }

    async fn delete_quest(&self, id: &str) -> Result<Quest> {
        self.delete(&format!("/api/quests/{id}")).await
    }

    async fn list_submissions(&self, query: &SubmissionQuery) -> Result<Vec<Submission>> {
        let builder = self
            .request(Method::GET, "/api/submissions")
            .query(&query.to_query_pairs());
        self.send(builder).await
    }

    async fn submit_quest(
        &self,
        quest_id: &str,
        content: &SubmissionContent,
    ) -> Result<Submission> {
        self.post(
            &format!("/api/quests/{quest_id}/submissions"),
            &json!({ "content": content }),
        )
        .await
    }

    async fn resubmit(
        &self,
        submission_id: &str,
        content: &SubmissionContent,
    ) -> Result<Submission> {
        self.post(
            &format!("/api/submissions/{submission_id}/resubmit"),
            &json!({ "content": content }),
        )
        .await
    }

    async fn review_submission(&self, id: &str, review: &ReviewRequest) -> Result<Submission> {
        self.post(&format!("/api/submissions/{id}/review"), review)
            .await
    }

    async fn list_badges(&self) -> Result<Vec<Badge>> {
        self.get("/api/badges").await
    }

    async fn create_badge(&self, badge: &BadgeRequest) -> Result<Badge> {
        self.post("/api/badges", badge).await
    }

    async fn update_badge(&self, id: &str, badge: &BadgeRequest) -> Result<Badge> {
        self.put(&format!("/api/badges/{id}"), badge).await
    }

    async fn delete_badge(&self, id: &str) -> Result<()> {
        self.delete(&format!("/api/badges/{id}")).await
    }

    async fn list_users(&self) -> Result<Vec<User>> {
        self.get("/api/users").await
    }

    async fn current_user(&self) -> Result<User> {
        if !self.has_token() {
            return Err(ClientError::AuthenticationRequired);
        }
        self.get("/api/users/me").await
    }

    async fn discord_connect_url(&self) -> Result<String> {
        let body: Value = self.get("/api/auth/discord").await?;
        body.get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| ClientError::Decode("响应中缺少 url 字段".into()))
    }
}
