//! 应用状态定义

use quest_core::{Badge, Quest, Submission, User, UserRole};
use quest_shared::config::{AuthConfig, OAuthConfig};

use crate::store::MemoryStore;

/// Axum 应用共享状态
///
/// 全部数据保存在内存中，克隆后共享同一份存储
#[derive(Clone)]
pub struct AppState {
    pub quests: MemoryStore<Quest>,
    pub submissions: MemoryStore<Submission>,
    pub badges: MemoryStore<Badge>,
    pub users: MemoryStore<User>,
    /// bearer token -> 用户 ID
    pub tokens: MemoryStore<String>,
    /// "用户 ID:任务 ID" -> 提交锁，串行化同一用户对同一任务的提交
    pub submit_locks: MemoryStore<()>,
    pub oauth: OAuthConfig,
}

impl AppState {
    /// 创建状态并写入配置中的管理员账号
    pub fn new(auth: &AuthConfig, oauth: OAuthConfig) -> Self {
        let state = Self {
            quests: MemoryStore::new(),
            submissions: MemoryStore::new(),
            badges: MemoryStore::new(),
            users: MemoryStore::new(),
            tokens: MemoryStore::new(),
            submit_locks: MemoryStore::new(),
            oauth,
        };

        let admin = User {
            id: auth.admin_user_id.clone(),
            first_name: "Quest".to_string(),
            last_name: "Admin".to_string(),
            username: Some("admin".to_string()),
            email: None,
            role: UserRole::Admin,
            points: 0,
            completed_quests: Vec::new(),
            social_profiles: Default::default(),
        };
        state.register_user(admin, &auth.admin_token);
        state
    }

    /// 写入用户并绑定访问 token
    pub fn register_user(&self, user: User, token: &str) {
        self.tokens.insert(token, user.id.clone());
        self.users.insert(&user.id.clone(), user);
    }

    pub fn authenticate(&self, token: &str) -> Option<User> {
        let user_id = self.tokens.get(token)?;
        self.users.get(&user_id)
    }
}
