//! 全局会话
//!
//! 进程内唯一的当前用户，使用 watch 通道让各页面订阅变化。
//! 生命周期：登录后 `load`，退出或认证失败时 `clear`。

use std::sync::Arc;

use quest_core::User;
use tokio::sync::watch;
use tracing::{info, warn};

use crate::api::QuestApi;
use crate::error::Result;
use crate::storage::ClientStorage;

#[derive(Debug, Clone)]
pub struct Session {
    tx: Arc<watch::Sender<Option<User>>>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx: Arc::new(tx) }
    }

    /// 从服务端加载当前用户
    ///
    /// 失败时清空会话并返回错误
    pub async fn load<A: QuestApi + ?Sized>(&self, api: &A) -> Result<User> {
        match api.current_user().await {
            Ok(user) => {
                info!(user_id = %user.id, role = ?user.role, "会话已加载");
                self.tx.send_replace(Some(user.clone()));
                Ok(user)
            }
            Err(e) => {
                warn!(error = %e, "加载当前用户失败");
                self.clear();
                Err(e)
            }
        }
    }

    /// 用服务端返回的最新用户覆盖（如审核后积分变化）
    pub fn set(&self, user: User) {
        self.tx.send_replace(Some(user));
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }

    /// 退出登录：清除本地 token 和当前用户
    pub fn logout(&self, storage: &dyn ClientStorage) -> Result<()> {
        self.clear();
        storage.clear_access_token()
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<User> {
        self.tx.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.tx.borrow().as_ref().is_some_and(User::is_admin)
    }
}
