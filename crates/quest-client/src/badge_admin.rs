//! 徽章管理页面
//!
//! 写操作的顺序固定：先校验表单，再检查登录，最后发请求。
//! 列表中的数据以服务端返回为准。

use std::sync::Arc;

use quest_core::{Badge, BadgeForm};
use tracing::{info, instrument, warn};

use crate::api::QuestApi;
use crate::error::{ClientError, Result};

/// 危险操作确认
pub trait Confirm: Send + Sync {
    fn confirm(&self, message: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn confirm(&self, message: &str) -> bool {
        self(message)
    }
}

pub struct BadgeAdmin<A: ?Sized> {
    api: Arc<A>,
    badges: Vec<Badge>,
}

impl<A: QuestApi + ?Sized> BadgeAdmin<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            badges: Vec::new(),
        }
    }

    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    fn require_token(&self) -> Result<()> {
        if self.api.has_token() {
            Ok(())
        } else {
            Err(ClientError::AuthenticationRequired)
        }
    }

    /// 加载徽章列表，失败时置空
    pub async fn list(&mut self) -> Result<&[Badge]> {
        match self.api.list_badges().await {
            Ok(badges) => self.badges = badges,
            Err(e) => {
                warn!(error = %e, "加载徽章列表失败");
                self.badges.clear();
                return Err(e);
            }
        }
        Ok(&self.badges)
    }

    #[instrument(skip(self, form), fields(name = %form.name))]
    pub async fn create(&mut self, form: BadgeForm) -> Result<Badge> {
        let request = form.into_request()?;
        self.require_token()?;

        let badge = self.api.create_badge(&request).await?;
        info!(badge_id = %badge.id, "徽章已创建");
        self.badges.push(badge.clone());
        Ok(badge)
    }

    #[instrument(skip(self, form))]
    pub async fn update(&mut self, id: &str, form: BadgeForm) -> Result<Badge> {
        let request = form.into_request()?;
        self.require_token()?;

        let badge = self.api.update_badge(id, &request).await?;
        info!(badge_id = %badge.id, "徽章已更新");
        match self.badges.iter_mut().find(|b| b.id == badge.id) {
            Some(existing) => *existing = badge.clone(),
            None => self.badges.push(badge.clone()),
        }
        Ok(badge)
    }

    /// 删除徽章，需要用户确认
    #[instrument(skip(self, confirm))]
    pub async fn delete(&mut self, id: &str, confirm: &dyn Confirm) -> Result<()> {
        let name = self
            .badges
            .iter()
            .find(|b| b.id == id)
            .map(|b| b.name.as_str())
            .unwrap_or(id);
        if !confirm.confirm(&format!("确定删除徽章「{name}」吗？")) {
            return Err(ClientError::Cancelled);
        }
        self.require_token()?;

        self.api.delete_badge(id).await?;
        info!(badge_id = id, "徽章已删除");
        self.badges.retain(|b| b.id != id);
        Ok(())
    }
}
