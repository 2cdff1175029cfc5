//! 任务目录页面状态

use quest_core::{Difficulty, Quest, QuestCategory, QuestFilter, User};
use tracing::warn;

use crate::api::QuestApi;
use crate::error::Result;
use crate::service::QuestService;

/// 任务目录：已加载的任务、当前用户和筛选条件
#[derive(Debug, Clone, Default)]
pub struct QuestCatalog {
    quests: Vec<Quest>,
    user: Option<User>,
    filter: QuestFilter,
}

impl QuestCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(quests: Vec<Quest>, user: Option<User>) -> Self {
        Self {
            quests,
            user,
            filter: QuestFilter::default(),
        }
    }

    /// 重新加载任务和当前用户，保留筛选条件
    ///
    /// 失败时清空任务列表并返回错误
    pub async fn load<A: QuestApi + ?Sized>(&mut self, service: &QuestService<A>) -> Result<()> {
        match service.catalog().await {
            Ok((quests, user)) => {
                self.quests = quests;
                self.user = user;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "加载任务目录失败");
                self.quests.clear();
                Err(e)
            }
        }
    }

    pub fn quests(&self) -> &[Quest] {
        &self.quests
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn filter(&self) -> &QuestFilter {
        &self.filter
    }

    /// 按当前筛选条件可见的任务，保持加载顺序
    pub fn visible(&self) -> Vec<Quest> {
        self.filter.apply(&self.quests, self.user.as_ref())
    }

    pub fn set_filter(&mut self, filter: QuestFilter) {
        self.filter = filter;
    }

    pub fn toggle_category(&mut self, category: QuestCategory) {
        toggle(&mut self.filter.categories, category);
    }

    pub fn toggle_difficulty(&mut self, difficulty: Difficulty) {
        toggle(&mut self.filter.difficulties, difficulty);
    }

    pub fn set_search(&mut self, search: impl Into<String>) {
        self.filter.search = search.into();
    }

    pub fn set_show_completed(&mut self, show: bool) {
        self.filter.show_completed = show;
    }

    pub fn clear_filters(&mut self) {
        self.filter = QuestFilter::default();
    }

    /// 各分类的任务数量（不受筛选影响），按分类固定顺序
    pub fn counts_by_category(&self) -> Vec<(QuestCategory, usize)> {
        QuestCategory::ALL
            .iter()
            .map(|c| (*c, self.quests.iter().filter(|q| q.category == *c).count()))
            .collect()
    }
}

fn toggle<T: PartialEq>(items: &mut Vec<T>, item: T) {
    match items.iter().position(|i| *i == item) {
        Some(index) => {
            items.remove(index);
        }
        None => items.push(item),
    }
}
