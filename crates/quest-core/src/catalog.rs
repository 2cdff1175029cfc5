//! 任务目录过滤
//!
//! 在内存中的任务列表上按分类、难度、关键字和完成状态过滤。
//! 各维度之间为 AND；空的分类/难度列表表示不限制。结果保持原始顺序。

use serde::{Deserialize, Serialize};

use crate::models::{Difficulty, Quest, QuestCategory, Submission, User};

/// 任务过滤条件
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestFilter {
    #[serde(default)]
    pub categories: Vec<QuestCategory>,
    #[serde(default)]
    pub difficulties: Vec<Difficulty>,
    #[serde(default)]
    pub search: String,
    /// 为 false 时隐藏当前用户已完成的任务
    #[serde(default)]
    pub show_completed: bool,
}

impl QuestFilter {
    pub fn with_category(mut self, category: QuestCategory) -> Self {
        if !self.categories.contains(&category) {
            self.categories.push(category);
        }
        self
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        if !self.difficulties.contains(&difficulty) {
            self.difficulties.push(difficulty);
        }
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn show_completed(mut self, show: bool) -> Self {
        self.show_completed = show;
        self
    }

    /// 除完成状态外没有任何限制
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty() && self.difficulties.is_empty() && self.search.trim().is_empty()
    }

    /// 单个任务是否满足全部条件
    ///
    /// `completed` 为当前用户已完成的任务 ID
    pub fn matches(&self, quest: &Quest, completed: &[String]) -> bool {
        if !self.categories.is_empty() && !self.categories.contains(&quest.category) {
            return false;
        }
        if !self.difficulties.is_empty() && !self.difficulties.contains(&quest.difficulty) {
            return false;
        }
        if !self.matches_search(quest) {
            return false;
        }
        self.show_completed || !completed.iter().any(|id| *id == quest.id)
    }

    fn matches_search(&self, quest: &Quest) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        quest.title.to_lowercase().contains(&needle)
            || quest.description.to_lowercase().contains(&needle)
    }

    /// 过滤任务列表；没有当前用户时不视任何任务为已完成
    pub fn apply(&self, quests: &[Quest], user: Option<&User>) -> Vec<Quest> {
        let completed = user.map(|u| u.completed_quests.as_slice()).unwrap_or(&[]);
        quests
            .iter()
            .filter(|quest| self.matches(quest, completed))
            .cloned()
            .collect()
    }
}

/// 按提交时间倒序排列，时间相同保持原有顺序
pub fn sort_submissions_newest_first(submissions: &mut [Submission]) {
    submissions.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));
}
