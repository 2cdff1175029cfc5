//! 服务层
//!
//! 编排多个 API 调用；互不依赖的请求并发发出。

use std::sync::Arc;

use chrono::Utc;
use quest_core::{
    Quest, QuestStatus, Submission, SubmissionContent, SubmissionQuery, SubmissionStats, User,
    check_submission, sort_submissions_newest_first,
};
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::api::QuestApi;
use crate::error::{ClientError, Result};

/// 任务详情页数据
#[derive(Debug, Clone, PartialEq)]
pub struct QuestDetails {
    pub quest: Quest,
    pub user: Option<User>,
    /// 当前用户对该任务的提交，最新的在前
    pub submissions: Vec<Submission>,
}

impl QuestDetails {
    /// 最近一次提交
    pub fn latest_submission(&self) -> Option<&Submission> {
        self.submissions.first()
    }

    pub fn is_completed(&self) -> bool {
        self.user
            .as_ref()
            .is_some_and(|u| u.has_completed(&self.quest.id))
    }
}

/// 管理后台首页统计
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_quests: usize,
    pub active_quests: usize,
    pub submissions: SubmissionStats,
}

/// 任务相关业务编排
pub struct QuestService<A: ?Sized> {
    api: Arc<A>,
}

impl<A: ?Sized> Clone for QuestService<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
        }
    }
}

impl<A: QuestApi + ?Sized> QuestService<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    async fn current_user_if_signed_in(&self) -> Result<Option<User>> {
        if !self.api.has_token() {
            return Ok(None);
        }
        self.api.current_user().await.map(Some)
    }

    /// 任务目录：任务列表和当前用户（未登录为 None）
    #[instrument(skip(self))]
    pub async fn catalog(&self) -> Result<(Vec<Quest>, Option<User>)> {
        tokio::try_join!(self.api.list_quests(), self.current_user_if_signed_in())
    }

    /// 任务详情：任务、当前用户以及该用户对此任务的提交
    #[instrument(skip(self))]
    pub async fn quest_details(&self, quest_id: &str) -> Result<QuestDetails> {
        if !self.api.has_token() {
            let quest = self.api.get_quest(quest_id).await?;
            return Ok(QuestDetails {
                quest,
                user: None,
                submissions: Vec::new(),
            });
        }

        let query = SubmissionQuery::default().for_quest(quest_id);
        let (quest, user, submissions) = tokio::try_join!(
            self.api.get_quest(quest_id),
            self.api.current_user(),
            self.api.list_submissions(&query),
        )?;

        // 管理员调用时服务端返回全部用户的提交，这里只保留自己的
        let mut submissions: Vec<Submission> = submissions
            .into_iter()
            .filter(|s| s.user_id == user.id && s.quest_id == quest.id)
            .collect();
        sort_submissions_newest_first(&mut submissions);

        Ok(QuestDetails {
            quest,
            user: Some(user),
            submissions,
        })
    }

    /// 提交前的本地校验，不发请求
    pub fn validate_submission(
        &self,
        quest: &Quest,
        content: &SubmissionContent,
        user: &User,
    ) -> Result<()> {
        check_submission(quest, content, user, Utc::now())?;
        Ok(())
    }

    /// 提交任务
    #[instrument(skip(self, content), fields(kind = %content.kind()))]
    pub async fn submit(&self, quest_id: &str, content: &SubmissionContent) -> Result<Submission> {
        if !self.api.has_token() {
            return Err(ClientError::AuthenticationRequired);
        }

        let (quest, user) =
            tokio::try_join!(self.api.get_quest(quest_id), self.api.current_user())?;
        let content = content.normalized();
        self.validate_submission(&quest, &content, &user)?;

        let submission = self.api.submit_quest(quest_id, &content).await?;
        info!(submission_id = %submission.id, quest_id, "任务已提交");
        Ok(submission)
    }

    /// 针对"需修改"的提交重新提交
    #[instrument(skip(self, content))]
    pub async fn resubmit(
        &self,
        submission_id: &str,
        content: &SubmissionContent,
    ) -> Result<Submission> {
        let content = content.normalized();
        content.validate()?;
        let submission = self.api.resubmit(submission_id, &content).await?;
        info!(submission_id, "已重新提交");
        Ok(submission)
    }

    /// 首页统计
    ///
    /// 任一请求失败都记录日志并返回全零统计
    #[instrument(skip(self))]
    pub async fn dashboard_stats(&self) -> DashboardStats {
        let query = SubmissionQuery::default();
        let result = tokio::try_join!(
            self.api.list_users(),
            self.api.list_quests(),
            self.api.list_submissions(&query),
        );

        match result {
            Ok((users, quests, submissions)) => DashboardStats {
                total_users: users.len(),
                total_quests: quests.len(),
                active_quests: quests
                    .iter()
                    .filter(|q| q.status == QuestStatus::Active)
                    .count(),
                submissions: SubmissionStats::from_submissions(&submissions),
            },
            Err(e) => {
                warn!(error = %e, "加载统计失败，使用默认值");
                DashboardStats::default()
            }
        }
    }
}
