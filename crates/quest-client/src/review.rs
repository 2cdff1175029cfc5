//! 审核后台页面状态
//!
//! 提交列表始终按提交时间倒序；每次审核后无论成功与否都重新加载，
//! 页面展示的状态以服务端为准。

use std::sync::Arc;

use quest_core::{
    ReviewDecision, ReviewRequest, Submission, SubmissionQuery, SubmissionStats,
    sort_submissions_newest_first,
};
use tracing::{info, instrument, warn};

use crate::api::QuestApi;
use crate::error::{ClientError, Result};

pub struct ReviewBoard<A: ?Sized> {
    api: Arc<A>,
    submissions: Vec<Submission>,
    stats: SubmissionStats,
    query: SubmissionQuery,
}

impl<A: QuestApi + ?Sized> ReviewBoard<A> {
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            submissions: Vec::new(),
            stats: SubmissionStats::default(),
            query: SubmissionQuery::default(),
        }
    }

    pub fn submissions(&self) -> &[Submission] {
        &self.submissions
    }

    pub fn stats(&self) -> SubmissionStats {
        self.stats
    }

    pub fn query(&self) -> &SubmissionQuery {
        &self.query
    }

    pub fn get(&self, id: &str) -> Option<&Submission> {
        self.submissions.iter().find(|s| s.id == id)
    }

    /// 列表中展示的内容摘要
    pub fn preview(&self, id: &str, max_chars: usize) -> Option<String> {
        self.get(id).map(|s| s.content.preview(max_chars))
    }

    /// 按当前查询条件加载提交列表并重算统计
    ///
    /// 失败时列表置空并返回错误
    #[instrument(skip(self), fields(query = ?self.query))]
    pub async fn load(&mut self) -> Result<()> {
        match self.api.list_submissions(&self.query).await {
            Ok(mut submissions) => {
                // 服务端未必按条件过滤，本地再过滤一次
                submissions.retain(|s| self.query.matches(s));
                sort_submissions_newest_first(&mut submissions);
                self.stats = SubmissionStats::from_submissions(&submissions);
                self.submissions = submissions;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "加载提交列表失败");
                self.submissions.clear();
                self.stats = SubmissionStats::default();
                Err(e)
            }
        }
    }

    pub async fn set_query(&mut self, query: SubmissionQuery) -> Result<()> {
        self.query = query;
        self.load().await
    }

    /// 审核一条提交
    ///
    /// 已处于终态的提交在本地直接拒绝，不发请求
    #[instrument(skip(self, feedback))]
    pub async fn review(
        &mut self,
        id: &str,
        decision: ReviewDecision,
        feedback: &str,
        points: Option<u32>,
    ) -> Result<Submission> {
        let current = self
            .get(id)
            .ok_or_else(|| ClientError::NotFound(id.to_string()))?;
        current.check_review(decision)?;

        let request = ReviewRequest {
            status: decision,
            feedback: feedback.trim().to_string(),
            points: match decision {
                ReviewDecision::Approved => points,
                _ => None,
            },
        };
        let result = self.api.review_submission(id, &request).await;

        match &result {
            Ok(submission) => {
                info!(submission_id = id, status = %submission.status, "审核完成")
            }
            Err(e) => warn!(submission_id = id, error = %e, "审核失败"),
        }
        if let Err(e) = self.load().await {
            warn!(error = %e, "审核后刷新列表失败");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockQuestApi;
    use chrono::{Duration, Utc};
    use parking_lot::Mutex;
    use quest_core::{ReviewError, SubmissionContent, SubmissionStatus};

    fn submission(id: &str, minutes_ago: i64, status: SubmissionStatus) -> Submission {
        let mut s = Submission::new(
            "q1",
            "u1",
            SubmissionContent::Text(format!("proof for {id}")),
            Utc::now() - Duration::minutes(minutes_ago),
        );
        s.id = id.into();
        s.status = status;
        s
    }

    #[tokio::test]
    async fn test_load_sorts_and_counts() {
        let mut api = MockQuestApi::new();
        api.expect_list_submissions().returning(|_| {
            Ok(vec![
                submission("a", 30, SubmissionStatus::Pending),
                submission("b", 5, SubmissionStatus::Approved),
                submission("c", 10, SubmissionStatus::Pending),
            ])
        });

        let mut board = ReviewBoard::new(Arc::new(api));
        board.load().await.unwrap();

        let ids: Vec<_> = board.submissions().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c", "a"]);
        assert_eq!(board.stats().pending, 2);
        assert_eq!(board.stats().approved, 1);
        assert_eq!(board.preview("a", 5).as_deref(), Some("proof…"));
    }

    #[tokio::test]
    async fn test_approve_reloads_from_server() {
        let server: Arc<Mutex<Vec<Submission>>> =
            Arc::new(Mutex::new(vec![submission("s1", 1, SubmissionStatus::Pending)]));

        let mut api = MockQuestApi::new();
        let listed = server.clone();
        api.expect_list_submissions()
            .times(2)
            .returning(move |_| Ok(listed.lock().clone()));
        let reviewed = server.clone();
        api.expect_review_submission()
            .times(1)
            .returning(move |id, request| {
                let mut all = reviewed.lock();
                let s = all.iter_mut().find(|s| s.id == id).unwrap();
                s.apply_review(request.status, &request.feedback, request.points, "admin", Utc::now())
                    .unwrap();
                Ok(s.clone())
            });

        let mut board = ReviewBoard::new(Arc::new(api));
        board.load().await.unwrap();
        board
            .review("s1", ReviewDecision::Approved, " Great job ", Some(50))
            .await
            .unwrap();

        let s = board.get("s1").unwrap();
        assert_eq!(s.status, SubmissionStatus::Approved);
        assert_eq!(s.feedback.as_deref(), Some("Great job"));
        assert_eq!(s.reward_earned, Some(50));
        assert_eq!(board.stats().points_awarded, 50);
    }

    #[tokio::test]
    async fn test_terminal_submission_rejected_locally() {
        let mut api = MockQuestApi::new();
        api.expect_list_submissions()
            .times(1)
            .returning(|_| Ok(vec![submission("s1", 1, SubmissionStatus::Rejected)]));
        api.expect_review_submission().never();

        let mut board = ReviewBoard::new(Arc::new(api));
        board.load().await.unwrap();
        let err = board
            .review("s1", ReviewDecision::Approved, "", None)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Review(ReviewError::InvalidTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_failed_review_still_reloads() {
        let mut api = MockQuestApi::new();
        api.expect_list_submissions()
            .times(2)
            .returning(|_| Ok(vec![submission("s1", 1, SubmissionStatus::Pending)]));
        api.expect_review_submission().times(1).returning(|_, _| {
            Err(ClientError::Api {
                status: 409,
                code: "INVALID_TRANSITION".into(),
                message: "already reviewed".into(),
            })
        });

        let mut board = ReviewBoard::new(Arc::new(api));
        board.load().await.unwrap();
        let err = board
            .review("s1", ReviewDecision::Rejected, "spam", None)
            .await
            .unwrap_err();
        assert_eq!(err.api_code(), Some("INVALID_TRANSITION"));
    }

    #[tokio::test]
    async fn test_load_failure_clears_list() {
        let mut api = MockQuestApi::new();
        let mut calls = 0;
        api.expect_list_submissions().returning(move |_| {
            calls += 1;
            if calls == 1 {
                Ok(vec![submission("s1", 1, SubmissionStatus::Pending)])
            } else {
                Err(ClientError::Decode("bad body".into()))
            }
        });

        let mut board = ReviewBoard::new(Arc::new(api));
        board.load().await.unwrap();
        assert_eq!(board.submissions().len(), 1);

        let query = SubmissionQuery::default().with_status(SubmissionStatus::Approved);
        assert!(board.set_query(query).await.is_err());
        assert!(board.submissions().is_empty());
        assert_eq!(board.stats(), SubmissionStats::default());
    }
}
