//! 提交审核状态机
//!
//! 状态流转：
//!
//! ```text
//! pending ─┬─> approved        (终态)
//!          ├─> rejected        (终态)
//!          └─> needs-revision ─┬─> approved / rejected / needs-revision
//!                              └─> pending   (用户重新提交)
//! ```
//!
//! 审核只能由管理员发起，每次审核单向推进，不会自动回退。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ReviewError;
use crate::models::{Submission, SubmissionContent, SubmissionStatus};

/// 审核决定
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewDecision {
    Approved,
    Rejected,
    NeedsRevision,
}

impl ReviewDecision {
    pub fn status(&self) -> SubmissionStatus {
        match self {
            Self::Approved => SubmissionStatus::Approved,
            Self::Rejected => SubmissionStatus::Rejected,
            Self::NeedsRevision => SubmissionStatus::NeedsRevision,
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.status().as_str()
    }
}

impl SubmissionStatus {
    /// 审核是否允许从当前状态流转到 `next`
    pub fn can_transition_to(&self, next: SubmissionStatus) -> bool {
        match self {
            Self::Pending | Self::NeedsRevision => matches!(
                next,
                Self::Approved | Self::Rejected | Self::NeedsRevision
            ),
            Self::Approved | Self::Rejected => false,
        }
    }
}

/// 审核请求体
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub status: ReviewDecision,
    #[serde(default)]
    pub feedback: String,
    /// 仅在通过时有意义；不传时由服务端使用任务默认积分
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<u32>,
}

impl Submission {
    /// 校验审核决定是否可以作用于当前提交
    pub fn check_review(&self, decision: ReviewDecision) -> Result<(), ReviewError> {
        let to = decision.status();
        if self.status.can_transition_to(to) {
            Ok(())
        } else {
            Err(ReviewError::InvalidTransition {
                from: self.status,
                to,
            })
        }
    }

    /// 应用一次审核
    ///
    /// 审核意见去除首尾空白，空字符串视为无意见；
    /// 积分只在通过时写入 `reward_earned`。
    pub fn apply_review(
        &mut self,
        decision: ReviewDecision,
        feedback: &str,
        points: Option<u32>,
        reviewer: &str,
        now: DateTime<Utc>,
    ) -> Result<(), ReviewError> {
        self.check_review(decision)?;

        let feedback = feedback.trim();
        self.feedback = (!feedback.is_empty()).then(|| feedback.to_string());
        self.status = decision.status();
        self.reviewed_at = Some(now);
        self.validated_by = Some(reviewer.to_string());

        match decision {
            ReviewDecision::Approved => {
                self.validated_at = Some(now);
                self.rejected_at = None;
                self.reward_earned = points;
            }
            ReviewDecision::Rejected => {
                self.rejected_at = Some(now);
                self.validated_at = None;
                self.reward_earned = None;
            }
            ReviewDecision::NeedsRevision => {
                self.reward_earned = None;
            }
        }

        Ok(())
    }

    /// 用户针对"需修改"的提交重新提交内容，回到待审核
    ///
    /// 上一轮的审核意见保留，审核时间与审核人清空。
    pub fn resubmit(
        &mut self,
        content: SubmissionContent,
        now: DateTime<Utc>,
    ) -> Result<(), ReviewError> {
        if self.status != SubmissionStatus::NeedsRevision {
            return Err(ReviewError::NotAwaitingRevision(self.status));
        }
        if content.kind() != self.content.kind() {
            return Err(crate::error::ContentError::TypeMismatch {
                expected: self.content.kind(),
                actual: content.kind(),
            }
            .into());
        }
        content.validate()?;

        self.content = content.normalized();
        self.status = SubmissionStatus::Pending;
        self.submitted_at = now;
        self.reviewed_at = None;
        self.validated_at = None;
        self.rejected_at = None;
        self.validated_by = None;
        self.reward_earned = None;
        Ok(())
    }
}

/// 提交列表查询条件，各条件之间为 AND
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionQuery {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<SubmissionStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest_id: Option<String>,
}

impl SubmissionQuery {
    pub fn with_status(mut self, status: SubmissionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn for_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn for_quest(mut self, quest_id: impl Into<String>) -> Self {
        self.quest_id = Some(quest_id.into());
        self
    }

    pub fn matches(&self, submission: &Submission) -> bool {
        self.status.is_none_or(|s| submission.status == s)
            && self
                .user_id
                .as_deref()
                .is_none_or(|id| submission.user_id == id)
            && self
                .quest_id
                .as_deref()
                .is_none_or(|id| submission.quest_id == id)
    }

    /// 转换为 URL 查询参数
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(status) = self.status {
            pairs.push(("status", status.as_str().to_string()));
        }
        if let Some(user_id) = &self.user_id {
            pairs.push(("userId", user_id.clone()));
        }
        if let Some(quest_id) = &self.quest_id {
            pairs.push(("questId", quest_id.clone()));
        }
        pairs
    }
}

/// 提交汇总统计，每次列表变化后整体重算
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionStats {
    pub total: usize,
    pub pending: usize,
    pub approved: usize,
    pub rejected: usize,
    pub needs_revision: usize,
    pub points_awarded: u64,
}

impl SubmissionStats {
    pub fn from_submissions<'a, I>(submissions: I) -> Self
    where
        I: IntoIterator<Item = &'a Submission>,
    {
        submissions
            .into_iter()
            .fold(Self::default(), |mut stats, submission| {
                stats.total += 1;
                match submission.status {
                    SubmissionStatus::Pending => stats.pending += 1,
                    SubmissionStatus::Approved => {
                        stats.approved += 1;
                        stats.points_awarded +=
                            u64::from(submission.reward_earned.unwrap_or_default());
                    }
                    SubmissionStatus::Rejected => stats.rejected += 1,
                    SubmissionStatus::NeedsRevision => stats.needs_revision += 1,
                }
                stats
            })
    }

    /// 仍需管理员处理的数量
    pub fn awaiting_review(&self) -> usize {
        self.pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ContentError;
    use crate::models::SubmissionType;

    fn pending() -> Submission {
        Submission::new(
            "q1",
            "u1",
            SubmissionContent::Url("https://example.com/proof".into()),
            Utc::now(),
        )
    }

    const ALL: [SubmissionStatus; 4] = [
        SubmissionStatus::Pending,
        SubmissionStatus::Approved,
        SubmissionStatus::Rejected,
        SubmissionStatus::NeedsRevision,
    ];

    #[test]
    fn test_transition_table() {
        use SubmissionStatus::*;
        let allowed = [
            (Pending, Approved),
            (Pending, Rejected),
            (Pending, NeedsRevision),
            (NeedsRevision, Approved),
            (NeedsRevision, Rejected),
            (NeedsRevision, NeedsRevision),
        ];
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(to),
                    allowed.contains(&(from, to)),
                    "from={from} to={to}"
                );
            }
        }
    }

    #[test]
    fn test_approve_sets_reward_and_timestamps() {
        let mut s = pending();
        let now = Utc::now();
        s.apply_review(ReviewDecision::Approved, "  Great work  ", Some(50), "admin", now)
            .unwrap();

        assert_eq!(s.status, SubmissionStatus::Approved);
        assert_eq!(s.feedback.as_deref(), Some("Great work"));
        assert_eq!(s.reward_earned, Some(50));
        assert_eq!(s.reviewed_at, Some(now));
        assert_eq!(s.validated_at, Some(now));
        assert!(s.rejected_at.is_none());
        assert_eq!(s.validated_by.as_deref(), Some("admin"));
    }

    #[test]
    fn test_reject_ignores_points() {
        let mut s = pending();
        let now = Utc::now();
        s.apply_review(ReviewDecision::Rejected, "Link is broken", Some(50), "admin", now)
            .unwrap();

        assert_eq!(s.status, SubmissionStatus::Rejected);
        assert_eq!(s.reward_earned, None);
        assert_eq!(s.rejected_at, Some(now));
        assert!(s.validated_at.is_none());
    }

    #[test]
    fn test_terminal_states_refuse_review() {
        let mut s = pending();
        s.apply_review(ReviewDecision::Approved, "", None, "admin", Utc::now())
            .unwrap();
        assert!(s.feedback.is_none());

        let before = s.clone();
        let err = s
            .apply_review(ReviewDecision::Rejected, "oops", None, "admin", Utc::now())
            .unwrap_err();
        assert_eq!(
            err,
            ReviewError::InvalidTransition {
                from: SubmissionStatus::Approved,
                to: SubmissionStatus::Rejected
            }
        );
        assert_eq!(s, before, "失败的审核不能修改记录");
    }

    #[test]
    fn test_needs_revision_can_be_reviewed_again() {
        let mut s = pending();
        s.apply_review(ReviewDecision::NeedsRevision, "Add a screenshot", None, "mod", Utc::now())
            .unwrap();
        s.apply_review(ReviewDecision::NeedsRevision, "Still missing", None, "mod", Utc::now())
            .unwrap();
        s.apply_review(ReviewDecision::Approved, "ok", Some(10), "admin", Utc::now())
            .unwrap();
        assert_eq!(s.status, SubmissionStatus::Approved);
    }

    #[test]
    fn test_resubmit_returns_to_pending() {
        let mut s = pending();
        s.apply_review(ReviewDecision::NeedsRevision, "wrong tweet", None, "admin", Utc::now())
            .unwrap();

        let now = Utc::now();
        s.resubmit(SubmissionContent::Url(" https://example.com/v2 ".into()), now)
            .unwrap();
        assert_eq!(s.status, SubmissionStatus::Pending);
        assert_eq!(s.content.value(), "https://example.com/v2");
        assert_eq!(s.submitted_at, now);
        assert!(s.reviewed_at.is_none());
        assert_eq!(s.feedback.as_deref(), Some("wrong tweet"));
    }

    #[test]
    fn test_resubmit_rules() {
        let mut s = pending();
        assert_eq!(
            s.resubmit(SubmissionContent::Url("https://example.com".into()), Utc::now()),
            Err(ReviewError::NotAwaitingRevision(SubmissionStatus::Pending))
        );

        s.apply_review(ReviewDecision::NeedsRevision, "", None, "admin", Utc::now())
            .unwrap();
        assert_eq!(
            s.resubmit(SubmissionContent::Text("hello".into()), Utc::now()),
            Err(ReviewError::Content(ContentError::TypeMismatch {
                expected: SubmissionType::Url,
                actual: SubmissionType::Text
            }))
        );
    }

    #[test]
    fn test_query_matches_conjunctively() {
        let s = pending();
        assert!(SubmissionQuery::default().matches(&s));
        assert!(SubmissionQuery::default().for_user("u1").for_quest("q1").matches(&s));
        assert!(!SubmissionQuery::default().for_user("u1").for_quest("q2").matches(&s));
        assert!(
            !SubmissionQuery::default()
                .with_status(SubmissionStatus::Approved)
                .matches(&s)
        );
    }

    #[test]
    fn test_query_pairs() {
        let q = SubmissionQuery::default()
            .with_status(SubmissionStatus::NeedsRevision)
            .for_quest("42");
        assert_eq!(
            q.to_query_pairs(),
            vec![
                ("status", "needs-revision".to_string()),
                ("questId", "42".to_string())
            ]
        );
    }

    #[test]
    fn test_stats_recomputed_from_list() {
        let mut a = pending();
        a.apply_review(ReviewDecision::Approved, "", Some(50), "admin", Utc::now())
            .unwrap();
        let mut b = pending();
        b.apply_review(ReviewDecision::Approved, "", None, "admin", Utc::now())
            .unwrap();
        let mut c = pending();
        c.apply_review(ReviewDecision::Rejected, "", None, "admin", Utc::now())
            .unwrap();
        let mut d = pending();
        d.apply_review(ReviewDecision::NeedsRevision, "", None, "admin", Utc::now())
            .unwrap();
        let e = pending();

        let stats = SubmissionStats::from_submissions(&[a, b, c, d, e]);
        assert_eq!(
            stats,
            SubmissionStats {
                total: 5,
                pending: 1,
                approved: 2,
                rejected: 1,
                needs_revision: 1,
                points_awarded: 50,
            }
        );
        assert_eq!(stats.awaiting_review(), 1);
    }

    #[test]
    fn test_review_request_wire_format() {
        let req: ReviewRequest = serde_json::from_value(serde_json::json!({
            "status": "needs-revision",
            "feedback": "add proof"
        }))
        .unwrap();
        assert_eq!(req.status, ReviewDecision::NeedsRevision);
        assert_eq!(req.points, None);
    }
}
