//! 徽章检查服务
//!
//! 组合条件解析、条件评估与获得账本，提供徽章检查与发放的入口：
//! - 读完书后检查阅读类徽章
//! - 只读检查当前满足条件的徽章
//! - 批量发放满足条件的徽章（允许部分成功）
//! - 注册徽章、邀请徽章、手动发放
//! - 徽章墙进度
//!
//! 每次调用都是一次无状态的"读取 -> 评估 -> 写入"，
//! 用户快照每次重新读取，不做缓存。

use std::collections::HashSet;
use std::sync::Arc;

use badge_shared::observability::metrics;
use tracing::{debug, info, instrument, warn};

use crate::criteria::{CriteriaKind, ParsedCriteria, WarnOnce};
use crate::data_source::DataSource;
use crate::error::{BadgeError, Result};
use crate::evaluator::{ConditionEvaluator, Evaluation};
use crate::ledger::AwardLedger;
use crate::models::{Badge, UserSnapshot};
use crate::progress::{self, BadgeProgress};
use crate::service::dto::{AwardEarnedResponse, AwardFailure, AwardedBadge, CheckEarnedResponse};

/// 检查场景标签
mod scenario {
    pub const READ: &str = "read";
    pub const EARNED: &str = "earned";
    pub const AWARD_EARNED: &str = "award_earned";
    pub const REGISTRATION: &str = "registration";
    pub const REFERRAL: &str = "referral";
    pub const MANUAL: &str = "manual";
}

/// 年度目标不为正数的告警整个进程只出现一次，不按用户区分
const NON_POSITIVE_YEAR_GOAL: &str = "year_goal:non_positive";

/// 徽章检查服务
///
/// 数据源在构造时注入，服务本身不持有可变状态，
/// 只有告警去重集合在多次调用之间共享。
#[derive(Clone)]
pub struct BadgeCheckService {
    source: DataSource,
    ledger: AwardLedger,
    warnings: Arc<WarnOnce>,
}

impl BadgeCheckService {
    pub fn new(source: DataSource) -> Self {
        let ledger = AwardLedger::new(source.awards.clone());
        Self {
            source,
            ledger,
            warnings: Arc::new(WarnOnce::new()),
        }
    }

    pub fn ledger(&self) -> &AwardLedger {
        &self.ledger
    }

    /// 已告警过的问题数
    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    // ==================== 阅读类徽章 ====================

    /// 按已读完书籍数检查并发放阅读类徽章
    ///
    /// 返回本次新发放的数量
    #[instrument(skip(self))]
    pub async fn check_read_badges(&self, user_id: &str) -> Result<usize> {
        metrics::record_badge_check(scenario::READ);

        let (completed, badges) = tokio::try_join!(
            self.source.users.count_completed_books(user_id),
            self.source.badges.list_active_badges(),
        )?;

        let books_read = i32::try_from(completed).unwrap_or(i32::MAX);
        let snapshot = UserSnapshot::new(user_id).with_books_read(books_read);

        let mut awarded = 0;
        for badge in &badges {
            let Some(condition) = self.parse_criteria(badge) else {
                continue;
            };
            if condition.kind != CriteriaKind::BooksRead {
                continue;
            }
            if !ConditionEvaluator::evaluate(Some(&condition), &snapshot).earned {
                continue;
            }
            if self.ledger.award(user_id, &badge.id).await {
                awarded += 1;
            }
        }

        info!(
            user_id = %user_id,
            books_read = completed,
            awarded = awarded,
            "阅读类徽章检查完成"
        );
        Ok(awarded)
    }

    /// 书籍标记为已读完后的附带检查
    ///
    /// 失败只记录日志并返回 0，不影响书籍状态的写入
    pub async fn on_book_completed(&self, user_id: &str) -> usize {
        match self.check_read_badges(user_id).await {
            Ok(awarded) => awarded,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "读完书后的徽章检查失败");
                0
            }
        }
    }

    // ==================== 全量检查与发放 ====================

    /// 检查当前满足条件且尚未持有的徽章，不发放
    #[instrument(skip(self))]
    pub async fn check_earned_badges(&self, user_id: &str) -> Result<CheckEarnedResponse> {
        metrics::record_badge_check(scenario::EARNED);

        let (snapshot, badges, held) = tokio::try_join!(
            self.source.users.get_snapshot(user_id),
            self.source.badges.list_active_badges(),
            self.source.awards.list_badge_ids(user_id),
        )?;
        let snapshot = snapshot.ok_or_else(|| BadgeError::UserNotFound(user_id.to_string()))?;
        let held: HashSet<String> = held.into_iter().collect();

        let earned_badges: Vec<Badge> = badges
            .into_iter()
            .filter(|badge| !held.contains(&badge.id))
            .filter(|badge| self.evaluate(badge, &snapshot).earned)
            .collect();

        debug!(
            user_id = %user_id,
            held = held.len(),
            earned = earned_badges.len(),
            "徽章检查完成"
        );

        Ok(CheckEarnedResponse {
            total_earned: earned_badges.len(),
            user: snapshot,
            earned_badges,
        })
    }

    /// 发放所有满足条件且尚未持有的徽章
    ///
    /// 单个徽章写入失败不影响其余徽章，失败项汇总在 `errors` 中；
    /// 并发请求抢先写入造成的唯一约束冲突直接跳过，不计入任何一方
    #[instrument(skip(self))]
    pub async fn award_earned_badges(&self, user_id: &str) -> Result<AwardEarnedResponse> {
        let check = self.check_earned_badges(user_id).await?;
        metrics::record_badge_check(scenario::AWARD_EARNED);

        let mut badges_awarded = Vec::new();
        let mut errors = Vec::new();

        for badge in check.earned_badges {
            match self.ledger.award_unchecked(user_id, &badge.id).await {
                Ok(Some(record)) => badges_awarded.push(AwardedBadge {
                    badge,
                    result: record,
                }),
                Ok(None) => {
                    debug!(user_id = %user_id, badge_id = %badge.id, "徽章已被并发请求发放，跳过");
                }
                Err(e) => {
                    warn!(user_id = %user_id, badge_id = %badge.id, error = %e, "徽章发放失败");
                    errors.push(AwardFailure {
                        badge,
                        error: e.to_string(),
                    });
                }
            }
        }

        let response = AwardEarnedResponse::new(badges_awarded, errors);
        info!(
            user_id = %user_id,
            awarded = response.badges_awarded.len(),
            failed = response.errors.len(),
            "批量发放完成"
        );
        Ok(response)
    }

    // ==================== 单个徽章 ====================

    /// 发放注册徽章
    ///
    /// 候选徽章按解析结果挑选，与检查和进度展示使用同一套解析规则；
    /// 目录中没有注册徽章或发放失败时返回 false
    #[instrument(skip(self))]
    pub async fn award_registration_badge(&self, user_id: &str) -> bool {
        metrics::record_badge_check(scenario::REGISTRATION);

        let candidates = match self.source.badges.list_active_badges().await {
            Ok(badges) => badges,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "查询注册徽章失败");
                return false;
            }
        };

        let badge = candidates.into_iter().find(|badge| {
            self.parse_criteria(badge)
                .is_some_and(|c| c.kind == CriteriaKind::Registration)
        });

        match badge {
            Some(badge) => self.ledger.award(user_id, &badge.id).await,
            None => {
                info!("目录中没有启用的注册徽章");
                false
            }
        }
    }

    /// 发放邀请徽章
    ///
    /// 在用户主动分享时调用，不计算邀请人数，直接发放阈值最低的邀请徽章
    #[instrument(skip(self))]
    pub async fn award_referral_badge(&self, user_id: &str) -> bool {
        metrics::record_badge_check(scenario::REFERRAL);

        let candidates = match self.source.badges.list_active_badges().await {
            Ok(badges) => badges,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "查询邀请徽章失败");
                return false;
            }
        };

        let badge = candidates
            .into_iter()
            .filter_map(|badge| {
                self.parse_criteria(&badge)
                    .filter(|c| c.kind == CriteriaKind::Referral)
                    .map(|c| (c.threshold, badge))
            })
            .min_by_key(|(threshold, _)| *threshold);

        match badge {
            Some((_, badge)) => self.ledger.award(user_id, &badge.id).await,
            None => {
                info!("目录中没有启用的邀请徽章");
                false
            }
        }
    }

    /// 手动发放指定徽章，不评估条件
    ///
    /// 徽章不存在或未启用时返回 `BadgeNotFound`
    #[instrument(skip(self))]
    pub async fn award_badge(&self, user_id: &str, badge_id: &str) -> Result<bool> {
        metrics::record_badge_check(scenario::MANUAL);

        let badge = self
            .source
            .badges
            .get_badge(badge_id)
            .await?
            .filter(|badge| badge.is_active)
            .ok_or_else(|| BadgeError::BadgeNotFound(badge_id.to_string()))?;

        Ok(self.ledger.award(user_id, &badge.id).await)
    }

    // ==================== 展示 ====================

    /// 徽章墙进度
    #[instrument(skip(self))]
    pub async fn badge_progress(&self, user_id: &str) -> Result<Vec<BadgeProgress>> {
        let (snapshot, badges, held) = tokio::try_join!(
            self.source.users.get_snapshot(user_id),
            self.source.badges.list_active_badges(),
            self.source.awards.list_badge_ids(user_id),
        )?;
        let snapshot = snapshot.ok_or_else(|| BadgeError::UserNotFound(user_id.to_string()))?;
        let held: HashSet<String> = held.into_iter().collect();

        Ok(progress::badge_progress(&badges, &snapshot, &held))
    }

    // ==================== 内部方法 ====================

    /// 严格解析条件，无法解析的字符串每个进程只告警一次
    fn parse_criteria(&self, badge: &Badge) -> Option<ParsedCriteria> {
        let parsed = badge.parsed_criteria();
        if parsed.is_none() && self.warnings.first_time(&format!("criteria:{}", badge.criteria)) {
            warn!(
                badge_id = %badge.id,
                criteria = %badge.criteria,
                "无法解析的徽章条件，该徽章永远不会被发放"
            );
            metrics::record_unparseable_criteria();
        }
        parsed
    }

    fn evaluate(&self, badge: &Badge, snapshot: &UserSnapshot) -> Evaluation {
        let condition = self.parse_criteria(badge);

        if condition.is_some_and(|c| c.kind == CriteriaKind::YearGoalPercentage)
            && snapshot.year_goal <= 0
            && self.warnings.first_time(NON_POSITIVE_YEAR_GOAL)
        {
            warn!(
                user_id = %snapshot.id,
                year_goal = snapshot.year_goal,
                "年度目标不为正数，年度目标类徽章视为未达成"
            );
        }

        ConditionEvaluator::evaluate(condition.as_ref(), snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use badge_shared::config::DataSourceKind;

    use crate::models::NewAwardRecord;
    use crate::repository::{
        MockAwardRepositoryTrait, MockBadgeRepositoryTrait, MockUserRepositoryTrait,
    };

    fn service(
        badges: MockBadgeRepositoryTrait,
        users: MockUserRepositoryTrait,
        awards: MockAwardRepositoryTrait,
    ) -> BadgeCheckService {
        BadgeCheckService::new(DataSource::new(
            Arc::new(badges),
            Arc::new(users),
            Arc::new(awards),
            DataSourceKind::Fixture,
        ))
    }

    fn catalog() -> Vec<Badge> {
        vec![
            Badge::new("b-reg", "Регистрация", "registration").with_sort_order(1),
            Badge::new("b-read-1", "Первая книга", "read_1").with_sort_order(2),
            Badge::new("b-read-10", "10 книг", "read_10").with_sort_order(3),
            Badge::new("b-ref-1", "Советчик", "referral_1").with_sort_order(4),
            Badge::new("b-broken", "Сломанный", "read_ten").with_sort_order(5),
        ]
    }

    fn users_with(snapshot: UserSnapshot) -> MockUserRepositoryTrait {
        let mut users = MockUserRepositoryTrait::new();
        users
            .expect_get_snapshot()
            .returning(move |_| Ok(Some(snapshot.clone())));
        users
    }

    fn badges_with(list: Vec<Badge>) -> MockBadgeRepositoryTrait {
        let mut badges = MockBadgeRepositoryTrait::new();
        badges
            .expect_list_active_badges()
            .returning(move || Ok(list.clone()));
        badges
    }

    #[tokio::test]
    async fn test_check_earned_excludes_held_and_unknown() {
        let mut awards = MockAwardRepositoryTrait::new();
        awards
            .expect_list_badge_ids()
            .returning(|_| Ok(vec!["b-reg".to_string()]));

        let svc = service(
            badges_with(catalog()),
            users_with(UserSnapshot::new("u1").with_books_read(3)),
            awards,
        );

        let result = svc.check_earned_badges("u1").await.unwrap();
        let ids: Vec<&str> = result.earned_badges.iter().map(|b| b.id.as_str()).collect();
        assert_eq!(ids, vec!["b-read-1"]);
        assert_eq!(result.total_earned, 1);
        assert_eq!(result.user.books_read, 3);
        // read_ten 只告警一次
        assert_eq!(svc.warning_count(), 1);

        svc.check_earned_badges("u1").await.unwrap();
        assert_eq!(svc.warning_count(), 1);
    }

    #[tokio::test]
    async fn test_check_earned_user_not_found() {
        let mut users = MockUserRepositoryTrait::new();
        users.expect_get_snapshot().returning(|_| Ok(None));
        let mut awards = MockAwardRepositoryTrait::new();
        awards.expect_list_badge_ids().returning(|_| Ok(vec![]));

        let svc = service(badges_with(catalog()), users, awards);
        let result = svc.check_earned_badges("ghost").await;
        assert!(matches!(result, Err(BadgeError::UserNotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_check_earned_propagates_read_failure() {
        let mut badges = MockBadgeRepositoryTrait::new();
        badges
            .expect_list_active_badges()
            .returning(|| Err(BadgeError::StoreUnavailable("down".to_string())));
        let mut awards = MockAwardRepositoryTrait::new();
        awards.expect_list_badge_ids().returning(|_| Ok(vec![]));

        let svc = service(badges, users_with(UserSnapshot::new("u1")), awards);
        let result = svc.check_earned_badges("u1").await;
        assert!(matches!(result, Err(BadgeError::StoreUnavailable(_))));
    }

    #[tokio::test]
    async fn test_award_earned_partial_failure() {
        let mut awards = MockAwardRepositoryTrait::new();
        awards.expect_list_badge_ids().returning(|_| Ok(vec![]));
        awards.expect_create_award().returning(|award| {
            if award.badge_id == "b-read-10" {
                Err(BadgeError::StoreUnavailable("timeout".to_string()))
            } else {
                Ok(award.clone().into_record())
            }
        });

        let svc = service(
            badges_with(vec![
                Badge::new("b-read-1", "Первая книга", "read_1"),
                Badge::new("b-read-10", "10 книг", "read_10"),
            ]),
            users_with(UserSnapshot::new("u1").with_books_read(12)),
            awards,
        );

        let response = svc.award_earned_badges("u1").await.unwrap();
        assert!(!response.success);
        assert_eq!(response.badges_awarded.len(), 1);
        assert_eq!(response.errors.len(), 1);
        assert_eq!(response.errors[0].badge.id, "b-read-10");
        assert_eq!(response.message, "Awarded 1 badges, 1 failed");
    }

    #[tokio::test]
    async fn test_award_earned_conflict_skipped() {
        let mut awards = MockAwardRepositoryTrait::new();
        awards.expect_list_badge_ids().returning(|_| Ok(vec![]));
        awards.expect_create_award().returning(|award| {
            Err(BadgeError::DuplicateAward {
                user_id: award.user_id.clone(),
                badge_id: award.badge_id.clone(),
            })
        });

        let svc = service(
            badges_with(vec![Badge::new("b-read-1", "Первая книга", "read_1")]),
            users_with(UserSnapshot::new("u1").with_books_read(1)),
            awards,
        );

        let response = svc.award_earned_badges("u1").await.unwrap();
        assert!(response.success);
        assert!(response.badges_awarded.is_empty());
        assert!(response.errors.is_empty());
        assert_eq!(response.message, "No new badges to award");
    }

    #[tokio::test]
    async fn test_check_read_badges_only_books_read() {
        let mut users = MockUserRepositoryTrait::new();
        users.expect_count_completed_books().returning(|_| Ok(10));
        let mut awards = MockAwardRepositoryTrait::new();
        awards.expect_find_award().returning(|_, _| Ok(None));
        awards
            .expect_create_award()
            .times(2)
            .returning(|award| Ok(award.clone().into_record()));

        let svc = service(badges_with(catalog()), users, awards);
        assert_eq!(svc.check_read_badges("u1").await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_on_book_completed_swallows_errors() {
        let mut users = MockUserRepositoryTrait::new();
        users
            .expect_count_completed_books()
            .returning(|_| Err(BadgeError::StoreUnavailable("down".to_string())));

        let svc = service(
            badges_with(catalog()),
            users,
            MockAwardRepositoryTrait::new(),
        );
        assert_eq!(svc.on_book_completed("u1").await, 0);
    }

    #[tokio::test]
    async fn test_award_referral_picks_lowest_threshold() {
        let badges = badges_with(vec![
            Badge::new("b-read-1", "Первая книга", "read_1"),
            Badge::new("b-ref-5", "5 друзей", "referral_5"),
            Badge::new("b-ref-1", "Советчик", "referral_1"),
            Badge::new("b-ref-x", "???", "referral_x"),
        ]);
        let mut awards = MockAwardRepositoryTrait::new();
        awards.expect_find_award().returning(|_, _| Ok(None));
        awards
            .expect_create_award()
            .times(1)
            .withf(|award| award.badge_id == "b-ref-1")
            .returning(|award| Ok(award.clone().into_record()));

        let svc = service(badges, MockUserRepositoryTrait::new(), awards);
        assert!(svc.award_referral_badge("u1").await);
    }

    #[tokio::test]
    async fn test_award_registration_missing_badge() {
        let svc = service(
            badges_with(vec![Badge::new("b-read-1", "Первая книга", "read_1")]),
            MockUserRepositoryTrait::new(),
            MockAwardRepositoryTrait::new(),
        );
        assert!(!svc.award_registration_badge("u1").await);
    }

    #[tokio::test]
    async fn test_award_registration_already_held() {
        let badges = badges_with(vec![Badge::new("b-reg", "Регистрация", "registration")]);
        let mut awards = MockAwardRepositoryTrait::new();
        awards
            .expect_find_award()
            .returning(|u, b| Ok(Some(NewAwardRecord::now(u, b).into_record())));
        awards.expect_create_award().never();

        let svc = service(badges, MockUserRepositoryTrait::new(), awards);
        assert!(!svc.award_registration_badge("u1").await);
    }

    #[tokio::test]
    async fn test_award_registration_whitespace_padded_criteria() {
        let mut awards = MockAwardRepositoryTrait::new();
        awards.expect_find_award().returning(|_, _| Ok(None));
        awards
            .expect_create_award()
            .times(1)
            .withf(|award| award.badge_id == "b-reg")
            .returning(|award| Ok(award.clone().into_record()));

        let svc = service(
            badges_with(vec![
                Badge::new("b-read-1", "Первая книга", "read_1"),
                Badge::new("b-reg", "Регистрация", "Registration\n"),
            ]),
            MockUserRepositoryTrait::new(),
            awards,
        );
        assert!(svc.award_registration_badge("u1").await);
    }

    #[tokio::test]
    async fn test_award_referral_whitespace_padded_criteria() {
        let mut awards = MockAwardRepositoryTrait::new();
        awards.expect_find_award().returning(|_, _| Ok(None));
        awards
            .expect_create_award()
            .times(1)
            .withf(|award| award.badge_id == "b-ref-1")
            .returning(|award| Ok(award.clone().into_record()));

        let svc = service(
            badges_with(vec![
                Badge::new("b-ref-3", "Три друга", "referral_3"),
                Badge::new("b-ref-1", "Советчик", "\treferral_1"),
            ]),
            MockUserRepositoryTrait::new(),
            awards,
        );
        assert!(svc.award_referral_badge("u1").await);
        assert_eq!(svc.warning_count(), 0);
    }

    #[tokio::test]
    async fn test_award_registration_catalog_failure() {
        let mut badges = MockBadgeRepositoryTrait::new();
        badges
            .expect_list_active_badges()
            .returning(|| Err(BadgeError::StoreUnavailable("down".to_string())));
        let mut awards = MockAwardRepositoryTrait::new();
        awards.expect_create_award().never();

        let svc = service(badges, MockUserRepositoryTrait::new(), awards);
        assert!(!svc.award_registration_badge("u1").await);
    }

    #[tokio::test]
    async fn test_award_badge_inactive_not_found() {
        let mut badges = MockBadgeRepositoryTrait::new();
        badges
            .expect_get_badge()
            .returning(|id| Ok(Some(Badge::new(id, "Старый", "read_1").inactive())));

        let svc = service(
            badges,
            MockUserRepositoryTrait::new(),
            MockAwardRepositoryTrait::new(),
        );
        let result = svc.award_badge("u1", "b-old").await;
        assert!(matches!(result, Err(BadgeError::BadgeNotFound(id)) if id == "b-old"));
    }

    #[tokio::test]
    async fn test_zero_year_goal_warns_once() {
        let mut awards = MockAwardRepositoryTrait::new();
        awards.expect_list_badge_ids().returning(|_| Ok(vec![]));

        let svc = service(
            badges_with(vec![
                Badge::new("b-goal-50", "Половина", "goal_50"),
                Badge::new("b-goal-100", "Цель", "goal_100"),
            ]),
            users_with(UserSnapshot::new("u1").with_books_read(5).with_year_goal(0)),
            awards,
        );

        let result = svc.check_earned_badges("u1").await.unwrap();
        assert!(result.earned_badges.is_empty());
        assert_eq!(svc.warning_count(), 1);
    }

    #[tokio::test]
    async fn test_zero_year_goal_warning_not_per_user() {
        let mut users = MockUserRepositoryTrait::new();
        users
            .expect_get_snapshot()
            .returning(|id| Ok(Some(UserSnapshot::new(id).with_year_goal(0))));
        let mut awards = MockAwardRepositoryTrait::new();
        awards.expect_list_badge_ids().returning(|_| Ok(vec![]));

        let svc = service(
            badges_with(vec![Badge::new("b-goal-100", "Цель", "goal_100")]),
            users,
            awards,
        );

        for user_id in ["u1", "u2", "u3"] {
            svc.check_earned_badges(user_id).await.unwrap();
        }
        assert_eq!(svc.warning_count(), 1);
    }
}
