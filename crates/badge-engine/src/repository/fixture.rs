//! 内存夹具存储
//!
//! 使用 DashMap 实现的记录存储，适用于测试、演示和本地开发。
//! 与 PostgreSQL 实现一样在存储层保证 (user_id, badge_id) 唯一，
//! 并支持故障注入以模拟写入失败和存储不可用。

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::{DashMap, DashSet};
use uuid::Uuid;

use super::traits::{AwardRepositoryTrait, BadgeRepositoryTrait, UserRepositoryTrait};
use crate::error::{BadgeError, Result};
use crate::models::{AwardRecord, Badge, BookStatus, NewAwardRecord, UserBook, UserSnapshot};

/// 演示用户 ID
pub const DEMO_USER_ID: &str = "demo-user";

#[derive(Debug, Default)]
struct Inner {
    badges: DashMap<String, Badge>,
    users: DashMap<String, UserSnapshot>,
    books: DashMap<String, UserBook>,
    awards: DashMap<(String, String), AwardRecord>,
    failing_badges: DashSet<String>,
    failing_writes: AtomicUsize,
    unavailable: AtomicBool,
}

/// 内存记录存储
///
/// Clone 共享同一份数据
#[derive(Debug, Clone, Default)]
pub struct FixtureStore {
    inner: Arc<Inner>,
}

impl FixtureStore {
    /// 创建空存储
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置默认徽章目录和演示用户
    pub fn with_default_catalog() -> Self {
        let store = Self::new();
        for badge in default_catalog() {
            store.add_badge(badge);
        }
        store.add_user(
            UserSnapshot::new(DEMO_USER_ID)
                .with_books_read(3)
                .with_streak(2)
                .with_year_goal(12),
        );
        for title in ["Мастер и Маргарита", "Преступление и наказание", "Обломов"] {
            store.add_book(DEMO_USER_ID, title, BookStatus::Completed);
        }
        store.add_book(DEMO_USER_ID, "Война и мир", BookStatus::Reading);
        store
    }

    // ==================== 数据准备 ====================

    pub fn add_badge(&self, badge: Badge) {
        self.inner.badges.insert(badge.id.clone(), badge);
    }

    pub fn add_user(&self, snapshot: UserSnapshot) {
        self.inner.users.insert(snapshot.id.clone(), snapshot);
    }

    /// 添加一本书，返回书籍 ID
    pub fn add_book(&self, user_id: &str, title: &str, status: BookStatus) -> String {
        let id = Uuid::now_v7().to_string();
        self.inner.books.insert(
            id.clone(),
            UserBook {
                id: id.clone(),
                user_id: user_id.to_string(),
                title: title.to_string(),
                status,
                updated_at: Utc::now(),
            },
        );
        id
    }

    /// 直接写入一条获得记录（绕过引擎，模拟历史数据）
    pub fn seed_award(&self, user_id: &str, badge_id: &str) {
        let record = NewAwardRecord::now(user_id, badge_id).into_record();
        self.inner
            .awards
            .insert((user_id.to_string(), badge_id.to_string()), record);
    }

    // ==================== 故障注入 ====================

    /// 指定徽章的获得记录写入总是失败
    pub fn fail_awards_for(&self, badge_id: &str) {
        self.inner.failing_badges.insert(badge_id.to_string());
    }

    /// 接下来 n 次获得记录写入失败
    pub fn fail_next_award_writes(&self, n: usize) {
        self.inner.failing_writes.store(n, Ordering::SeqCst);
    }

    /// 模拟存储整体不可用（读写都失败）
    pub fn set_unavailable(&self, unavailable: bool) {
        self.inner.unavailable.store(unavailable, Ordering::SeqCst);
    }

    // ==================== 检查 ====================

    /// 某个 (user, badge) 的获得记录数
    pub fn award_count(&self, user_id: &str, badge_id: &str) -> usize {
        self.inner
            .awards
            .iter()
            .filter(|entry| entry.user_id == user_id && entry.badge_id == badge_id)
            .count()
    }

    /// 用户的全部获得记录
    pub fn awards_for(&self, user_id: &str) -> Vec<AwardRecord> {
        let mut awards: Vec<AwardRecord> = self
            .inner
            .awards
            .iter()
            .filter(|entry| entry.user_id == user_id)
            .map(|entry| entry.value().clone())
            .collect();
        awards.sort_by(|a, b| a.earned_at.cmp(&b.earned_at));
        awards
    }

    fn ensure_available(&self) -> Result<()> {
        if self.inner.unavailable.load(Ordering::SeqCst) {
            return Err(BadgeError::StoreUnavailable(
                "fixture store unavailable".to_string(),
            ));
        }
        Ok(())
    }

    fn take_write_failure(&self) -> bool {
        self.inner
            .failing_writes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }

    fn sorted(mut badges: Vec<Badge>) -> Vec<Badge> {
        badges.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| a.name.cmp(&b.name))
        });
        badges
    }

    fn active_badges(&self) -> Vec<Badge> {
        Self::sorted(
            self.inner
                .badges
                .iter()
                .filter(|entry| entry.is_active)
                .map(|entry| entry.value().clone())
                .collect(),
        )
    }
}

// 每个方法都先让出一次执行权，模拟网络调用的挂起点

#[async_trait]
impl BadgeRepositoryTrait for FixtureStore {
    async fn list_active_badges(&self) -> Result<Vec<Badge>> {
        tokio::task::yield_now().await;
        self.ensure_available()?;
        Ok(self.active_badges())
    }

    async fn get_badge(&self, id: &str) -> Result<Option<Badge>> {
        tokio::task::yield_now().await;
        self.ensure_available()?;
        Ok(self.inner.badges.get(id).map(|badge| badge.clone()))
    }
}

#[async_trait]
impl UserRepositoryTrait for FixtureStore {
    async fn get_snapshot(&self, user_id: &str) -> Result<Option<UserSnapshot>> {
        tokio::task::yield_now().await;
        self.ensure_available()?;
        Ok(self.inner.users.get(user_id).map(|user| user.clone()))
    }

    async fn count_completed_books(&self, user_id: &str) -> Result<i64> {
        tokio::task::yield_now().await;
        self.ensure_available()?;
        let count = self
            .inner
            .books
            .iter()
            .filter(|book| book.user_id == user_id && book.status == BookStatus::Completed)
            .count();
        Ok(count as i64)
    }
}

#[async_trait]
impl AwardRepositoryTrait for FixtureStore {
    async fn find_award(&self, user_id: &str, badge_id: &str) -> Result<Option<AwardRecord>> {
        tokio::task::yield_now().await;
        self.ensure_available()?;
        Ok(self
            .inner
            .awards
            .get(&(user_id.to_string(), badge_id.to_string()))
            .map(|award| award.clone()))
    }

    async fn list_badge_ids(&self, user_id: &str) -> Result<Vec<String>> {
        Ok(self
            .awards_for_checked(user_id)
            .await?
            .into_iter()
            .map(|award| award.badge_id)
            .collect())
    }

    async fn create_award(&self, award: &NewAwardRecord) -> Result<AwardRecord> {
        tokio::task::yield_now().await;
        self.ensure_available()?;

        if self.inner.failing_badges.contains(&award.badge_id) || self.take_write_failure() {
            return Err(BadgeError::StoreUnavailable(format!(
                "simulated write failure for badge {}",
                award.badge_id
            )));
        }

        match self
            .inner
            .awards
            .entry((award.user_id.clone(), award.badge_id.clone()))
        {
            Entry::Occupied(_) => Err(BadgeError::DuplicateAward {
                user_id: award.user_id.clone(),
                badge_id: award.badge_id.clone(),
            }),
            Entry::Vacant(slot) => {
                let record = award.clone().into_record();
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }
}

impl FixtureStore {
    async fn awards_for_checked(&self, user_id: &str) -> Result<Vec<AwardRecord>> {
        tokio::task::yield_now().await;
        self.ensure_available()?;
        Ok(self.awards_for(user_id))
    }
}

/// 默认徽章目录
///
/// 与 `migrations/` 中的种子数据保持一致
pub fn default_catalog() -> Vec<Badge> {
    vec![
        Badge::new("badge-registration", "Открываю первую страницу", "registration")
            .with_description(
                "Поздравляем, ты присоединился к нашему читательскому приключению! Получи первую звезду!",
            )
            .with_image("/Badges-01.webp")
            .with_sort_order(1),
        Badge::new("badge-read-1", "Моя первая книга", "read_1")
            .with_description("Прочитал первую книгу — получи новый бейдж!")
            .with_image("/Badges-02.webp")
            .with_sort_order(2),
        Badge::new("badge-read-10", "Мастер: 10 книг", "read_10")
            .with_description("Ты прочитал 10 книг — заработал звание Мастера чтения и новый бейдж!")
            .with_image("/Badges-04.webp")
            .with_sort_order(3),
        Badge::new("badge-read-20", "Исследователь: 20 книг", "read_20")
            .with_description("Ты прочитал 20 интересных историй и заработал четвертый бейдж.")
            .with_image("/Badges-03.webp")
            .with_sort_order(4),
        Badge::new("badge-read-50", "Суперчитатель: 50 книг", "read_50")
            .with_description("Ты достоин звания Суперчитателя, ведь ты прочитал 50 книг!")
            .with_image("/Badges-05.webp")
            .with_sort_order(5),
        Badge::new("badge-referral-1", "Книжный советчик", "referral_1")
            .with_description("Приведи друга в челлендж и получи звание Книжного советчика.")
            .with_image("/Badges-06.webp")
            .with_sort_order(6),
    ]
}
