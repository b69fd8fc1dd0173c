//! 助手会话
//!
//! 把当前用户、存储、同步引擎和查询门面收拢到一个显式的会话对象里，
//! 取代散落的全局可变状态。展示层只跟本模块打交道：
//! - 检测到自己的回帖时调用 `record_reply`
//! - 渲染帖子列表时调用 `is_replied` / `floors`
//! - 同步按钮左键触发 `sync_history`，次要操作触发 `reset_sync_time`

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tracing::info;

use crate::error::{HelperError, Result};
use crate::history::HistoryFetcher;
use crate::query::ReplyQuery;
use crate::reporter::SyncReporter;
use crate::storage::ReplyStore;
use crate::sync::{SyncConfig, SyncEngine, SyncSummary};

/// 助手会话
pub struct HelperSession {
    store: Arc<ReplyStore>,
    engine: SyncEngine,
    query: ReplyQuery,
    reporter: Arc<dyn SyncReporter>,

    /// 当前登录用户 id，首次从页面中检测到后固定
    current_user: RwLock<Option<String>>,
}

impl HelperSession {
    /// 创建会话
    pub fn new(
        store: Arc<ReplyStore>,
        fetcher: Arc<dyn HistoryFetcher>,
        reporter: Arc<dyn SyncReporter>,
        config: SyncConfig,
    ) -> Self {
        let engine = SyncEngine::new(store.clone(), fetcher, reporter.clone(), config);
        let query = ReplyQuery::new(store.clone());
        Self {
            store,
            engine,
            query,
            reporter,
            current_user: RwLock::new(None),
        }
    }

    /// 记录检测到的登录用户，以首次检测结果为准
    pub async fn set_current_user(&self, uid: &str) {
        let mut current = self.current_user.write().await;
        if current.is_none() {
            info!("检测到登录用户: uid={}", uid);
            *current = Some(uid.to_string());
        }
    }

    /// 当前登录用户 id
    pub async fn current_user(&self) -> Option<String> {
        self.current_user.read().await.clone()
    }

    /// 记录一条在页面上检测到的回帖
    pub async fn record_reply(&self, post_id: &str, floor_id: &str) -> bool {
        self.store.record_reply(post_id, floor_id).await
    }

    /// 当前用户是否在该帖回复过
    pub async fn is_replied(&self, post_id: &str) -> bool {
        self.query.is_replied(post_id).await
    }

    /// 该帖中当前用户回复过的楼层（升序）
    pub async fn floors(&self, post_id: &str) -> Vec<u64> {
        self.query.floors(post_id).await
    }

    /// 查询门面
    pub fn query(&self) -> &ReplyQuery {
        &self.query
    }

    /// 执行一次回帖历史同步
    ///
    /// 未检测到登录用户时拒绝启动；已有同步在运行时本次请求被忽略，
    /// 返回 `Ok(None)`。
    pub async fn sync_history(&self) -> Result<Option<SyncSummary>> {
        let uid = self
            .current_user()
            .await
            .ok_or(HelperError::NotLoggedIn)?;
        Ok(self.engine.run(&uid).await)
    }

    /// 上次同步完成时间（秒级时间戳，0 = 从未同步）
    pub async fn last_sync_time(&self) -> u64 {
        self.store.last_sync_time().await
    }

    /// 重置同步水位线，下次同步将全量扫描
    pub async fn reset_sync_time(&self) {
        self.store.reset_sync_time().await;
        self.reporter
            .notify("🗑️ 时间已重置", Duration::from_secs(2))
            .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::PageFetch;
    use crate::reporter::LogReporter;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct EmptyFetcher;

    #[async_trait]
    impl HistoryFetcher for EmptyFetcher {
        async fn fetch_page(&self, _uid: &str, _page: u32) -> PageFetch {
            PageFetch::Empty
        }
    }

    async fn new_session() -> (TempDir, HelperSession) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(ReplyStore::open(temp_dir.path()).await.unwrap());
        let session = HelperSession::new(
            store,
            Arc::new(EmptyFetcher),
            Arc::new(LogReporter),
            SyncConfig {
                rate_limit_cooldown: Duration::ZERO,
                transport_retry: Duration::ZERO,
                page_interval: Duration::ZERO,
                max_pages: 500,
            },
        );
        (temp_dir, session)
    }

    #[tokio::test]
    async fn test_first_detected_user_wins() {
        let (_dir, session) = new_session().await;

        assert_eq!(session.current_user().await, None);
        session.set_current_user("10086").await;
        session.set_current_user("99999").await;
        assert_eq!(session.current_user().await.as_deref(), Some("10086"));
    }

    #[tokio::test]
    async fn test_sync_refused_without_user() {
        let (_dir, session) = new_session().await;

        match session.sync_history().await {
            Err(HelperError::NotLoggedIn) => {}
            other => panic!("应拒绝未登录的同步请求，实际: {:?}", other.map(|_| ())),
        }

        session.set_current_user("10086").await;
        let summary = session.sync_history().await.unwrap().unwrap();
        assert_eq!(summary.new_count, 0);
    }

    #[tokio::test]
    async fn test_record_and_query_roundtrip() {
        let (_dir, session) = new_session().await;

        assert!(session.record_reply("42", "7").await);
        assert!(session.is_replied("42").await);
        assert_eq!(session.floors("42").await, vec![7]);
        assert!(!session.is_replied("99").await);
    }

    #[tokio::test]
    async fn test_reset_sync_time() {
        let (_dir, session) = new_session().await;

        session.store.set_last_sync_time(1234).await;
        assert_eq!(session.last_sync_time().await, 1234);

        session.reset_sync_time().await;
        assert_eq!(session.last_sync_time().await, 0);
    }
}
