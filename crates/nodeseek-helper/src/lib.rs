//! NodeSeek 回帖助手核心库
//!
//! 为论坛页面助手提供回帖记录的本地索引与同步能力，包括：
//! - 📒 回帖索引：post_id -> 已回复楼层列表，升序去重、逐条落盘
//! - 🔄 历史同步：倒序分页拉取回帖历史，增量截止 + 可选深度扫描
//! - ⏱️ 水位线：只前进不回退，可由用户显式重置触发全量扫描
//! - 🛡️ 失败退化：限流/网络失败有界重试，本地状态损坏按空索引处理
//! - ⚡ 快捷回复：内置分类数据与分列平衡算法
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use nodeseek_helper::{
//!     HelperSession, HttpHistoryFetcher, LogReporter, ReplyStore, SyncConfig, DEFAULT_BASE_URL,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(ReplyStore::open("/path/to/data").await?);
//!     let fetcher = Arc::new(HttpHistoryFetcher::new(DEFAULT_BASE_URL)?);
//!     let session = HelperSession::new(store, fetcher, Arc::new(LogReporter), SyncConfig::default());
//!
//!     // 页面检测到登录用户后注入
//!     session.set_current_user("10086").await;
//!
//!     // 左键同步按钮
//!     if let Some(summary) = session.sync_history().await? {
//!         println!("新增 {} 条回帖记录", summary.new_count);
//!     }
//!
//!     // 渲染帖子列表
//!     if session.is_replied("42").await {
//!         println!("已回复楼层: {:?}", session.floors("42").await);
//!     }
//!
//!     Ok(())
//! }
//! ```

// 导出核心模块
pub mod error;
pub mod history;
pub mod query;
pub mod quick_reply;
pub mod reporter;
pub mod session;
pub mod storage;
pub mod sync;
pub mod version;

// 重新导出核心类型，方便使用
pub use error::{HelperError, Result};
pub use history::{
    HistoryFetcher, HistoryRecord, HttpHistoryFetcher, PageFetch, DEFAULT_BASE_URL,
};
pub use query::{floor_jump_link, floor_page, ReplyQuery, FLOORS_PER_PAGE};
pub use quick_reply::{balanced_columns, preset_categories, QuickReplyCategory};
pub use reporter::{LogReporter, SyncReporter};
pub use session::HelperSession;
pub use storage::{KvStore, ReplyStore};
pub use sync::{format_sync_time, SyncConfig, SyncEngine, SyncOutcome, SyncSummary};
