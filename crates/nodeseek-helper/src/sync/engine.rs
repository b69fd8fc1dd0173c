//! 同步引擎
//!
//! 职责：
//! - 从水位线出发驱动倒序分页拉取
//! - 增量边界处暂停并征询用户是否深度扫描
//! - 合并记录、统计新增数、推进水位线
//!
//! 历史接口按"最新在前"排序，所以稳态增量同步在碰到第一条不晚于水位线的
//! 记录时即可提前停止；该排序没有任何显式契约背书，一旦远端改为非严格
//! 时间倒序，增量截止会漏记录，只能靠用户手动重置水位线兜底。

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::history::{HistoryFetcher, PageFetch};
use crate::reporter::SyncReporter;
use crate::storage::ReplyStore;
use crate::sync::{format_sync_time, SyncConfig, SyncOutcome, SyncSummary};

/// 同步引擎
pub struct SyncEngine {
    store: Arc<ReplyStore>,
    fetcher: Arc<dyn HistoryFetcher>,
    reporter: Arc<dyn SyncReporter>,
    config: SyncConfig,

    /// 同一会话内禁止两个同步任务并行
    running: AtomicBool,
}

/// 任何退出路径都要释放运行标记
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl SyncEngine {
    /// 创建同步引擎
    pub fn new(
        store: Arc<ReplyStore>,
        fetcher: Arc<dyn HistoryFetcher>,
        reporter: Arc<dyn SyncReporter>,
        config: SyncConfig,
    ) -> Self {
        Self {
            store,
            fetcher,
            reporter,
            config,
            running: AtomicBool::new(false),
        }
    }

    /// 执行一次同步，返回摘要；已有任务在运行时返回 `None`（本次请求被忽略）
    pub async fn run(&self, uid: &str) -> Option<SyncSummary> {
        if self
            .running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("已有同步任务在运行，忽略本次请求: uid={}", uid);
            return None;
        }
        let _guard = RunGuard(&self.running);

        let last_time = self.store.last_sync_time().await;
        let mut max_time = last_time;
        let mut page: u32 = 1;
        let mut new_count: u64 = 0;
        let mut force_full = false;

        let start_msg = if last_time > 0 {
            format!("🚀 增量同步... (截止: {})", format_sync_time(last_time))
        } else {
            "🚀 全量同步 (初次运行)...".to_string()
        };
        self.reporter.notify(&start_msg, Duration::from_secs(3)).await;
        info!("开始同步回帖历史: uid={}, last_sync_time={}", uid, last_time);

        let outcome = loop {
            if page > self.config.max_pages {
                // 对异常或恶意的接口也要保证循环有界；已合并的记录不受影响
                warn!(
                    "同步触达页数上限被终止: uid={}, max_pages={}, new_count={}",
                    uid, self.config.max_pages, new_count
                );
                break SyncOutcome::AbortedAtPageCeiling;
            }

            self.reporter
                .report_progress(page, &format!("⏳ P{}", page))
                .await;

            match self.fetcher.fetch_page(uid, page).await {
                PageFetch::RateLimited => {
                    debug!("历史接口限流，冷却后重试: page={}", page);
                    sleep(self.config.rate_limit_cooldown).await;
                }
                PageFetch::TransportError(e) => {
                    debug!("第 {} 页拉取失败，稍后重试: {}", page, e);
                    sleep(self.config.transport_retry).await;
                }
                PageFetch::Empty => break SyncOutcome::Completed,
                PageFetch::Data(records) => {
                    let mut declined = false;
                    for record in &records {
                        if record.created_at > max_time {
                            max_time = record.created_at;
                        }

                        // 增量截止：碰到不晚于水位线的记录说明后面都已合并过；
                        // 首次全量（水位线为 0）不适用
                        if last_time > 0 && record.created_at <= last_time && !force_full {
                            if self.reporter.confirm_deep_rescan().await {
                                force_full = true;
                                self.reporter
                                    .notify("🚀 深度修复中...", Duration::from_secs(3))
                                    .await;
                            } else {
                                declined = true;
                                break;
                            }
                        }

                        if let (Some(post_id), Some(floor_id)) =
                            (record.post_id.as_deref(), record.floor_id.as_deref())
                        {
                            if self.store.record_reply(post_id, floor_id).await {
                                new_count += 1;
                            }
                        }
                    }
                    if declined {
                        break SyncOutcome::Completed;
                    }
                    page += 1;
                    sleep(self.config.page_interval).await;
                }
            }
        };

        // 水位线只前进不回退；终止前合并过的记录已各自落盘，
        // 所以即使是页数上限终止，当前 max_time 也是安全的
        if max_time > last_time {
            self.store.set_last_sync_time(max_time).await;
        }

        let summary = SyncSummary {
            new_count,
            final_watermark: max_time.max(last_time),
            pages_fetched: page.min(self.config.max_pages),
            outcome,
        };

        match outcome {
            SyncOutcome::Completed => {
                info!(
                    "同步完成: uid={}, new_count={}, watermark={}",
                    uid, new_count, summary.final_watermark
                );
                self.reporter
                    .notify(
                        &format!("🎉 同步完成！\n新增: {} 条记录", new_count),
                        Duration::from_secs(4),
                    )
                    .await;
            }
            SyncOutcome::AbortedAtPageCeiling => {
                self.reporter
                    .notify(
                        &format!("⚠️ 同步提前终止（已达页数上限）\n新增: {} 条记录", new_count),
                        Duration::from_secs(4),
                    )
                    .await;
            }
        }

        Some(summary)
    }
}
