//! 回帖索引存储
//!
//! 职责：
//! - 维护 post_id -> 已回复楼层列表（升序去重）的持久化索引
//! - 维护同步水位线（上次同步完成时的最大回帖时间）
//!
//! 所有读写操作对调用方都不抛错：本地状态损坏或缺失时按"尚无记录"处理，
//! 保证功能退化为空索引而不是拖垮宿主页面。

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::error::Result;
use crate::storage::kv::{keys, KvStore};

/// 回帖索引：post_id -> 已回复楼层列表（升序去重）
pub type ReplyIndex = BTreeMap<String, Vec<u64>>;

/// 回帖索引存储
pub struct ReplyStore {
    kv: Arc<KvStore>,

    /// 整个索引是"整文档读-改-写"，并发写入者（页面检测与同步任务）必须串行
    write_lock: Mutex<()>,
}

impl ReplyStore {
    /// 打开回帖索引存储
    pub async fn open(base_path: impl AsRef<Path>) -> Result<Self> {
        let kv = KvStore::new(base_path.as_ref()).await?;
        Ok(Self {
            kv: Arc::new(kv),
            write_lock: Mutex::new(()),
        })
    }

    /// 记录一条回帖，返回索引是否发生变化
    ///
    /// `floor_id` 以文本形式传入（页面和历史接口都这样上报），必须能解析为
    /// 非负整数，否则视为无效输入返回 `false`。重复记录是幂等的。
    pub async fn record_reply(&self, post_id: &str, floor_id: &str) -> bool {
        let floor = match floor_id.trim().parse::<u64>() {
            Ok(f) => f,
            Err(_) => {
                debug!("楼层号无法解析，忽略: post_id={}, floor_id={:?}", post_id, floor_id);
                return false;
            }
        };

        let _guard = self.write_lock.lock().await;

        let mut index = self.load_index().await;
        let floors = index.entry(post_id.to_string()).or_default();
        if floors.contains(&floor) {
            return false;
        }
        floors.push(floor);
        floors.sort_unstable();

        match self.kv.set(keys::REPLIED_POSTS, &index).await {
            Ok(()) => true,
            Err(e) => {
                warn!("持久化回帖索引失败: post_id={}, floor={}, error={}", post_id, floor, e);
                false
            }
        }
    }

    /// 读取完整回帖索引，反序列化失败时返回空索引
    pub async fn all_replies(&self) -> ReplyIndex {
        self.load_index().await
    }

    /// 上次同步完成的最大回帖时间，未同步过（或状态损坏）返回 0
    pub async fn last_sync_time(&self) -> u64 {
        match self.kv.get::<u64>(keys::LAST_SYNC_TIME).await {
            Ok(Some(ts)) => ts,
            Ok(None) => 0,
            Err(e) => {
                warn!("读取同步水位线失败，按未同步处理: {}", e);
                0
            }
        }
    }

    /// 推进同步水位线
    pub async fn set_last_sync_time(&self, ts: u64) {
        if let Err(e) = self.kv.set(keys::LAST_SYNC_TIME, &ts).await {
            warn!("写入同步水位线失败: ts={}, error={}", ts, e);
        }
    }

    /// 清除同步水位线（与写入 0 不同：键被整个移除），下次同步将全量扫描
    pub async fn reset_sync_time(&self) {
        if let Err(e) = self.kv.remove(keys::LAST_SYNC_TIME).await {
            warn!("清除同步水位线失败: {}", e);
        }
    }

    async fn load_index(&self) -> ReplyIndex {
        match self.kv.get::<ReplyIndex>(keys::REPLIED_POSTS).await {
            Ok(Some(index)) => index,
            Ok(None) => ReplyIndex::new(),
            Err(e) => {
                warn!("回帖索引损坏或不可读，按空索引处理: {}", e);
                ReplyIndex::new()
            }
        }
    }
}
