//! KV 存储模块 - 基于 sled 的本地键值存储
//!
//! 本模块提供：
//! - JSON 编码的键值读写
//! - 键删除（区分"删除"与"写入 0"）

use std::path::Path;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use sled::Db;

use crate::error::{HelperError, Result};

/// 存储键常量
pub mod keys {
    /// 回帖索引：post_id -> 已回复楼层列表
    pub const REPLIED_POSTS: &str = "nodeseek_replied_posts";
    /// 上次同步完成的最大回帖时间（秒级时间戳）
    pub const LAST_SYNC_TIME: &str = "nodeseek_last_sync_time";
}

/// KV 存储组件
#[derive(Debug, Clone)]
pub struct KvStore {
    db: Arc<Db>,
}

impl KvStore {
    /// 创建新的 KV 存储实例
    pub async fn new(base_path: &Path) -> Result<Self> {
        let kv_path = base_path.join("kv");

        tokio::fs::create_dir_all(&kv_path)
            .await
            .map_err(|e| HelperError::IO(format!("创建 KV 存储目录失败: {}", e)))?;

        // 打开 sled 数据库（上一个实例可能刚释放锁，重试多次带退避）
        const MAX_OPEN_RETRIES: u32 = 8;
        const RETRY_DELAY_MS: u64 = 300;
        let mut db_opt: Option<Db> = None;
        let mut last_err: Option<sled::Error> = None;
        for attempt in 0..MAX_OPEN_RETRIES {
            match sled::open(&kv_path) {
                Ok(d) => {
                    db_opt = Some(d);
                    break;
                }
                Err(e) => {
                    let msg = format!("{}", e);
                    last_err = Some(e);
                    let is_lock = msg.contains("could not acquire lock")
                        || msg.contains("Resource temporarily unavailable")
                        || msg.contains("WouldBlock");
                    if is_lock && attempt + 1 < MAX_OPEN_RETRIES {
                        let delay_ms = RETRY_DELAY_MS * (1 << attempt);
                        tokio::time::sleep(tokio::time::Duration::from_millis(delay_ms)).await;
                    } else {
                        break;
                    }
                }
            }
        }
        let db = db_opt.ok_or_else(|| {
            HelperError::KvStore(
                last_err
                    .map(|e| format!("打开 sled 数据库失败: {}", e))
                    .unwrap_or_else(|| "打开 sled 数据库失败".to_string()),
            )
        })?;

        Ok(Self { db: Arc::new(db) })
    }

    /// 设置键值对
    pub async fn set<V>(&self, key: &str, value: &V) -> Result<()>
    where
        V: Serialize,
    {
        let value_bytes = serde_json::to_vec(value)
            .map_err(|e| HelperError::Serialization(format!("序列化值失败: {}", e)))?;

        self.db
            .insert(key, value_bytes)
            .map_err(|e| HelperError::KvStore(format!("设置键值对失败: {}", e)))?;

        Ok(())
    }

    /// 获取键值对
    pub async fn get<V>(&self, key: &str) -> Result<Option<V>>
    where
        V: DeserializeOwned,
    {
        let result = self
            .db
            .get(key)
            .map_err(|e| HelperError::KvStore(format!("获取键值对失败: {}", e)))?;

        match result {
            Some(value_bytes) => {
                let value = serde_json::from_slice(&value_bytes)
                    .map_err(|e| HelperError::Serialization(format!("反序列化值失败: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    /// 删除键值对
    pub async fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key)
            .map_err(|e| HelperError::KvStore(format!("删除键值对失败: {}", e)))?;

        Ok(())
    }

    /// 检查键是否存在
    pub async fn exists(&self, key: &str) -> Result<bool> {
        let result = self
            .db
            .contains_key(key)
            .map_err(|e| HelperError::KvStore(format!("检查键存在失败: {}", e)))?;

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_kv_store_basic_operations() {
        let temp_dir = TempDir::new().unwrap();
        let store = KvStore::new(temp_dir.path()).await.unwrap();

        // 设置和获取
        let test_data = json!({
            "name": "test",
            "value": 123
        });

        store.set("test_key", &test_data).await.unwrap();
        let retrieved: serde_json::Value = store.get("test_key").await.unwrap().unwrap();
        assert_eq!(retrieved, test_data);

        // 检查存在性
        assert!(store.exists("test_key").await.unwrap());
        assert!(!store.exists("non_existent_key").await.unwrap());

        // 删除
        store.remove("test_key").await.unwrap();
        let deleted: Option<serde_json::Value> = store.get("test_key").await.unwrap();
        assert!(deleted.is_none());
    }

    #[tokio::test]
    async fn test_kv_store_remove_is_distinct_from_zero() {
        let temp_dir = TempDir::new().unwrap();
        let store = KvStore::new(temp_dir.path()).await.unwrap();

        // 写入 0 后键仍然存在
        store.set(keys::LAST_SYNC_TIME, &0u64).await.unwrap();
        assert!(store.exists(keys::LAST_SYNC_TIME).await.unwrap());
        let v: Option<u64> = store.get(keys::LAST_SYNC_TIME).await.unwrap();
        assert_eq!(v, Some(0));

        // 删除后键不存在
        store.remove(keys::LAST_SYNC_TIME).await.unwrap();
        assert!(!store.exists(keys::LAST_SYNC_TIME).await.unwrap());
        let v: Option<u64> = store.get(keys::LAST_SYNC_TIME).await.unwrap();
        assert_eq!(v, None);
    }
}
