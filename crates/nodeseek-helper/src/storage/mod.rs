//! 存储模块
//!
//! 职责：
//! - 基于 sled 的本地键值存储（kv）
//! - 回帖索引与同步水位线的持久化（reply_store）

pub mod kv;
pub mod reply_store;

pub use kv::KvStore;
pub use reply_store::ReplyStore;
