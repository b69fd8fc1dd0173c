//! 回帖历史同步模块
//!
//! 职责：
//! - 驱动历史接口的倒序分页拉取
//! - 增量截止 / 深度扫描策略
//! - 合并记录进回帖索引并推进水位线
//! - 限流与传输失败的退避重试

pub mod engine;

pub use engine::SyncEngine;

use chrono::TimeZone;

/// 同步策略配置
///
/// 默认值即生产取值；测试里把各延迟设为零以便快速驱动状态机。
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// 收到限流信号后的冷却时长
    pub rate_limit_cooldown: std::time::Duration,
    /// 传输失败后的重试间隔
    pub transport_retry: std::time::Duration,
    /// 成功翻页之间的节流间隔，避免打爆远端接口
    pub page_interval: std::time::Duration,
    /// 单次同步的页数硬上限，保证对异常接口也能终止
    pub max_pages: u32,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            rate_limit_cooldown: std::time::Duration::from_secs(3),
            transport_retry: std::time::Duration::from_secs(1),
            page_interval: std::time::Duration::from_millis(200),
            max_pages: 500,
        }
    }
}

/// 一次同步的终止方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SyncOutcome {
    /// 正常结束：历史拉完，或用户在增量边界选择停止
    Completed,
    /// 触达页数上限被强制终止（部分结果，已合并的记录仍然有效）
    AbortedAtPageCeiling,
}

/// 一次同步的最终摘要
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct SyncSummary {
    /// 本次新增的回帖记录数
    pub new_count: u64,
    /// 同步结束后的水位线
    pub final_watermark: u64,
    /// 终止时的页码
    pub pages_fetched: u32,
    /// 终止方式
    pub outcome: SyncOutcome,
}

/// 把秒级时间戳格式化为本地时间展示
pub fn format_sync_time(ts: u64) -> String {
    chrono::Local
        .timestamp_opt(ts as i64, 0)
        .single()
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| ts.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_matches_policy() {
        let config = SyncConfig::default();
        assert_eq!(config.rate_limit_cooldown.as_secs(), 3);
        assert_eq!(config.transport_retry.as_secs(), 1);
        assert_eq!(config.page_interval.as_millis(), 200);
        assert_eq!(config.max_pages, 500);
    }
}
