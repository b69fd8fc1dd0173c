//! 进度与决策上报接口
//!
//! 同步引擎通过本接口向宿主上报进度、弹出提示，并在增量边界处向用户
//! 征询是否继续深度扫描。深度扫描确认被建模为一个显式的挂起点（返回
//! 布尔继续值），而不是阻塞式弹窗，便于测试时注入脚本化的决策。

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info};

/// 同步进度与用户决策上报
#[async_trait]
pub trait SyncReporter: Send + Sync {
    /// 上报分页进度（`label` 形如 "⏳ P3"）
    async fn report_progress(&self, page: u32, label: &str);

    /// 增量边界处询问用户：是否继续深度扫描以修复旧记录的楼层显示
    ///
    /// 深度扫描不会发现新回帖（更早的记录上次已合并过），只用于回填元数据。
    async fn confirm_deep_rescan(&self) -> bool;

    /// 展示一条提示（开始/完成/重置等摘要），`duration` 是建议的展示时长
    async fn notify(&self, message: &str, duration: Duration);
}

/// 默认实现：全部走 tracing 日志，深度扫描一律拒绝（增量为止）
pub struct LogReporter;

#[async_trait]
impl SyncReporter for LogReporter {
    async fn report_progress(&self, page: u32, label: &str) {
        debug!("同步进度: page={}, {}", page, label);
    }

    async fn confirm_deep_rescan(&self) -> bool {
        false
    }

    async fn notify(&self, message: &str, _duration: Duration) {
        info!("{}", message);
    }
}
