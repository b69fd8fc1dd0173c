//! 回帖历史拉取模块
//!
//! 职责：
//! - 按页拉取当前用户的回帖历史（`/api/content/list-comments`）
//! - 把响应归类为 数据 / 限流 / 拉完 / 传输失败 四种结果
//!
//! 拉取器自身不做任何重试，重试与退避策略全部集中在同步引擎里，
//! 保证页数上限和退避节奏有单一的审计点。

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use crate::error::{HelperError, Result};

/// NodeSeek 站点默认地址
pub const DEFAULT_BASE_URL: &str = "https://www.nodeseek.com";

/// 远端历史接口返回的一条回帖记录
///
/// 接口对 id 字段的类型并不稳定（有时是数字，有时是字符串），统一宽松
/// 解析为字符串；缺失 `created_at` 时按 0 处理。
#[derive(Debug, Clone, Deserialize)]
pub struct HistoryRecord {
    #[serde(default, deserialize_with = "lenient_id")]
    pub post_id: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub floor_id: Option<String>,
    #[serde(default)]
    pub created_at: u64,
}

/// 历史接口的一页响应
#[derive(Debug, Deserialize)]
struct CommentListResponse {
    #[serde(default)]
    comments: Option<Vec<HistoryRecord>>,
}

/// 一次分页拉取的分类结果
#[derive(Debug, Clone)]
pub enum PageFetch {
    /// 本页的回帖记录，按接口原始顺序（最新在前）
    Data(Vec<HistoryRecord>),
    /// 远端限流，调用方应冷却后重试同一页
    RateLimited,
    /// 历史已拉完，本页没有更多记录
    Empty,
    /// 网络或解析失败，调用方应稍后重试同一页
    TransportError(String),
}

/// 回帖历史拉取接口
///
/// 抽成 trait 是为了让同步引擎能用脚本化的拉取器做测试。
#[async_trait]
pub trait HistoryFetcher: Send + Sync {
    /// 拉取指定用户的第 `page` 页回帖历史（页码从 1 开始）
    async fn fetch_page(&self, uid: &str, page: u32) -> PageFetch;
}

/// 基于 reqwest 的生产实现
pub struct HttpHistoryFetcher {
    client: reqwest::Client,
    base_url: String,
}

impl HttpHistoryFetcher {
    /// 创建历史拉取器
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| HelperError::Transport(format!("创建 HTTP 客户端失败: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl HistoryFetcher for HttpHistoryFetcher {
    async fn fetch_page(&self, uid: &str, page: u32) -> PageFetch {
        let url = format!(
            "{}/api/content/list-comments?uid={}&page={}",
            self.base_url, uid, page
        );

        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => return PageFetch::TransportError(format!("请求失败: {}", e)),
        };

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            debug!("历史接口限流: page={}", page);
            return PageFetch::RateLimited;
        }
        if !status.is_success() {
            return PageFetch::TransportError(format!("HTTP 状态码: {}", status));
        }

        let body: CommentListResponse = match response.json().await {
            Ok(b) => b,
            Err(e) => return PageFetch::TransportError(format!("解析响应失败: {}", e)),
        };

        match body.comments {
            Some(records) if !records.is_empty() => PageFetch::Data(records),
            _ => PageFetch::Empty,
        }
    }
}

/// 宽松解析 id 字段：数字转为字符串，空字符串视为缺失
fn lenient_id<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_with_numeric_ids() {
        let record: HistoryRecord =
            serde_json::from_str(r#"{"post_id": 42, "floor_id": 7, "created_at": 1500}"#).unwrap();
        assert_eq!(record.post_id.as_deref(), Some("42"));
        assert_eq!(record.floor_id.as_deref(), Some("7"));
        assert_eq!(record.created_at, 1500);
    }

    #[test]
    fn test_record_with_string_ids() {
        let record: HistoryRecord =
            serde_json::from_str(r#"{"post_id": "42", "floor_id": "7", "created_at": 1500}"#)
                .unwrap();
        assert_eq!(record.post_id.as_deref(), Some("42"));
        assert_eq!(record.floor_id.as_deref(), Some("7"));
    }

    #[test]
    fn test_record_with_missing_fields() {
        let record: HistoryRecord = serde_json::from_str(r#"{"post_id": ""}"#).unwrap();
        assert_eq!(record.post_id, None);
        assert_eq!(record.floor_id, None);
        assert_eq!(record.created_at, 0);
    }

    #[test]
    fn test_response_without_comments_array() {
        let body: CommentListResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(body.comments.is_none());

        let body: CommentListResponse = serde_json::from_str(r#"{"comments": []}"#).unwrap();
        assert_eq!(body.comments.unwrap().len(), 0);
    }
}
