//! 回帖记录查询
//!
//! 展示层渲染帖子列表时用到的只读查询：某帖是否回复过、回复过哪些楼层，
//! 以及楼层跳转链接的计算。纯读取，不触网，不写存储。

use std::sync::Arc;

use crate::storage::ReplyStore;

/// NodeSeek 每页展示的楼层数
pub const FLOORS_PER_PAGE: u64 = 10;

/// 回帖记录查询门面
pub struct ReplyQuery {
    store: Arc<ReplyStore>,
}

impl ReplyQuery {
    /// 创建查询门面
    pub fn new(store: Arc<ReplyStore>) -> Self {
        Self { store }
    }

    /// 当前用户是否在该帖回复过
    pub async fn is_replied(&self, post_id: &str) -> bool {
        !self.floors(post_id).await.is_empty()
    }

    /// 该帖中当前用户回复过的楼层（升序），没有则为空
    pub async fn floors(&self, post_id: &str) -> Vec<u64> {
        self.store
            .all_replies()
            .await
            .remove(post_id)
            .unwrap_or_default()
    }
}

/// 楼层所在的页码
pub fn floor_page(floor_id: u64) -> u64 {
    floor_id.div_ceil(FLOORS_PER_PAGE).max(1)
}

/// 楼层跳转链接，形如 `/post-42-2#13`
pub fn floor_jump_link(post_id: &str, floor_id: u64) -> String {
    format!("/post-{}-{}#{}", post_id, floor_page(floor_id), floor_id)
}
