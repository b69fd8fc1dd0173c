//! 快捷回复数据与分列算法
//!
//! 内置的常用回复分类，以及把分类分配到 N 列、使各列视觉高度尽可能
//! 相等的贪心平衡算法。渲染交给宿主，这里只负责数据与分组。

use serde::{Deserialize, Serialize};

/// 一个快捷回复分类
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuickReplyCategory {
    pub id: String,
    pub title: String,
    pub items: Vec<String>,
}

impl QuickReplyCategory {
    fn new(id: &str, title: &str, items: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            items: items.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// 视觉权重：标题按 2 行算，每条内容 1 行
    pub fn weight(&self) -> usize {
        self.items.len() + 2
    }
}

/// 内置快捷回复分类（顺序不重要，分列时会按高度平衡重排）
pub fn preset_categories() -> Vec<QuickReplyCategory> {
    vec![
        QuickReplyCategory::new(
            "lottery",
            "🎉 抽奖专用",
            &[
                "分母参与，谢谢楼主！",
                "参与抽奖，分母 +1。",
                "万一中了呢？感谢老板。",
                "重在参与，分母在此。",
                "老板大气，加个鸡腿！",
                "支持福利，老板发大财。",
                "老板太慷慨了，顶一下！",
                "吸吸欧气，希望这次能中。",
                "在此处留下我的欧气，期待中奖。",
                "虽然没中过，但还是要试试，感谢分享。",
                "分母也有梦想，冲冲冲！",
            ],
        ),
        QuickReplyCategory::new(
            "daily",
            "🌊 日常水贴",
            &[
                "路过看看，顺便混个鸡腿。",
                "吃瓜群众，前排围观。",
                "插个眼，持续关注。",
                "确实，我也这么觉得。",
                "你说得对，但我选择观望。",
                "学到了，又涨了奇怪的知识。",
                "虽然看不懂，但感觉很厉害的样子。",
                "生命在于折腾，大佬继续。",
                "买鸡一时爽，吃灰一辈子。",
                "这就是大佬的世界吗？告辞。",
                "现在的 MJJ 越来越卷了。",
                "又被你水到了...",
            ],
        ),
        QuickReplyCategory::new(
            "common",
            "🚀 快速简短",
            &["BD", "来了老哥。", "路过帮顶。", "火钳刘明。"],
        ),
        QuickReplyCategory::new(
            "info",
            "📡 情报",
            &[
                "谢谢分享！",
                "感谢楼主分享，收藏了。",
                "前排围观，感谢大佬情报！",
                "马克一下，以后肯定用得着。",
            ],
        ),
        QuickReplyCategory::new(
            "review",
            "📝 测评",
            &[
                "性价比很高，值得购买。",
                "已入一台，性能确实不错。",
                "蹲一个测评，看看线路稳不稳。",
                "价格不错，可惜没有需求，让给有缘人。",
                "手慢无，已经断货了。",
            ],
        ),
        QuickReplyCategory::new(
            "tech",
            "💻 技术",
            &[
                "很详细的教程，加个鸡腿。",
                "技术大牛，分析得很透彻。",
                "支持原创，NodeSeek 有你更精彩！",
                "测评辛苦了，参考价值很高。",
            ],
        ),
        QuickReplyCategory::new(
            "trade",
            "💸 交易/拼车",
            &[
                "帮顶，祝早出。",
                "排队，如果还没出请私信我。",
                "借楼同求，收一个同样的配置。",
                "诚心要，PM 一个联系方式。",
            ],
        ),
    ]
}

/// 把分类分配到 `column_count` 列，使各列高度尽可能相等
///
/// 贪心策略：按权重从大到小排序，依次放进当前最矮的一列。
pub fn balanced_columns(
    categories: &[QuickReplyCategory],
    column_count: usize,
) -> Vec<Vec<QuickReplyCategory>> {
    let column_count = column_count.max(1);

    let mut weighted: Vec<&QuickReplyCategory> = categories.iter().collect();
    weighted.sort_by(|a, b| b.weight().cmp(&a.weight()));

    let mut columns: Vec<Vec<QuickReplyCategory>> = vec![Vec::new(); column_count];
    let mut totals = vec![0usize; column_count];

    for category in weighted {
        let mut min_col = 0;
        for (i, &total) in totals.iter().enumerate().skip(1) {
            if total < totals[min_col] {
                min_col = i;
            }
        }
        columns[min_col].push(category.clone());
        totals[min_col] += category.weight();
    }

    columns
}

#[cfg(test)]
mod tests {
    use super::*;

    fn category(id: &str, item_count: usize) -> QuickReplyCategory {
        QuickReplyCategory {
            id: id.to_string(),
            title: id.to_string(),
            items: (0..item_count).map(|i| format!("item {}", i)).collect(),
        }
    }

    #[test]
    fn test_weight_counts_title_as_two_rows() {
        assert_eq!(category("a", 3).weight(), 5);
        assert_eq!(category("b", 0).weight(), 2);
    }

    #[test]
    fn test_balanced_columns_greedy_assignment() {
        // 权重 5/4/3/2 分两列：先放大的，之后每次放进最矮列
        let cats = vec![
            category("a", 3),
            category("b", 2),
            category("c", 1),
            category("d", 0),
        ];
        let columns = balanced_columns(&cats, 2);

        let ids: Vec<Vec<&str>> = columns
            .iter()
            .map(|col| col.iter().map(|c| c.id.as_str()).collect())
            .collect();
        assert_eq!(ids, vec![vec!["a", "d"], vec!["b", "c"]]);

        let heights: Vec<usize> = columns
            .iter()
            .map(|col| col.iter().map(|c| c.weight()).sum())
            .collect();
        assert_eq!(heights, vec![7, 7]);
    }

    #[test]
    fn test_balanced_columns_preserve_all_categories() {
        let cats = preset_categories();
        let columns = balanced_columns(&cats, 3);

        assert_eq!(columns.len(), 3);
        let total: usize = columns.iter().map(|c| c.len()).sum();
        assert_eq!(total, cats.len());

        let mut ids: Vec<String> = columns
            .iter()
            .flatten()
            .map(|c| c.id.clone())
            .collect();
        ids.sort();
        let mut expected: Vec<String> = cats.iter().map(|c| c.id.clone()).collect();
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_zero_columns_degrades_to_one() {
        let cats = preset_categories();
        let columns = balanced_columns(&cats, 0);
        assert_eq!(columns.len(), 1);
        assert_eq!(columns[0].len(), cats.len());
    }
}
