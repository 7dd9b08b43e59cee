// ==========================================
// 库存查询工具 - 检索引擎
// ==========================================
// 职责: 按编码 / 描述检索商品
// 规则:
// - 两个条件都为空 → 返回全部
// - 两个条件都非空 → AND（交集，不是并集）
// - Substring: 大小写不敏感子串匹配（客户端过滤）
// - Exact: 后端字段等值过滤（大小写敏感）
// - 不排序、不截断
// ==========================================

use crate::config::SearchMode;
use crate::domain::product::Product;
use crate::repository::error::RepositoryResult;
use crate::repository::product_store::{FieldFilter, MatchMode, ProductStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

// ==========================================
// SearchQuery - 检索条件
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub code: String,
    pub description: String,
}

impl SearchQuery {
    /// 原样保留输入：仅空串表示不限，空白字符也作为匹配条件
    pub fn new(code: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty() && self.description.is_empty()
    }

    /// 大小写不敏感子串匹配（AND）
    pub fn matches_substring(&self, product: &Product) -> bool {
        contains_ignore_case(&product.code, &self.code)
            && contains_ignore_case(&product.description, &self.description)
    }

    fn to_field_filter(&self) -> FieldFilter {
        let non_empty = |s: &str| (!s.is_empty()).then(|| s.to_string());
        FieldFilter {
            code: non_empty(&self.code),
            description: non_empty(&self.description),
        }
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    needle.is_empty() || haystack.to_lowercase().contains(&needle.to_lowercase())
}

// ==========================================
// SearchEngine
// ==========================================
pub struct SearchEngine {
    store: Arc<dyn ProductStore>,
    mode: SearchMode,
}

impl SearchEngine {
    pub fn new(store: Arc<dyn ProductStore>, mode: SearchMode) -> Self {
        Self { store, mode }
    }

    /// 实际生效的匹配方式
    pub fn effective_match_mode(&self) -> MatchMode {
        match self.mode {
            SearchMode::Substring => MatchMode::Substring,
            SearchMode::Native => self.store.match_mode(),
        }
    }

    /// 检索商品
    ///
    /// # 参数
    /// - code_query: 编码条件（空串表示不限）
    /// - description_query: 描述条件（空串表示不限）
    pub async fn search(
        &self,
        code_query: &str,
        description_query: &str,
    ) -> RepositoryResult<Vec<Product>> {
        self.search_query(&SearchQuery::new(code_query, description_query))
            .await
    }

    pub async fn search_query(&self, query: &SearchQuery) -> RepositoryResult<Vec<Product>> {
        let match_mode = self.effective_match_mode();
        debug!(code = %query.code, description = %query.description, ?match_mode, "开始检索");

        let results = if query.is_empty() {
            self.store.get_all().await?
        } else {
            match match_mode {
                MatchMode::Substring => self
                    .store
                    .get_all()
                    .await?
                    .into_iter()
                    .filter(|p| query.matches_substring(p))
                    .collect(),
                MatchMode::Exact => self.store.find_by_fields(&query.to_field_filter()).await?,
            }
        };

        info!(hits = results.len(), backend = self.store.backend_name(), "检索完成");
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substring_match_is_case_insensitive() {
        let product = Product::new("ABC-123", "Tuerca Hexagonal", "P1", 5);

        assert!(SearchQuery::new("abc", "").matches_substring(&product));
        assert!(SearchQuery::new("", "HEXAGONAL").matches_substring(&product));
        assert!(SearchQuery::new("c-1", "tuerca").matches_substring(&product));
        assert!(!SearchQuery::new("abc", "tornillo").matches_substring(&product));
    }

    #[test]
    fn test_whitespace_query_is_a_filter() {
        let query = SearchQuery::new(" ", "");
        assert!(!query.is_empty());
        assert!(query.matches_substring(&Product::new("A 1", "Tornillo", "", 1)));
        assert!(!query.matches_substring(&Product::new("B2", "Tuerca", "", 1)));
        assert_eq!(
            query.to_field_filter(),
            FieldFilter {
                code: Some(" ".to_string()),
                description: None
            }
        );
    }
}
