// ==========================================
// 库存查询工具 - 商品存储 Trait
// ==========================================
// 职责: 定义商品存储接口（不包含实现）
// 红线: Repository 不含检索规则，只做整体替换 / 全量读取 / 计数 / 等值查询
// 实现者: SqliteProductStore（本地嵌入）、FirestoreProductStore（远端文档）
// ==========================================

use crate::domain::product::Product;
use crate::repository::error::RepositoryResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ==========================================
// MatchMode - 后端原生检索能力
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MatchMode {
    /// 客户端全量读取后做大小写不敏感的子串匹配
    Substring,
    /// 仅支持字段等值过滤（大小写敏感）
    Exact,
}

// ==========================================
// FieldFilter - 等值过滤条件
// ==========================================
// 说明: None 表示该字段不参与过滤；两者都有时为 AND
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldFilter {
    pub code: Option<String>,
    pub description: Option<String>,
}

impl FieldFilter {
    pub fn is_empty(&self) -> bool {
        self.code.is_none() && self.description.is_none()
    }

    /// 判断记录是否满足等值条件
    pub fn matches(&self, product: &Product) -> bool {
        let code_ok = self.code.as_deref().map_or(true, |c| product.code == c);
        let desc_ok = self
            .description
            .as_deref()
            .map_or(true, |d| product.description == d);
        code_ok && desc_ok
    }
}

// ==========================================
// ProductStore Trait
// ==========================================
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// 后端名称（日志/诊断用）
    fn backend_name(&self) -> &'static str;

    /// 后端原生检索能力
    fn match_mode(&self) -> MatchMode;

    /// 整体替换：清空后写入全部记录
    ///
    /// # 返回
    /// - Ok(usize): 替换后的记录数（按 code 去重，后者覆盖前者）
    /// - Err: 写入失败；是否残留旧数据由具体后端说明
    async fn replace_all(&self, products: Vec<Product>) -> RepositoryResult<usize>;

    /// 读取全部记录（按写入顺序）
    async fn get_all(&self) -> RepositoryResult<Vec<Product>>;

    /// 记录数
    async fn count(&self) -> RepositoryResult<usize>;

    /// 字段等值查询
    async fn find_by_fields(&self, filter: &FieldFilter) -> RepositoryResult<Vec<Product>>;
}

/// 按 code 去重，保留最后一次出现的值，位置取第一次出现处
///
/// 返回 (去重后的记录, 被覆盖的重复数)
pub fn dedupe_by_code(products: Vec<Product>) -> (Vec<Product>, usize) {
    let mut index: std::collections::HashMap<String, usize> = std::collections::HashMap::new();
    let mut unique: Vec<Product> = Vec::with_capacity(products.len());
    let mut duplicates = 0;

    for product in products {
        match index.get(&product.code) {
            Some(&pos) => {
                unique[pos] = product;
                duplicates += 1;
            }
            None => {
                index.insert(product.code.clone(), unique.len());
                unique.push(product);
            }
        }
    }

    (unique, duplicates)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_filter_and_semantics() {
        let p = Product::new("B2", "Tuerca hexagonal", "P1", 5);

        let both = FieldFilter {
            code: Some("B2".to_string()),
            description: Some("Tuerca hexagonal".to_string()),
        };
        assert!(both.matches(&p));

        let wrong_desc = FieldFilter {
            code: Some("B2".to_string()),
            description: Some("Tuerca".to_string()),
        };
        assert!(!wrong_desc.matches(&p));

        // 等值匹配大小写敏感
        let lower = FieldFilter {
            code: Some("b2".to_string()),
            description: None,
        };
        assert!(!lower.matches(&p));

        assert!(FieldFilter::default().matches(&p));
    }

    #[test]
    fn test_dedupe_by_code_last_write_wins() {
        let input = vec![
            Product::new("A", "first", "", 1),
            Product::new("B", "only", "", 2),
            Product::new("A", "second", "", 3),
        ];

        let (unique, duplicates) = dedupe_by_code(input);

        assert_eq!(duplicates, 1);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].code, "A");
        assert_eq!(unique[0].description, "second");
        assert_eq!(unique[1].code, "B");
    }
}
