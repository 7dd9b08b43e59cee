// ==========================================
// 库存查询工具 - 商品领域模型
// ==========================================
// 职责: 商品记录 / 原始行 / 导入汇总
// 红线: code 为唯一主键；stock 恒为非负整数
// ==========================================

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ==========================================
// Product - 商品记录（唯一实体）
// ==========================================
// 用途: 导入层写入，检索引擎只读
// 对齐: products 表 / Firestore products 集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub code: String,        // 商品编码（主键，已 trim，非空）
    pub description: String, // 描述（已 trim，非空）
    pub location: String,    // 存放位置（可为空，表示未知）
    pub stock: u32,          // 库存数量
}

impl Product {
    pub fn new(
        code: impl Into<String>,
        description: impl Into<String>,
        location: impl Into<String>,
        stock: u32,
    ) -> Self {
        Self {
            code: code.into(),
            description: description.into(),
            location: location.into(),
            stock,
        }
    }

    /// 位置是否未知
    pub fn has_location(&self) -> bool {
        !self.location.is_empty()
    }

    pub fn stock_status(&self) -> StockStatus {
        StockStatus::from_stock(self.stock)
    }
}

// ==========================================
// StockStatus - 库存状态分级
// ==========================================
// 规则: > 10 充足 / 1..=10 偏低 / 0 缺货
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StockStatus {
    InStock,
    Low,
    OutOfStock,
}

impl StockStatus {
    /// 低库存阈值（含）
    pub const LOW_STOCK_THRESHOLD: u32 = 10;

    pub fn from_stock(stock: u32) -> Self {
        if stock > Self::LOW_STOCK_THRESHOLD {
            StockStatus::InStock
        } else if stock > 0 {
            StockStatus::Low
        } else {
            StockStatus::OutOfStock
        }
    }
}

// ==========================================
// RawRow - 表格原始行
// ==========================================
// 说明: 保留列顺序（表头 → 单元格文本），同名别名按出现顺序解析
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: Vec<(String, String)>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = (K, V)>,
    {
        Self {
            cells: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn push(&mut self, header: impl Into<String>, value: impl Into<String>) {
        self.cells.push((header.into(), value.into()));
    }

    /// 精确按表头取值（第一个匹配列）
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.cells.iter().map(|(h, v)| (h.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// 所有单元格均为空白
    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(|(_, v)| v.trim().is_empty())
    }
}

// ==========================================
// ImportSummary - 一次导入（一代数据）的汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportSummary {
    pub batch_id: String,          // 导入批次 ID（uuid v4）
    pub file_name: String,         // 源文件名
    pub total_rows: usize,         // 解析出的数据行数
    pub imported: usize,           // 实际落库记录数（按 code 去重后）
    pub dropped_rows: usize,       // 因 code/description 为空被丢弃的行数
    pub duplicate_codes: usize,    // 同批次重复 code 数（后者覆盖前者）
    pub imported_at: DateTime<Utc>,
    pub elapsed_ms: i64,
}
