// ==========================================
// 库存查询工具 - 领域模型层
// ==========================================
// 职责: 定义领域实体与值对象
// 红线: 不含数据访问逻辑,不含检索逻辑
// ==========================================

pub mod product;

// 重导出核心类型
pub use product::{ImportSummary, Product, RawRow, StockStatus};
