// ==========================================
// 库存查询工具 - 引擎层
// ==========================================
// 职责: 检索规则（依赖 ProductStore 接口，不依赖具体后端）
// ==========================================

pub mod search;

// 重导出
pub use search::{SearchEngine, SearchQuery};
