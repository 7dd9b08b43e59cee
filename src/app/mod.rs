// ==========================================
// 库存查询工具 - 应用层
// ==========================================
// 职责: 组装存储与 API，供展示层（不在本 crate 内）调用
// ==========================================

pub mod state;

// 重导出
pub use state::{get_default_db_path, AppState};
