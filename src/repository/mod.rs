// ==========================================
// 库存查询工具 - 数据仓储层
// ==========================================
// 红线: Repository 不含检索规则
// ==========================================
// 职责: 提供商品存储接口,屏蔽后端细节
// 约束: SQLite 查询使用参数化,防止 SQL 注入
// ==========================================

pub mod error;
pub mod firestore_store;
pub mod product_store;
pub mod sqlite_store;

// 重导出
pub use error::{RepositoryError, RepositoryResult};
pub use firestore_store::FirestoreProductStore;
pub use product_store::{dedupe_by_code, FieldFilter, MatchMode, ProductStore};
pub use sqlite_store::SqliteProductStore;
