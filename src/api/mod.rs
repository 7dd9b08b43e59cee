// ==========================================
// 库存查询工具 - API 层
// ==========================================
// 职责: 展示层调用入口；错误归类并转为用户提示
// ==========================================

pub mod error;
pub mod product_api;

// 重导出
pub use error::{ApiError, ApiResult, Notification, NotificationKind};
pub use product_api::{ImportApiResponse, ProductApi, ProductView, SearchResponse};
