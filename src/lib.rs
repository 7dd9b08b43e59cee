// ==========================================
// 库存查询工具 - 核心库
// ==========================================
// 技术栈: Rust + SQLite / Firestore
// 系统定位: 商品库存导入与检索（展示层不在本 crate 内）
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "es");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 实体与类型
pub mod domain;

// 数据仓储层 - 存储后端
pub mod repository;

// 引擎层 - 检索
pub mod engine;

// 导入层 - 外部文件
pub mod importer;

// 配置层 - 环境变量
pub mod config;

// 数据库基础设施（连接初始化/PRAGMA 统一）
pub mod db;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 展示层调用入口
pub mod api;

// 应用层 - 状态组装
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域实体
pub use domain::{ImportSummary, Product, RawRow, StockStatus};

// 存储
pub use repository::{
    FieldFilter, FirestoreProductStore, MatchMode, ProductStore, RepositoryError,
    SqliteProductStore,
};

// 引擎
pub use engine::{SearchEngine, SearchQuery};

// 导入
pub use importer::{ImportError, ProductImporter, ProductImporterImpl};

// 配置
pub use config::{AppConfig, BackendKind, SearchMode};

// API
pub use api::{ApiError, ProductApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "Stock Lens";
