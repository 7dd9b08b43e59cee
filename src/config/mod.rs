// ==========================================
// 库存查询工具 - 配置层
// ==========================================
// 职责: 启动配置（后端选择 / 数据库路径 / 检索策略 / 远端连接参数）
// 来源: 进程环境变量 + 可选 .env
// ==========================================

pub mod app_config;

// 重导出
pub use app_config::{
    config_keys, default_db_path, AppConfig, BackendKind, ConfigError, FirestoreConfig,
    SearchMode,
};
