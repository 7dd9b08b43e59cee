// ==========================================
// 库存查询工具 - 应用状态
// ==========================================
// 职责: 应用启动时显式构建一次存储实例，并注入到 API
// 说明: 不使用全局可变单例；会话内不支持重新初始化
// ==========================================

use std::sync::Arc;

use crate::api::ProductApi;
use crate::config::{AppConfig, BackendKind, ConfigError};
use crate::repository::{FirestoreProductStore, ProductStore, RepositoryError, SqliteProductStore};

pub use crate::config::default_db_path as get_default_db_path;

/// 应用状态
///
/// 持有唯一的存储实例与 API 实例，生命周期与应用一致
pub struct AppState {
    /// 启动配置
    pub config: AppConfig,

    /// 商品存储（SQLite 或 Firestore）
    pub store: Arc<dyn ProductStore>,

    /// 商品API
    pub product_api: Arc<ProductApi>,
}

impl AppState {
    /// 按配置创建AppState
    ///
    /// # 返回
    /// - Ok(AppState): 应用状态实例
    /// - Err(String): 初始化错误（配置缺失 / 数据库无法打开）
    pub fn new(config: AppConfig) -> Result<Self, String> {
        tracing::info!(backend = ?config.backend, "初始化AppState");

        crate::i18n::set_locale(&config.locale);

        let store: Arc<dyn ProductStore> = match config.backend {
            BackendKind::Sqlite => {
                tracing::info!("使用数据库: {}", config.db_path);
                Arc::new(
                    SqliteProductStore::new(&config.db_path)
                        .map_err(|e| format!("无法创建SqliteProductStore: {}", e))?,
                )
            }
            BackendKind::Firestore => {
                let firestore = config
                    .firestore
                    .clone()
                    .ok_or_else(|| ConfigError::MissingVar("FIREBASE_PROJECT_ID".to_string()).to_string())?;
                Arc::new(
                    FirestoreProductStore::new(firestore)
                        .map_err(|e: RepositoryError| format!("无法创建FirestoreProductStore: {}", e))?,
                )
            }
        };

        Ok(Self::with_store(config, store))
    }

    /// 从环境变量加载配置并创建
    pub fn from_env() -> Result<Self, String> {
        let config = AppConfig::from_env().map_err(|e| format!("配置加载失败: {}", e))?;
        Self::new(config)
    }

    /// 使用已构建的存储创建（测试 / 自定义后端）
    pub fn with_store(config: AppConfig, store: Arc<dyn ProductStore>) -> Self {
        let product_api = Arc::new(ProductApi::new(store.clone(), config.search_mode));
        tracing::info!(backend = store.backend_name(), "AppState初始化成功");
        Self {
            config,
            store,
            product_api,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{config_keys, SearchMode};
    use crate::i18n::LOCALE_TEST_LOCK;

    #[test]
    fn test_new_sqlite_state() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("stock.db").to_string_lossy().to_string();
        let config = AppConfig::from_lookup(|key| match key {
            config_keys::DB_PATH => Some(db_path.clone()),
            _ => None,
        })
        .unwrap();

        let state = AppState::new(config).unwrap();
        assert_eq!(state.store.backend_name(), "sqlite");
        assert_eq!(state.product_api.backend_name(), "sqlite");
    }

    #[test]
    fn test_firestore_without_settings_fails() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        let config = AppConfig {
            backend: BackendKind::Firestore,
            db_path: "unused.db".to_string(),
            search_mode: SearchMode::Substring,
            locale: "es".to_string(),
            firestore: None,
        };
        assert!(AppState::new(config).is_err());
    }
}
