// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 临时数据库、夹具路径、等值检索的内存存储替身
// ==========================================

#![allow(dead_code)]

use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use stock_lens::repository::{
    dedupe_by_code, FieldFilter, MatchMode, ProductStore, RepositoryError, RepositoryResult,
    SqliteProductStore,
};
use stock_lens::Product;
use tempfile::TempDir;

/// 创建临时 SQLite 存储
///
/// # 返回
/// - TempDir: 临时目录（需要保持存活）
/// - String: 数据库文件路径
/// - Arc<dyn ProductStore>: 已建表的存储
pub fn create_test_store() -> (TempDir, String, Arc<dyn ProductStore>) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("stock_lens.db").to_string_lossy().to_string();
    let store = SqliteProductStore::new(&db_path).expect("Failed to create SqliteProductStore");
    (dir, db_path, Arc::new(store))
}

/// 夹具文件路径
pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn product(code: &str, description: &str, location: &str, stock: u32) -> Product {
    Product::new(code, description, location, stock)
}

// ==========================================
// EqualityOnlyStore - 仅支持字段等值过滤的内存存储
// ==========================================
// 行为对齐远端文档存储：原生检索大小写敏感、整值相等
#[derive(Default)]
pub struct EqualityOnlyStore {
    products: Mutex<Vec<Product>>,
}

#[async_trait]
impl ProductStore for EqualityOnlyStore {
    fn backend_name(&self) -> &'static str {
        "memory-exact"
    }

    fn match_mode(&self) -> MatchMode {
        MatchMode::Exact
    }

    async fn replace_all(&self, products: Vec<Product>) -> RepositoryResult<usize> {
        let (products, _) = dedupe_by_code(products);
        let mut guard = self
            .products
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        *guard = products;
        Ok(guard.len())
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Product>> {
        let guard = self
            .products
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Ok(self.get_all().await?.len())
    }

    async fn find_by_fields(&self, filter: &FieldFilter) -> RepositoryResult<Vec<Product>> {
        Ok(self
            .get_all()
            .await?
            .into_iter()
            .filter(|p| filter.matches(p))
            .collect())
    }
}

// ==========================================
// UnavailableStore - 模拟网络中断的存储
// ==========================================
pub struct UnavailableStore;

#[async_trait]
impl ProductStore for UnavailableStore {
    fn backend_name(&self) -> &'static str {
        "unavailable"
    }

    fn match_mode(&self) -> MatchMode {
        MatchMode::Exact
    }

    async fn replace_all(&self, _products: Vec<Product>) -> RepositoryResult<usize> {
        Err(RepositoryError::RemoteRequestError("connection refused".to_string()))
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Product>> {
        Err(RepositoryError::RemoteRequestError("connection refused".to_string()))
    }

    async fn count(&self) -> RepositoryResult<usize> {
        Err(RepositoryError::RemoteRequestError("connection refused".to_string()))
    }

    async fn find_by_fields(&self, _filter: &FieldFilter) -> RepositoryResult<Vec<Product>> {
        Err(RepositoryError::RemoteRequestError("connection refused".to_string()))
    }
}
