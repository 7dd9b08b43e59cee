// ==========================================
// 商品 API
// ==========================================
// 职责: 面向展示层的导入 / 检索 / 计数入口
// 说明: 所有错误在此归类并转为用户提示，不向上抛出未处理异常；不做自动重试
// ==========================================

use crate::api::error::{ApiError, ApiResult, Notification, NotificationKind};
use crate::config::SearchMode;
use crate::domain::product::{ImportSummary, Product, StockStatus};
use crate::engine::search::SearchEngine;
use crate::i18n::{stock_status_label, t, t_with_args};
use crate::importer::{ProductImporter, ProductImporterImpl};
use crate::repository::product_store::{MatchMode, ProductStore};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportApiResponse {
    /// 导入汇总
    pub summary: ImportSummary,
    /// 导入后存储中的记录数
    pub total_in_store: usize,
    /// 成功提示
    pub notification: Notification,
}

/// 商品展示视图
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductView {
    #[serde(flatten)]
    pub product: Product,
    pub stock_status: StockStatus,
    pub stock_label: String,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        let stock_status = product.stock_status();
        Self {
            product,
            stock_status,
            stock_label: stock_status_label(stock_status),
        }
    }
}

/// 检索响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub products: Vec<ProductView>,
    pub total: usize,
    pub match_mode: MatchMode,
}

/// 商品API
pub struct ProductApi {
    store: Arc<dyn ProductStore>,
    importer: Box<dyn ProductImporter>,
    search_engine: SearchEngine,
}

impl ProductApi {
    /// 创建新的ProductApi实例
    ///
    /// # 参数
    /// - store: 已初始化的商品存储（由 AppState 持有并注入）
    /// - search_mode: 检索匹配策略
    pub fn new(store: Arc<dyn ProductStore>, search_mode: SearchMode) -> Self {
        Self {
            importer: Box::new(ProductImporterImpl::new(store.clone())),
            search_engine: SearchEngine::new(store.clone(), search_mode),
            store,
        }
    }

    /// 导入商品文件（破坏性：整体替换现有数据）
    ///
    /// # 返回
    /// - Ok(ImportApiResponse): 导入结果与成功提示
    /// - Err(ApiError): ParseError / ValidationError / PersistenceError
    pub async fn import_file<P: AsRef<Path>>(&self, file_path: P) -> ApiResult<ImportApiResponse> {
        let path = file_path.as_ref();

        let summary = self.importer.import_file(path).await.map_err(|e| {
            error!(file = %path.display(), error = %e, "导入失败");
            ApiError::from(e)
        })?;

        // 计数刷新失败不影响导入结果
        let total_in_store = match self.store.count().await {
            Ok(n) => n,
            Err(e) => {
                warn!(error = %e, "导入后计数刷新失败，使用导入数量");
                summary.imported
            }
        };

        let notification = Notification {
            kind: NotificationKind::Success,
            title: t("import.success_title"),
            message: t_with_args("import.success", &[("count", summary.imported.to_string().as_str())]),
        };

        info!(
            batch_id = %summary.batch_id,
            imported = summary.imported,
            total_in_store,
            "导入API完成"
        );

        Ok(ImportApiResponse {
            summary,
            total_in_store,
            notification,
        })
    }

    /// 检索商品
    ///
    /// 读取失败返回 SearchError，可与“无结果”区分
    pub async fn search(&self, code_query: &str, description_query: &str) -> ApiResult<SearchResponse> {
        let products = self
            .search_engine
            .search(code_query, description_query)
            .await
            .map_err(|e| {
                error!(error = %e, "检索失败");
                ApiError::SearchError(e.to_string())
            })?;

        let products: Vec<ProductView> = products.into_iter().map(ProductView::from).collect();
        Ok(SearchResponse {
            total: products.len(),
            products,
            match_mode: self.search_engine.effective_match_mode(),
        })
    }

    /// 检索商品（失败视为无结果，仅记录告警）
    pub async fn search_or_empty(&self, code_query: &str, description_query: &str) -> Vec<ProductView> {
        match self.search(code_query, description_query).await {
            Ok(response) => response.products,
            Err(e) => {
                warn!(error = %e, "检索失败，按无结果处理");
                Vec::new()
            }
        }
    }

    /// 商品总数
    pub async fn count(&self) -> ApiResult<usize> {
        self.store.count().await.map_err(|e| {
            error!(error = %e, "计数失败");
            ApiError::SearchError(e.to_string())
        })
    }

    /// 当前后端名称
    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::sqlite_store::SqliteProductStore;
    use std::io::Write;

    fn api() -> ProductApi {
        let store: Arc<dyn ProductStore> = Arc::new(SqliteProductStore::in_memory().unwrap());
        ProductApi::new(store, SearchMode::Substring)
    }

    fn csv_file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[tokio::test]
    async fn test_import_then_search() {
        let api = api();
        let file = csv_file("codigo,descripcion,ubicacion,stock\nB2,Tuerca hexagonal,P1,5\nA1,Tornillo,,15\n");

        let response = api.import_file(file.path()).await.unwrap();
        assert_eq!(response.summary.imported, 2);
        assert_eq!(response.total_in_store, 2);
        assert_eq!(response.notification.kind, NotificationKind::Success);

        let found = api.search("", "hexagonal").await.unwrap();
        assert_eq!(found.total, 1);
        assert_eq!(found.products[0].product.code, "B2");
        assert_eq!(found.products[0].stock_status, StockStatus::Low);

        assert!(api.search("B9", "").await.unwrap().products.is_empty());
    }

    #[tokio::test]
    async fn test_header_only_file_is_validation_error() {
        let api = api();
        let file = csv_file("codigo,descripcion,ubicacion,stock\n");

        let err = api.import_file(file.path()).await.unwrap_err();
        assert!(matches!(err, ApiError::ValidationError(_)));
        assert_eq!(api.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_file_is_parse_error() {
        let api = api();
        let err = api.import_file("/no/existe/inventario.xlsx").await.unwrap_err();
        assert!(matches!(err, ApiError::ParseError(_)));
    }
}
