// ==========================================
// 库存查询工具 - 商品导入器实现
// ==========================================
// 职责: 整合导入流程，从文件到存储
// 流程: 解析 → 归一化 → 空结果拦截 → 整体替换
// 红线: 导入为破坏性操作，成功即完全取代上一代数据
// ==========================================

use crate::domain::product::ImportSummary;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::{ProductNormalizer, EXPECTED_COLUMNS};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::product_importer_trait::{FileParser, ProductImporter, RecordNormalizer};
use crate::repository::product_store::ProductStore;
use chrono::Utc;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// ProductImporterImpl - 商品导入器实现
// ==========================================
pub struct ProductImporterImpl {
    // 存储（由调用方显式注入）
    store: Arc<dyn ProductStore>,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    normalizer: Box<dyn RecordNormalizer>,
}

impl ProductImporterImpl {
    /// 使用默认解析器与归一化器创建
    pub fn new(store: Arc<dyn ProductStore>) -> Self {
        Self::with_components(
            store,
            Box::new(UniversalFileParser),
            Box::new(ProductNormalizer::default()),
        )
    }

    /// 自定义组件创建
    pub fn with_components(
        store: Arc<dyn ProductStore>,
        file_parser: Box<dyn FileParser>,
        normalizer: Box<dyn RecordNormalizer>,
    ) -> Self {
        Self {
            store,
            file_parser,
            normalizer,
        }
    }
}

#[async_trait::async_trait]
impl ProductImporter for ProductImporterImpl {
    #[instrument(skip(self, file_path), fields(batch_id))]
    async fn import_file(&self, file_path: &Path) -> ImportResult<ImportSummary> {
        let start_time = Instant::now();
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());

        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| file_path.display().to_string());
        info!(file = %file_name, backend = self.store.backend_name(), "开始导入商品数据");

        // === 步骤 1: 解析文件 ===
        debug!("步骤 1: 解析文件");
        let raw_rows = self.file_parser.parse_to_raw_rows(file_path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        let total_rows = raw_rows.len();
        info!(total_rows, "文件解析完成");

        if let Some(first) = raw_rows.first() {
            let headers: Vec<&str> = first.iter().map(|(h, _)| h).collect();
            debug!(?headers, "表头列");
        }

        // === 步骤 2: 归一化 ===
        debug!("步骤 2: 归一化");
        let products = self.normalizer.normalize(&raw_rows);
        let dropped_rows = total_rows - products.len();
        if dropped_rows > 0 {
            warn!(dropped_rows, "存在缺少编码或描述的行，已丢弃");
        }

        // === 步骤 3: 空结果拦截（不写入，保留现有数据）===
        if products.is_empty() {
            warn!("未找到有效商品记录，放弃写入");
            return Err(ImportError::NoValidRecords {
                expected_columns: EXPECTED_COLUMNS.to_string(),
            });
        }

        let duplicate_codes = {
            let distinct: HashSet<&str> = products.iter().map(|p| p.code.as_str()).collect();
            products.len() - distinct.len()
        };
        if duplicate_codes > 0 {
            warn!(duplicate_codes, "同一文件存在重复编码，后者覆盖前者");
        }

        // === 步骤 4: 整体替换 ===
        debug!("步骤 4: 整体替换");
        let imported = self.store.replace_all(products).await.map_err(|e| {
            error!(error = %e, "商品数据写入失败");
            ImportError::Persistence(e)
        })?;

        let elapsed_ms = start_time.elapsed().as_millis() as i64;
        info!(imported, dropped_rows, elapsed_ms, "商品导入完成");

        Ok(ImportSummary {
            batch_id,
            file_name,
            total_rows,
            imported,
            dropped_rows,
            duplicate_codes,
            imported_at: Utc::now(),
            elapsed_ms,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::product::{Product, RawRow};
    use crate::repository::sqlite_store::SqliteProductStore;

    struct StaticParser(Vec<RawRow>);

    impl FileParser for StaticParser {
        fn parse_to_raw_rows(&self, _file_path: &Path) -> ImportResult<Vec<RawRow>> {
            Ok(self.0.clone())
        }
    }

    fn importer(store: Arc<dyn ProductStore>, rows: Vec<RawRow>) -> ProductImporterImpl {
        ProductImporterImpl::with_components(
            store,
            Box::new(StaticParser(rows)),
            Box::new(ProductNormalizer::default()),
        )
    }

    #[tokio::test]
    async fn test_import_drops_invalid_rows() {
        let store: Arc<dyn ProductStore> = Arc::new(SqliteProductStore::in_memory().unwrap());
        let rows = vec![
            RawRow::from_pairs(vec![("Codigo", "A1"), ("Descripcion", "Tornillo"), ("Stock", "15")]),
            RawRow::from_pairs(vec![("codigo", ""), ("descripcion", "x")]),
        ];

        let summary = importer(store.clone(), rows)
            .import_file(Path::new("inventario.xlsx"))
            .await
            .unwrap();

        assert_eq!(summary.total_rows, 2);
        assert_eq!(summary.imported, 1);
        assert_eq!(summary.dropped_rows, 1);
        assert_eq!(summary.file_name, "inventario.xlsx");
        assert_eq!(
            store.get_all().await.unwrap(),
            vec![Product::new("A1", "Tornillo", "", 15)]
        );
    }

    #[tokio::test]
    async fn test_empty_result_keeps_existing_data() {
        let store: Arc<dyn ProductStore> = Arc::new(SqliteProductStore::in_memory().unwrap());
        store
            .replace_all(vec![Product::new("OLD", "previo", "", 1)])
            .await
            .unwrap();

        let err = importer(store.clone(), Vec::new())
            .import_file(Path::new("vacio.xlsx"))
            .await
            .unwrap_err();

        assert!(err.is_validation_error());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_codes_counted() {
        let store: Arc<dyn ProductStore> = Arc::new(SqliteProductStore::in_memory().unwrap());
        let rows = vec![
            RawRow::from_pairs(vec![("codigo", "A"), ("descripcion", "uno")]),
            RawRow::from_pairs(vec![("codigo", "A"), ("descripcion", "dos")]),
        ];

        let summary = importer(store.clone(), rows)
            .import_file(Path::new("dup.csv"))
            .await
            .unwrap();

        assert_eq!(summary.duplicate_codes, 1);
        assert_eq!(summary.imported, 1);
    }
}
