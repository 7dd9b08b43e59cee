// ==========================================
// 库存查询工具 - 导入层
// ==========================================
// 职责: 表格文件 → 商品记录 → 整体替换落库
// 支持: Excel, ODS, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod product_importer_impl;
pub mod product_importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{ProductNormalizer, EXPECTED_COLUMNS};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use product_importer_impl::ProductImporterImpl;

// 重导出 Trait 接口
pub use product_importer_trait::{DataCleaner, FileParser, ProductImporter, RecordNormalizer};
