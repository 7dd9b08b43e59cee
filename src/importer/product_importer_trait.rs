// ==========================================
// 库存查询工具 - 商品导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 流程: 解析 → 归一化 → 校验 → 整体替换
// ==========================================

use crate::domain::product::{ImportSummary, Product, RawRow};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// ProductImporter Trait
// ==========================================
// 用途: 商品导入主接口
// 实现者: ProductImporterImpl
#[async_trait]
pub trait ProductImporter: Send + Sync {
    /// 从表格文件导入商品数据（整体替换现有数据）
    ///
    /// # 参数
    /// - file_path: .xlsx/.xls/.ods/.csv 文件路径（仅读取第一个工作表）
    ///
    /// # 返回
    /// - Ok(ImportSummary): 导入汇总
    /// - Err(ImportError): 解析错误 / 无有效记录 / 写入失败
    ///
    /// # 导入流程
    /// 1. 解析第一个工作表（表头行作为键）
    /// 2. 归一化为 Product，丢弃 code/description 为空的行
    /// 3. 结果为空 → NoValidRecords（不写入，保留现有数据）
    /// 4. replace_all 落库
    async fn import_file(&self, file_path: &Path) -> ImportResult<ImportSummary>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录（表头 → 单元格文本，保留列顺序）
    ///
    /// 完全空白的行会被跳过
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// RecordNormalizer Trait
// ==========================================
// 用途: 原始行 → 商品记录
// 实现者: ProductNormalizer
pub trait RecordNormalizer: Send + Sync {
    /// 单行归一化；code 或 description 为空时返回 None
    fn normalize_row(&self, row: &RawRow) -> Option<Product>;

    /// 批量归一化，保持输入顺序
    fn normalize(&self, rows: &[RawRow]) -> Vec<Product> {
        rows.iter().filter_map(|row| self.normalize_row(row)).collect()
    }
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 值级清洗
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// 表头归一化（TRIM + 小写 + 去重音）
    fn fold_header(&self, header: &str) -> String;

    /// 文本字段清洗（TRIM）
    fn clean_text(&self, value: &str) -> String;

    /// 库存强制转换为非负整数
    fn coerce_stock(&self, value: &str) -> u32;
}
