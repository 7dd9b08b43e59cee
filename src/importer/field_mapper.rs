// ==========================================
// 库存查询工具 - 字段映射器（商品归一化）
// ==========================================
// 职责: 源表头 → 标准字段映射 + 类型转换
// 规则: 每个标准字段一组有序别名，按别名顺序取第一个非空值
// ==========================================

use crate::domain::product::{Product, RawRow};
use crate::importer::data_cleaner::DataCleaner as DataCleanerImpl;
use crate::importer::product_importer_trait::{DataCleaner, RecordNormalizer};

// ==========================================
// 标准字段与别名（均为归一化后的形式）
// ==========================================
pub const CODE_ALIASES: &[&str] = &["codigo"];
pub const DESCRIPTION_ALIASES: &[&str] = &["descripcion"];
pub const LOCATION_ALIASES: &[&str] = &["ubicacion", "deposito", "ubic"];
pub const STOCK_ALIASES: &[&str] = &["stock"];

/// 提示用户的必需列
pub const EXPECTED_COLUMNS: &str = "codigo, descripcion, ubicacion, stock";

pub struct ProductNormalizer {
    cleaner: Box<dyn DataCleaner>,
}

impl Default for ProductNormalizer {
    fn default() -> Self {
        Self::new(Box::new(DataCleanerImpl))
    }
}

impl ProductNormalizer {
    pub fn new(cleaner: Box<dyn DataCleaner>) -> Self {
        Self { cleaner }
    }

    /// 按别名顺序查找第一个非空值（已 trim）
    ///
    /// 同一别名命中多列时按列顺序
    fn lookup(&self, folded: &[(String, &str)], aliases: &[&str]) -> Option<String> {
        aliases.iter().find_map(|alias| {
            folded
                .iter()
                .filter(|(header, _)| header == alias)
                .map(|(_, value)| self.cleaner.clean_text(value))
                .find(|value| !value.is_empty())
        })
    }
}

impl RecordNormalizer for ProductNormalizer {
    fn normalize_row(&self, row: &RawRow) -> Option<Product> {
        let folded: Vec<(String, &str)> = row
            .iter()
            .map(|(header, value)| (self.cleaner.fold_header(header), value))
            .collect();

        let code = self.lookup(&folded, CODE_ALIASES)?;
        let description = self.lookup(&folded, DESCRIPTION_ALIASES)?;
        let location = self.lookup(&folded, LOCATION_ALIASES).unwrap_or_default();
        let stock = self
            .lookup(&folded, STOCK_ALIASES)
            .map(|v| self.cleaner.coerce_stock(&v))
            .unwrap_or(0);

        Some(Product {
            code,
            description,
            location,
            stock,
        })
    }
}
