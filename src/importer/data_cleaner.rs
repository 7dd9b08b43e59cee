// ==========================================
// 库存查询工具 - 数据清洗器实现
// ==========================================
// 职责: 表头归一化（TRIM / 小写 / 去重音） + 文本清洗 + 库存数值强制转换
// ==========================================

use crate::importer::product_importer_trait::DataCleaner as DataCleanerTrait;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn fold_header(&self, header: &str) -> String {
        fold_header(header)
    }

    fn clean_text(&self, value: &str) -> String {
        value.trim().to_string()
    }

    fn coerce_stock(&self, value: &str) -> u32 {
        coerce_stock(value)
    }
}

/// 表头归一化: "CÓDIGO " → "codigo"
pub fn fold_header(header: &str) -> String {
    header
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
}

/// 库存强制转换
///
/// - 非数字 / 非有限值 / 空 → 0
/// - 负数 → 0
/// - 小数截断
/// - 超出 u32 上限饱和
pub fn coerce_stock(value: &str) -> u32 {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return 0;
    }

    match trimmed.parse::<f64>() {
        Ok(n) if n.is_finite() && n > 0.0 => {
            if n >= u32::MAX as f64 {
                u32::MAX
            } else {
                n.trunc() as u32
            }
        }
        _ => 0,
    }
}
