// ==========================================
// 库存查询工具 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 分类: 解析错误 / 校验错误 / 持久化错误
// ==========================================

use crate::repository::error::RepositoryError;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误（解析错误）=====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xlsm/.xls/.xlsb/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error("工作簿无工作表")]
    EmptyWorkbook,

    // ===== 数据校验错误 =====
    #[error("未找到有效商品记录（需要列: {expected_columns}）")]
    NoValidRecords { expected_columns: String },

    // ===== 持久化错误 =====
    #[error("商品数据写入失败: {0}")]
    Persistence(#[from] RepositoryError),
}

impl ImportError {
    /// 文件不可读 / 非表格 / 无工作表
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            ImportError::FileNotFound(_)
                | ImportError::UnsupportedFormat(_)
                | ImportError::FileReadError(_)
                | ImportError::ExcelParseError(_)
                | ImportError::CsvParseError(_)
                | ImportError::EmptyWorkbook
        )
    }

    /// 可解析但无有效记录
    pub fn is_validation_error(&self) -> bool {
        matches!(self, ImportError::NoValidRecords { .. })
    }

    /// 存储拒绝写入
    pub fn is_persistence_error(&self) -> bool {
        matches!(self, ImportError::Persistence(_))
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_classification() {
        assert!(ImportError::EmptyWorkbook.is_parse_error());
        assert!(ImportError::UnsupportedFormat("pdf".to_string()).is_parse_error());

        let validation = ImportError::NoValidRecords {
            expected_columns: "codigo".to_string(),
        };
        assert!(validation.is_validation_error());
        assert!(!validation.is_parse_error());

        let persistence = ImportError::from(RepositoryError::LockError("poisoned".to_string()));
        assert!(persistence.is_persistence_error());
    }
}
