// ==========================================
// 库存查询工具 - API层错误类型
// ==========================================
// 职责: 将导入/仓储/配置错误归类为 解析 / 校验 / 持久化 / 检索 四类，
//       并生成面向用户的简短提示（i18n）
// ==========================================

use crate::config::ConfigError;
use crate::i18n::{t, t_with_args};
use crate::importer::error::ImportError;
use crate::importer::field_mapper::EXPECTED_COLUMNS;
use crate::repository::error::RepositoryError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    /// 文件不可读 / 不是表格
    #[error("文件解析失败: {0}")]
    ParseError(String),

    /// 可解析但无有效记录
    #[error("数据验证失败: {0}")]
    ValidationError(String),

    /// 存储拒绝写入
    #[error("数据写入失败: {0}")]
    PersistenceError(String),

    /// 存储读取失败
    #[error("检索失败: {0}")]
    SearchError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ApiError {
    /// 面向用户的简短提示（当前语言）
    pub fn user_message(&self) -> String {
        match self {
            ApiError::ParseError(_) => {
                t_with_args("import.parse_error", &[("columns", EXPECTED_COLUMNS)])
            }
            ApiError::ValidationError(_) => {
                t_with_args("import.no_valid_records", &[("columns", EXPECTED_COLUMNS)])
            }
            ApiError::PersistenceError(_) => t("import.persistence_error"),
            ApiError::SearchError(_) => t("search.error"),
            ApiError::ConfigError(detail) => t_with_args("config.error", &[("detail", detail.as_str())]),
            ApiError::Other(e) => {
                t_with_args("common.internal_error", &[("detail", e.to_string().as_str())])
            }
        }
    }

    /// 转为错误提示
    pub fn to_notification(&self) -> Notification {
        let title = match self {
            ApiError::SearchError(_) => t("search.error_title"),
            ApiError::ConfigError(_) => t("config.error_title"),
            _ => t("import.error_title"),
        };
        Notification {
            kind: NotificationKind::Error,
            title,
            message: self.user_message(),
        }
    }
}

// ==========================================
// Notification - 用户提示
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}

// ==========================================
// 从 ImportError 转换（按错误分类）
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        if err.is_validation_error() {
            ApiError::ValidationError(err.to_string())
        } else if err.is_persistence_error() {
            ApiError::PersistenceError(err.to_string())
        } else {
            ApiError::ParseError(err.to_string())
        }
    }
}

// 仓储错误默认视为写入失败；检索路径显式映射为 SearchError
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::ConfigError(msg) => ApiError::ConfigError(msg),
            other => ApiError::PersistenceError(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

/// API层 Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::{set_locale, LOCALE_TEST_LOCK};

    #[test]
    fn test_import_error_classification() {
        let parse: ApiError = ImportError::EmptyWorkbook.into();
        assert!(matches!(parse, ApiError::ParseError(_)));

        let validation: ApiError = ImportError::NoValidRecords {
            expected_columns: EXPECTED_COLUMNS.to_string(),
        }
        .into();
        assert!(matches!(validation, ApiError::ValidationError(_)));

        let persistence: ApiError =
            ImportError::Persistence(RepositoryError::LockError("x".to_string())).into();
        assert!(matches!(persistence, ApiError::PersistenceError(_)));
    }

    #[test]
    fn test_user_message_names_expected_columns() {
        let _guard = LOCALE_TEST_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        set_locale("es");

        let msg = ApiError::ValidationError("x".to_string()).user_message();
        assert!(msg.contains(EXPECTED_COLUMNS));

        let notification = ApiError::SearchError("timeout".to_string()).to_notification();
        assert_eq!(notification.kind, NotificationKind::Error);
        assert!(!notification.message.is_empty());
    }
}
