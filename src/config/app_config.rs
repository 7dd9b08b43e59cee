// ==========================================
// 库存查询工具 - 应用配置
// ==========================================
// 职责: 从环境变量（可选 .env）加载启动配置
// 红线: 选择 firestore 后端时缺失必填项为启动致命错误
// ==========================================

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;

// ==========================================
// 配置键
// ==========================================
pub mod config_keys {
    pub const BACKEND: &str = "STOCK_LENS_BACKEND";
    pub const DB_PATH: &str = "STOCK_LENS_DB_PATH";
    pub const SEARCH_MODE: &str = "STOCK_LENS_SEARCH_MODE";
    pub const LOCALE: &str = "STOCK_LENS_LOCALE";

    pub const FIREBASE_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
    pub const FIREBASE_API_KEY: &str = "FIREBASE_API_KEY";
    pub const FIRESTORE_COLLECTION: &str = "FIRESTORE_COLLECTION";
    pub const FIRESTORE_ENDPOINT: &str = "FIRESTORE_ENDPOINT";
    pub const FIRESTORE_TIMEOUT_SECS: &str = "FIRESTORE_TIMEOUT_SECS";

    /// 前端构建工具习惯的前缀，作为回退键
    pub const VITE_PREFIX: &str = "VITE_";
}

pub const DEFAULT_COLLECTION: &str = "products";
pub const DEFAULT_FIRESTORE_ENDPOINT: &str = "https://firestore.googleapis.com/v1";
pub const DEFAULT_FIRESTORE_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_LOCALE: &str = "es";
pub const DB_FILE_NAME: &str = "stock_lens.db";

/// 配置错误
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("缺少必填配置项: {0}")]
    MissingVar(String),

    #[error("配置值无效 (key: {key}, value: {value})")]
    InvalidValue { key: String, value: String },
}

// ==========================================
// BackendKind - 存储后端
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Sqlite,
    Firestore,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "sqlite" | "local" | "embedded" => Ok(BackendKind::Sqlite),
            "firestore" | "firebase" | "remote" => Ok(BackendKind::Firestore),
            _ => Err(ConfigError::InvalidValue {
                key: config_keys::BACKEND.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// ==========================================
// SearchMode - 检索匹配策略
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// 所有后端统一：客户端大小写不敏感子串匹配
    Substring,
    /// 由后端 MatchMode 决定（SQLite 子串 / Firestore 等值）
    Native,
}

impl FromStr for SearchMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "substring" => Ok(SearchMode::Substring),
            "native" => Ok(SearchMode::Native),
            _ => Err(ConfigError::InvalidValue {
                key: config_keys::SEARCH_MODE.to_string(),
                value: s.to_string(),
            }),
        }
    }
}

// ==========================================
// FirestoreConfig - 远端文档存储连接参数
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    pub project_id: String,
    pub api_key: String,
    pub collection: String,
    pub endpoint: String,
    pub timeout_secs: u64,
}

impl FirestoreConfig {
    pub fn new(project_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: api_key.into(),
            collection: DEFAULT_COLLECTION.to_string(),
            endpoint: DEFAULT_FIRESTORE_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_FIRESTORE_TIMEOUT_SECS,
        }
    }

    fn from_lookup<F>(lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let project_id = lookup_with_vite(lookup, config_keys::FIREBASE_PROJECT_ID)
            .ok_or_else(|| ConfigError::MissingVar(config_keys::FIREBASE_PROJECT_ID.to_string()))?;
        let api_key = lookup_with_vite(lookup, config_keys::FIREBASE_API_KEY)
            .ok_or_else(|| ConfigError::MissingVar(config_keys::FIREBASE_API_KEY.to_string()))?;

        let timeout_secs = match non_empty(lookup(config_keys::FIRESTORE_TIMEOUT_SECS)) {
            Some(raw) => raw.parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: config_keys::FIRESTORE_TIMEOUT_SECS.to_string(),
                value: raw,
            })?,
            None => DEFAULT_FIRESTORE_TIMEOUT_SECS,
        };

        Ok(Self {
            project_id,
            api_key,
            collection: non_empty(lookup(config_keys::FIRESTORE_COLLECTION))
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            endpoint: non_empty(lookup(config_keys::FIRESTORE_ENDPOINT))
                .map(|e| e.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_FIRESTORE_ENDPOINT.to_string()),
            timeout_secs,
        })
    }
}

// ==========================================
// AppConfig - 启动配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: BackendKind,
    pub db_path: String,
    pub search_mode: SearchMode,
    pub locale: String,
    /// 仅 backend = Firestore 时存在
    pub firestore: Option<FirestoreConfig>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::Sqlite,
            db_path: default_db_path(),
            search_mode: SearchMode::Substring,
            locale: DEFAULT_LOCALE.to_string(),
            firestore: None,
        }
    }
}

impl AppConfig {
    /// 从进程环境加载（先尝试读取 .env）
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(e) = dotenv::dotenv() {
            tracing::debug!("未加载 .env: {}", e);
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 从任意键值来源加载
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let backend = match non_empty(lookup(config_keys::BACKEND)) {
            Some(raw) => raw.parse::<BackendKind>()?,
            None => BackendKind::Sqlite,
        };

        let search_mode = match non_empty(lookup(config_keys::SEARCH_MODE)) {
            Some(raw) => raw.parse::<SearchMode>()?,
            None => SearchMode::Substring,
        };

        let firestore = match backend {
            BackendKind::Firestore => Some(FirestoreConfig::from_lookup(&lookup)?),
            BackendKind::Sqlite => None,
        };

        Ok(Self {
            backend,
            db_path: non_empty(lookup(config_keys::DB_PATH)).unwrap_or_else(default_db_path),
            search_mode,
            locale: non_empty(lookup(config_keys::LOCALE))
                .unwrap_or_else(|| DEFAULT_LOCALE.to_string()),
            firestore,
        })
    }
}

/// 获取默认数据库路径（用户数据目录下）
pub fn default_db_path() -> String {
    match dirs::data_dir() {
        Some(dir) => {
            let app_dir = dir.join("stock-lens");
            if let Err(e) = std::fs::create_dir_all(&app_dir) {
                tracing::warn!("无法创建数据目录 {:?}: {}", app_dir, e);
                return DB_FILE_NAME.to_string();
            }
            app_dir.join(DB_FILE_NAME).to_string_lossy().to_string()
        }
        None => PathBuf::from(DB_FILE_NAME).to_string_lossy().to_string(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn lookup_with_vite<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    non_empty(lookup(key))
        .or_else(|| non_empty(lookup(&format!("{}{}", config_keys::VITE_PREFIX, key))))
}
