// ==========================================
// 库存查询工具 - 远端文档商品存储（Firestore REST）
// ==========================================
// 职责: 实现 ProductStore（使用 reqwest 调用 Firestore REST API）
// 红线: 后端仅支持字段等值查询，MatchMode::Exact
// 一致性: 写入量 <= 500 时单次 commit（原子）；
//         超出时分块提交（先 upsert 新数据，再删除过期文档），中途失败会残留新旧混合数据
// ==========================================

pub mod codec;

use crate::config::FirestoreConfig;
use crate::domain::product::Product;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_store::{dedupe_by_code, FieldFilter, MatchMode, ProductStore};
use async_trait::async_trait;
use codec::MAX_WRITES_PER_COMMIT;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// 分页读取大小
const LIST_PAGE_SIZE: usize = 300;

// ==========================================
// FirestoreProductStore
// ==========================================
pub struct FirestoreProductStore {
    client: Client,
    config: FirestoreConfig,
}

impl FirestoreProductStore {
    /// 创建新的远端存储实例
    ///
    /// # 参数
    /// - config: 连接参数（项目 ID / API Key / 集合名 / 端点）
    pub fn new(config: FirestoreConfig) -> RepositoryResult<Self> {
        if config.project_id.trim().is_empty() || config.api_key.trim().is_empty() {
            return Err(RepositoryError::ConfigError(
                "project_id 与 api_key 不能为空".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        info!(
            project_id = %config.project_id,
            collection = %config.collection,
            endpoint = %config.endpoint,
            "Firestore 商品存储已创建"
        );
        Ok(Self { client, config })
    }

    /// projects/{p}/databases/(default)/documents
    fn database_root(&self) -> String {
        format!(
            "projects/{}/databases/(default)/documents",
            self.config.project_id
        )
    }

    fn documents_url(&self) -> String {
        format!("{}/{}", self.config.endpoint, self.database_root())
    }

    fn collection_url(&self) -> String {
        format!("{}/{}", self.documents_url(), self.config.collection)
    }

    /// 文档资源名（commit 使用）
    pub fn document_name(&self, code: &str) -> String {
        format!(
            "{}/{}/{}",
            self.database_root(),
            self.config.collection,
            codec::document_id(code)
        )
    }

    /// 发送请求并解析 JSON；非 2xx 转为 RemoteStatusError（保留响应体）
    async fn send_json(&self, request: RequestBuilder) -> RepositoryResult<Value> {
        let response = request
            .query(&[("key", self.config.api_key.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RepositoryError::RemoteStatusError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<Value>().await?)
    }

    /// 分页列出集合内全部文档（原始 JSON）
    async fn list_documents(&self, mask_code_only: bool) -> RepositoryResult<Vec<Value>> {
        let mut documents = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let mut params: Vec<(&str, String)> = vec![("pageSize", LIST_PAGE_SIZE.to_string())];
            if mask_code_only {
                params.push(("mask.fieldPaths", codec::FIELD_CODE.to_string()));
            }
            if let Some(token) = &page_token {
                params.push(("pageToken", token.clone()));
            }

            let page = self
                .send_json(self.client.get(self.collection_url()).query(&params))
                .await?;

            if let Some(items) = page.get("documents").and_then(Value::as_array) {
                documents.extend(items.iter().cloned());
            }

            page_token = page
                .get("nextPageToken")
                .and_then(Value::as_str)
                .filter(|t| !t.is_empty())
                .map(str::to_string);
            if page_token.is_none() {
                break;
            }
        }

        Ok(documents)
    }

    async fn commit(&self, writes: Vec<Value>) -> RepositoryResult<()> {
        if writes.is_empty() {
            return Ok(());
        }
        let url = format!("{}:commit", self.documents_url());
        self.send_json(self.client.post(url).json(&json!({ "writes": writes })))
            .await?;
        Ok(())
    }
}

#[async_trait]
impl ProductStore for FirestoreProductStore {
    fn backend_name(&self) -> &'static str {
        "firestore"
    }

    fn match_mode(&self) -> MatchMode {
        MatchMode::Exact
    }

    #[instrument(skip(self, products), fields(input = products.len()))]
    async fn replace_all(&self, products: Vec<Product>) -> RepositoryResult<usize> {
        let (products, duplicates) = dedupe_by_code(products);
        if duplicates > 0 {
            debug!(duplicates, "同批次存在重复 code，后者覆盖前者");
        }

        // 现有文档名
        let existing: Vec<String> = self
            .list_documents(true)
            .await?
            .iter()
            .filter_map(|doc| doc.get("name").and_then(Value::as_str).map(str::to_string))
            .collect();

        let upserts: Vec<(String, Value)> = products
            .iter()
            .map(|p| {
                let name = self.document_name(&p.code);
                let write = codec::update_write(&name, p);
                (name, write)
            })
            .collect();
        let keep: HashSet<&str> = upserts.iter().map(|(name, _)| name.as_str()).collect();

        let stale: Vec<Value> = existing
            .iter()
            .filter(|name| !keep.contains(name.as_str()))
            .map(|name| codec::delete_write(name))
            .collect();

        let stale_count = stale.len();
        let mut writes: Vec<Value> = upserts.into_iter().map(|(_, w)| w).collect();
        writes.extend(stale);

        if writes.len() > MAX_WRITES_PER_COMMIT {
            warn!(
                writes = writes.len(),
                limit = MAX_WRITES_PER_COMMIT,
                "写入量超过单次 commit 上限，分块提交不保证原子性"
            );
        }

        let chunks: Vec<Vec<Value>> = writes
            .chunks(MAX_WRITES_PER_COMMIT)
            .map(|c| c.to_vec())
            .collect();
        let total_chunks = chunks.len();
        for (idx, chunk) in chunks.into_iter().enumerate() {
            if let Err(e) = self.commit(chunk).await {
                warn!(
                    chunk = idx + 1,
                    total_chunks,
                    error = %e,
                    "commit 失败，远端可能残留部分更新"
                );
                return Err(e);
            }
        }

        info!(
            count = products.len(),
            removed = stale_count,
            "商品数据已整体替换"
        );
        Ok(products.len())
    }

    /// 不完整的文档被跳过（见 codec::decode_documents），
    /// 因此结果条数可能小于 count()
    async fn get_all(&self) -> RepositoryResult<Vec<Product>> {
        let documents = self.list_documents(false).await?;
        Ok(codec::decode_documents(&documents))
    }

    async fn count(&self) -> RepositoryResult<usize> {
        let url = format!("{}:runAggregationQuery", self.documents_url());
        let response = self
            .send_json(
                self.client
                    .post(url)
                    .json(&codec::count_query(&self.config.collection)),
            )
            .await?;
        codec::decode_count(&response)
    }

    async fn find_by_fields(&self, filter: &FieldFilter) -> RepositoryResult<Vec<Product>> {
        let url = format!("{}:runQuery", self.documents_url());
        let response = self
            .send_json(
                self.client
                    .post(url)
                    .json(&codec::equality_query(&self.config.collection, filter)),
            )
            .await?;
        codec::decode_run_query(&response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> FirestoreProductStore {
        let mut config = FirestoreConfig::new("stock-demo", "key");
        config.endpoint = "http://localhost:8080/v1".to_string();
        FirestoreProductStore::new(config).unwrap()
    }

    #[test]
    fn test_new_rejects_empty_credentials() {
        let result = FirestoreProductStore::new(FirestoreConfig::new("", "key"));
        assert!(matches!(result, Err(RepositoryError::ConfigError(_))));
    }

    #[test]
    fn test_resource_paths() {
        let store = store();
        assert_eq!(
            store.collection_url(),
            "http://localhost:8080/v1/projects/stock-demo/databases/(default)/documents/products"
        );
        assert_eq!(
            store.document_name("A/1"),
            "projects/stock-demo/databases/(default)/documents/products/A%2F1"
        );
        assert_eq!(store.match_mode(), MatchMode::Exact);
    }
}
