// ==========================================
// Firestore REST 文档编解码
// ==========================================
// 职责: Product <-> Firestore Document JSON / 查询体构造 / 响应解析
// 说明: 纯函数，不做网络 I/O
// ==========================================

use crate::domain::product::Product;
use crate::importer::data_cleaner::coerce_stock;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_store::FieldFilter;
use serde_json::{json, Map, Value};
use tracing::warn;

pub const FIELD_CODE: &str = "code";
pub const FIELD_DESCRIPTION: &str = "description";
pub const FIELD_LOCATION: &str = "location";
pub const FIELD_STOCK: &str = "stock";

/// 单次 commit 最多写入数
pub const MAX_WRITES_PER_COMMIT: usize = 500;

/// code → 文档 ID
///
/// 转义 '%' 与 '/'（文档 ID 不允许 '/'），保证单射；
/// "." / ".." / "__*__" 为保留 ID，首字符转义
pub fn document_id(code: &str) -> String {
    let mut id = String::with_capacity(code.len());
    for ch in code.chars() {
        match ch {
            '%' => id.push_str("%25"),
            '/' => id.push_str("%2F"),
            _ => id.push(ch),
        }
    }

    let reserved = id == "." || id == ".." || (id.len() >= 4 && id.starts_with("__") && id.ends_with("__"));
    if reserved {
        let mut chars = id.chars();
        if let Some(first) = chars.next() {
            return format!("%{:02X}{}", first as u32, chars.as_str());
        }
    }
    id
}

/// Product → Firestore fields
pub fn encode_fields(product: &Product) -> Value {
    json!({
        FIELD_CODE: { "stringValue": product.code },
        FIELD_DESCRIPTION: { "stringValue": product.description },
        FIELD_LOCATION: { "stringValue": product.location },
        FIELD_STOCK: { "integerValue": product.stock.to_string() },
    })
}

/// Firestore Document → Product
pub fn decode_document(document: &Value) -> RepositoryResult<Product> {
    let fields = document
        .get("fields")
        .and_then(Value::as_object)
        .ok_or_else(|| RepositoryError::DocumentDecodeError("文档缺少 fields".to_string()))?;

    let code = string_field(fields, FIELD_CODE).unwrap_or_default();
    let description = string_field(fields, FIELD_DESCRIPTION).unwrap_or_default();
    if code.is_empty() || description.is_empty() {
        let name = document.get("name").and_then(Value::as_str).unwrap_or("?");
        return Err(RepositoryError::DocumentDecodeError(format!(
            "文档 {} 缺少 code 或 description",
            name
        )));
    }

    Ok(Product {
        code,
        description,
        location: string_field(fields, FIELD_LOCATION).unwrap_or_default(),
        stock: stock_field(fields),
    })
}

fn string_field(fields: &Map<String, Value>, key: &str) -> Option<String> {
    let value = fields.get(key)?;
    if let Some(s) = value.get("stringValue").and_then(Value::as_str) {
        return Some(s.trim().to_string());
    }
    // 历史数据可能将编码存为数字
    if let Some(v) = value.get("integerValue") {
        return Some(scalar_to_string(v));
    }
    value
        .get("doubleValue")
        .map(scalar_to_string)
}

fn stock_field(fields: &Map<String, Value>) -> u32 {
    let Some(value) = fields.get(FIELD_STOCK) else {
        return 0;
    };
    ["integerValue", "doubleValue", "stringValue"]
        .iter()
        .find_map(|k| value.get(*k))
        .map(|v| coerce_stock(&scalar_to_string(v)))
        .unwrap_or(0)
}

fn scalar_to_string(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// 等值查询体（runQuery）
pub fn equality_query(collection: &str, filter: &FieldFilter) -> Value {
    let mut filters: Vec<Value> = Vec::new();
    if let Some(code) = &filter.code {
        filters.push(field_equals(FIELD_CODE, code));
    }
    if let Some(description) = &filter.description {
        filters.push(field_equals(FIELD_DESCRIPTION, description));
    }

    let mut structured = json!({ "from": [{ "collectionId": collection }] });
    match filters.len() {
        0 => {}
        1 => {
            structured["where"] = filters.remove(0);
        }
        _ => {
            structured["where"] = json!({
                "compositeFilter": { "op": "AND", "filters": filters }
            });
        }
    }

    json!({ "structuredQuery": structured })
}

fn field_equals(field: &str, value: &str) -> Value {
    json!({
        "fieldFilter": {
            "field": { "fieldPath": field },
            "op": "EQUAL",
            "value": { "stringValue": value }
        }
    })
}

/// 计数查询体（runAggregationQuery）
pub fn count_query(collection: &str) -> Value {
    json!({
        "structuredAggregationQuery": {
            "structuredQuery": { "from": [{ "collectionId": collection }] },
            "aggregations": [{ "alias": "total", "count": {} }]
        }
    })
}

/// 解析 runQuery 响应（数组，每项可能带 document）
pub fn decode_run_query(response: &Value) -> RepositoryResult<Vec<Product>> {
    let items = response
        .as_array()
        .ok_or_else(|| RepositoryError::DocumentDecodeError("runQuery 响应不是数组".to_string()))?;

    Ok(decode_documents(items.iter().filter_map(|item| item.get("document"))))
}

/// 批量解码；无法解码的文档（缺 code / description）跳过并告警
///
/// 共享集合可能被其他客户端写入不完整文档，单条坏数据不应使整次读取失败
pub fn decode_documents<'a, I>(documents: I) -> Vec<Product>
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut skipped = 0usize;
    let products: Vec<Product> = documents
        .into_iter()
        .filter_map(|doc| match decode_document(doc) {
            Ok(product) => Some(product),
            Err(e) => {
                skipped += 1;
                warn!(error = %e, "跳过无法解码的文档");
                None
            }
        })
        .collect();

    if skipped > 0 {
        warn!(skipped, decoded = products.len(), "部分文档无法解码，已跳过");
    }
    products
}

/// 解析 runAggregationQuery 响应
pub fn decode_count(response: &Value) -> RepositoryResult<usize> {
    let total = response
        .as_array()
        .and_then(|items| items.first())
        .and_then(|item| item.pointer("/result/aggregateFields/total/integerValue"))
        .ok_or_else(|| RepositoryError::DocumentDecodeError("计数响应缺少 total".to_string()))?;

    scalar_to_string(total)
        .parse::<usize>()
        .map_err(|e| RepositoryError::DocumentDecodeError(format!("计数值无效: {}", e)))
}

/// 写入（upsert）
pub fn update_write(document_name: &str, product: &Product) -> Value {
    json!({
        "update": {
            "name": document_name,
            "fields": encode_fields(product)
        }
    })
}

/// 删除写入
pub fn delete_write(document_name: &str) -> Value {
    json!({ "delete": document_name })
}
