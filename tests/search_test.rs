// ==========================================
// 检索集成测试
// ==========================================
// 测试目标: 子串 / 等值两种匹配策略、交集语义、读取失败的区分
// ==========================================

mod test_helpers;

use std::sync::Arc;
use stock_lens::api::{ApiError, ProductApi};
use stock_lens::config::SearchMode;
use stock_lens::engine::SearchEngine;
use stock_lens::repository::{MatchMode, ProductStore};
use test_helpers::{create_test_store, product, EqualityOnlyStore, UnavailableStore};

async fn seed(store: &Arc<dyn ProductStore>) {
    store
        .replace_all(vec![
            product("ABC-123", "Tornillo cabeza plana", "P1", 15),
            product("B2", "Tuerca hexagonal", "P1", 5),
            product("B3", "Tuerca mariposa", "P2", 0),
        ])
        .await
        .unwrap();
}

#[tokio::test]
async fn test_substring_search_on_sqlite() {
    let (_dir, _db_path, store) = create_test_store();
    seed(&store).await;
    let engine = SearchEngine::new(store.clone(), SearchMode::Substring);

    // 空条件返回全部
    assert_eq!(engine.search("", "").await.unwrap().len(), 3);

    // 大小写不敏感
    let found = engine.search("abc", "").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].code, "ABC-123");

    let found = engine.search("", "hexagonal").await.unwrap();
    assert_eq!(found, vec![product("B2", "Tuerca hexagonal", "P1", 5)]);

    assert!(engine.search("B9", "").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_whitespace_query_filters_instead_of_listing_all() {
    let (_dir, _db_path, store) = create_test_store();
    store
        .replace_all(vec![
            product("A 1", "Tornillo", "", 3),
            product("B2", "Tuerca hexagonal", "P1", 5),
        ])
        .await
        .unwrap();
    let engine = SearchEngine::new(store, SearchMode::Substring);

    let found = engine.search(" ", "").await.unwrap();
    let codes: Vec<&str> = found.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, vec!["A 1"]);
}

#[tokio::test]
async fn test_combined_query_is_intersection() {
    let (_dir, _db_path, store) = create_test_store();
    seed(&store).await;
    let engine = SearchEngine::new(store, SearchMode::Substring);

    let found = engine.search("b", "mariposa").await.unwrap();
    let codes: Vec<&str> = found.iter().map(|p| p.code.as_str()).collect();
    assert_eq!(codes, vec!["B3"]);

    // 两个条件各自有命中但无交集
    assert!(engine.search("ABC", "mariposa").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_substring_mode_is_uniform_on_equality_backend() {
    let store: Arc<dyn ProductStore> = Arc::new(EqualityOnlyStore::default());
    seed(&store).await;
    let engine = SearchEngine::new(store, SearchMode::Substring);

    assert_eq!(engine.effective_match_mode(), MatchMode::Substring);
    assert_eq!(engine.search("abc", "").await.unwrap().len(), 1);
    assert_eq!(engine.search("", "tuerca").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_native_mode_uses_backend_equality() {
    let store: Arc<dyn ProductStore> = Arc::new(EqualityOnlyStore::default());
    seed(&store).await;
    let engine = SearchEngine::new(store, SearchMode::Native);

    assert_eq!(engine.effective_match_mode(), MatchMode::Exact);
    // 等值匹配：子串与大小写不同都不命中
    assert!(engine.search("abc", "").await.unwrap().is_empty());
    assert!(engine.search("ABC", "").await.unwrap().is_empty());

    let found = engine.search("ABC-123", "").await.unwrap();
    assert_eq!(found.len(), 1);

    let found = engine.search("B2", "Tuerca hexagonal").await.unwrap();
    assert_eq!(found, vec![product("B2", "Tuerca hexagonal", "P1", 5)]);

    // 空条件仍返回全部
    assert_eq!(engine.search("", "").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_native_mode_on_sqlite_is_substring() {
    let (_dir, _db_path, store) = create_test_store();
    seed(&store).await;
    let engine = SearchEngine::new(store, SearchMode::Native);

    assert_eq!(engine.effective_match_mode(), MatchMode::Substring);
    assert_eq!(engine.search("abc", "").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_read_failure_is_distinguishable_from_no_results() {
    let api = ProductApi::new(Arc::new(UnavailableStore), SearchMode::Substring);

    let err = api.search("B2", "").await.unwrap_err();
    assert!(matches!(err, ApiError::SearchError(_)), "got {:?}", err);
    assert!(matches!(api.count().await, Err(ApiError::SearchError(_))));

    // 兼容调用方：失败按无结果处理
    assert!(api.search_or_empty("B2", "").await.is_empty());
}

#[tokio::test]
async fn test_search_response_carries_stock_status() {
    let (_dir, _db_path, store) = create_test_store();
    seed(&store).await;
    let api = ProductApi::new(store, SearchMode::Substring);

    let response = api.search("", "tuerca").await.unwrap();
    assert_eq!(response.total, 2);
    assert_eq!(response.match_mode, MatchMode::Substring);

    let statuses: Vec<_> = response.products.iter().map(|v| v.stock_status).collect();
    assert_eq!(
        statuses,
        vec![stock_lens::StockStatus::Low, stock_lens::StockStatus::OutOfStock]
    );
}
