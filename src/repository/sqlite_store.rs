// ==========================================
// 库存查询工具 - 本地嵌入式商品存储（SQLite）
// ==========================================
// 职责: 实现 ProductStore（使用 rusqlite）
// 红线: Repository 不含检索规则，只做数据 CRUD
// 说明: replace_all 在单个事务内完成 DELETE + INSERT，失败整体回滚
// ==========================================

use crate::db::{configure_sqlite_connection, ensure_schema, open_sqlite_connection};
use crate::domain::product::Product;
use crate::repository::error::{RepositoryError, RepositoryResult};
use crate::repository::product_store::{dedupe_by_code, FieldFilter, MatchMode, ProductStore};
use async_trait::async_trait;
use rusqlite::{params, Connection, Row, ToSql, Transaction};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info, instrument};

// ==========================================
// SqliteProductStore
// ==========================================
pub struct SqliteProductStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteProductStore {
    /// 打开（或创建）数据库文件并建表
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> RepositoryResult<Self> {
        let conn = open_sqlite_connection(db_path)
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        ensure_schema(&conn)?;

        info!(db_path = %db_path, "SQLite 商品存储已打开");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建（会再次应用统一 PRAGMA 并建表，幂等）
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> RepositoryResult<Self> {
        {
            let guard = conn
                .lock()
                .map_err(|e| RepositoryError::LockError(e.to_string()))?;
            configure_sqlite_connection(&guard)?;
            ensure_schema(&guard)?;
        }
        Ok(Self { conn })
    }

    /// 内存数据库（测试/临时会话）
    pub fn in_memory() -> RepositoryResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| RepositoryError::DatabaseConnectionError(e.to_string()))?;
        Self::from_connection(Arc::new(Mutex::new(conn)))
    }

    fn get_conn(&self) -> RepositoryResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| RepositoryError::LockError(e.to_string()))
    }

    fn map_row(row: &Row<'_>) -> rusqlite::Result<Product> {
        Ok(Product {
            code: row.get(0)?,
            description: row.get(1)?,
            location: row.get(2)?,
            stock: row.get(3)?,
        })
    }

    /// 在事务中清空并批量写入
    fn replace_all_tx(tx: &Transaction, products: &[Product]) -> rusqlite::Result<usize> {
        tx.execute("DELETE FROM products", [])?;

        let mut stmt = tx.prepare(
            r#"
            INSERT OR REPLACE INTO products (code, description, location, stock)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )?;

        let mut count = 0;
        for product in products {
            stmt.execute(params![
                product.code,
                product.description,
                product.location,
                product.stock,
            ])?;
            count += 1;
        }

        Ok(count)
    }
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn match_mode(&self) -> MatchMode {
        MatchMode::Substring
    }

    #[instrument(skip(self, products), fields(input = products.len()))]
    async fn replace_all(&self, products: Vec<Product>) -> RepositoryResult<usize> {
        let (products, duplicates) = dedupe_by_code(products);
        if duplicates > 0 {
            debug!(duplicates, "同批次存在重复 code，后者覆盖前者");
        }

        let mut conn = self.get_conn()?;
        let tx = conn
            .transaction()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        let count = Self::replace_all_tx(&tx, &products)?;

        tx.commit()
            .map_err(|e| RepositoryError::DatabaseTransactionError(e.to_string()))?;

        info!(count, "商品数据已整体替换");
        Ok(count)
    }

    async fn get_all(&self) -> RepositoryResult<Vec<Product>> {
        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(
            "SELECT code, description, location, stock FROM products ORDER BY rowid",
        )?;

        let products = stmt
            .query_map([], Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }

    async fn count(&self) -> RepositoryResult<usize> {
        let conn = self.get_conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    async fn find_by_fields(&self, filter: &FieldFilter) -> RepositoryResult<Vec<Product>> {
        let mut sql =
            String::from("SELECT code, description, location, stock FROM products WHERE 1 = 1");
        let mut values: Vec<&dyn ToSql> = Vec::new();

        if let Some(code) = filter.code.as_ref() {
            values.push(code);
            sql.push_str(&format!(" AND code = ?{}", values.len()));
        }
        if let Some(description) = filter.description.as_ref() {
            values.push(description);
            sql.push_str(&format!(" AND description = ?{}", values.len()));
        }
        sql.push_str(" ORDER BY rowid");

        let conn = self.get_conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let products = stmt
            .query_map(values.as_slice(), Self::map_row)?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(products)
    }
}
