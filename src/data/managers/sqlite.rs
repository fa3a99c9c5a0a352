//! SQLite 数据库管理器
//!
//! 基于 `rusqlite` 的 [`SettingsBackend`] 实现：
//! - 单连接 + Arc<Mutex>，可在多个 store 之间共享
//! - 文件数据库或内存数据库
//! - 通过 `sqlite_master` 判断表是否存在
//!
//! # 使用示例
//!
//! ```rust
//! use std::path::Path;
//! use std::sync::Arc;
//! use settings_store::data::managers::SqliteManager;
//!
//! let manager = Arc::new(SqliteManager::open(Path::new("app.db"))?);
//! assert!(!manager.table_exists("settings")?);
//! ```

use crate::data::backend::{SettingsBackend, SqlParam};
use crate::data::dialect::DialectKind;
use crate::data::{DataError, Result};
use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OptionalExtension, ToSql};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// SQLite 管理器
pub struct SqliteManager {
    /// 数据库连接
    conn: Arc<Mutex<Connection>>,
    /// 数据库路径（用于错误报告）
    db_path: PathBuf,
}

impl ToSql for SqlParam<'_> {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlParam::Int(i) => ToSqlOutput::Borrowed(ValueRef::Integer(*i)),
            SqlParam::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

/// 列值转为文本；SQLite 列类型只是亲和性，数字列同样按文本返回
fn value_to_text(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::Integer(i) => Some(i.to_string()),
        Value::Real(f) => Some(f.to_string()),
        Value::Text(s) => Some(s),
        Value::Blob(b) => Some(String::from_utf8_lossy(&b).into_owned()),
    }
}

impl SqliteManager {
    /// 打开（必要时创建）文件数据库
    pub fn open(path: &Path) -> Result<Self> {
        // 创建父目录
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| DataError::io(parent.to_path_buf(), e))?;
        }

        let conn = Connection::open(path)?;
        let manager = Self::from_connection(conn, path.to_path_buf());
        tracing::debug!(path = %manager.db_path().display(), "已打开 SQLite 数据库");
        Ok(manager)
    }

    /// 创建内存数据库（用于测试）
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Self::from_connection(conn, PathBuf::from(":memory:")))
    }

    /// 包装调用方已打开的连接
    pub fn from_connection(conn: Connection, db_path: PathBuf) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
            db_path,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| DataError::Concurrency(e.to_string()))
    }

    /// 获取数据库路径
    pub fn db_path(&self) -> &Path {
        &self.db_path
    }
}

impl SettingsBackend for SqliteManager {
    fn table_exists(&self, table_name: &str) -> Result<bool> {
        let conn = self.lock()?;

        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name=?",
            [table_name],
            |row| row.get(0),
        )?;

        Ok(count > 0)
    }

    fn execute_raw(&self, sql: &str) -> Result<()> {
        let conn = self.lock()?;
        conn.execute_batch(sql)?;
        Ok(())
    }

    fn column_names(&self, sql: &str) -> Result<Vec<String>> {
        let conn = self.lock()?;
        let stmt = conn.prepare(sql)?;
        Ok(stmt.column_names().iter().map(|s| s.to_string()).collect())
    }

    fn query_text(&self, sql: &str, params: &[SqlParam<'_>]) -> Result<Option<String>> {
        let conn = self.lock()?;
        let value = conn
            .query_row(sql, params_from_iter(params.iter()), |row| row.get::<_, Value>(0))
            .optional()?;
        Ok(value.and_then(value_to_text))
    }

    fn query_count(&self, sql: &str, params: &[SqlParam<'_>]) -> Result<i64> {
        let conn = self.lock()?;
        let count = conn.query_row(sql, params_from_iter(params.iter()), |row| row.get(0))?;
        Ok(count)
    }

    fn execute(&self, sql: &str, params: &[SqlParam<'_>]) -> Result<usize> {
        let conn = self.lock()?;
        let affected = conn.execute(sql, params_from_iter(params.iter()))?;
        Ok(affected)
    }

    fn default_dialect(&self) -> DialectKind {
        DialectKind::Sqlite
    }
}
