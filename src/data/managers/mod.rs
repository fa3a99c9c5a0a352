//! 数据库句柄实现
//!
//! - `sqlite`: SQLite 数据库管理器（rusqlite）

pub mod sqlite;

pub use sqlite::SqliteManager;
