//! 数据持久化层
//!
//! # 模块组织
//!
//! - `error`: 统一错误类型定义
//! - `backend`: 外部数据库句柄抽象
//! - `dialect`: SQL 方言（占位符风格、忽略重复插入写法、建表 DDL）
//! - `cache`: settings 内存缓存
//! - `managers`: 数据库句柄实现（SQLite）

pub mod backend;
pub mod cache;
pub mod dialect;
pub mod error;
pub mod managers;

pub use backend::{SettingsBackend, SqlParam};
pub use dialect::{Dialect, DialectKind};
pub use error::{DataError, Result};
