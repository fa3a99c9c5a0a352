// lib.rs - settings 表的读穿透/写穿透缓存

pub mod core; // 日志等基础设施
pub mod data; // 持久化层
pub mod models;
pub mod services;

pub use crate::core::{init_logger, update_log_level};
pub use data::managers::SqliteManager;
pub use data::{DataError, Dialect, DialectKind, Result, SettingsBackend, SqlParam};
pub use models::{LogConfig, LogFormat, LogLevel, LogOutput, Setting, StoreConfig};
pub use services::settings::{del_var, get_var, global_store, init, init_v2, set_var};
pub use services::{IdGenerator, IdParts, InitOptions, SettingsStore, WriteOutcome};
