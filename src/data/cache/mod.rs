//! 缓存层实现
//!
//! - `settings_cache`: settings 名称 → 值 缓存（无淘汰、无过期）

pub mod settings_cache;

pub use settings_cache::SettingsCache;
