//! settings 存储服务
//!
//! - `store`: 可独立实例化的 [`SettingsStore`]
//! - `global`: 进程级入口（`init` / `init_v2` / `get_var` / `set_var` / `del_var`）

pub mod global;
pub mod store;

pub use global::{del_var, get_var, global_store, init, init_v2, set_var};
pub use store::{InitOptions, SettingsStore, WriteOutcome};
