// 进程级 settings 入口
//
// 对应"启动时绑定一次、之后随处读写"的用法。需要多个互不干扰的实例
// （例如测试）时直接使用 `SettingsStore`。

use super::store::{InitOptions, SettingsStore, WriteOutcome};
use crate::data::backend::SettingsBackend;
use crate::data::dialect::DialectKind;
use crate::data::Result;
use once_cell::sync::Lazy;
use std::sync::Arc;

/// 全局 SettingsStore 单例
static GLOBAL_SETTINGS: Lazy<SettingsStore> = Lazy::new(SettingsStore::new);

/// 获取全局 store
pub fn global_store() -> &'static SettingsStore {
    &GLOBAL_SETTINGS
}

/// 绑定数据库句柄（进程内只能成功一次）
pub fn init(backend: Arc<dyn SettingsBackend>) -> Result<()> {
    GLOBAL_SETTINGS.init(backend)
}

/// 绑定数据库句柄，并指定是否自动生成 id 以及是否使用编号占位符（PostgreSQL）
pub fn init_v2(backend: Arc<dyn SettingsBackend>, auto_generate_id: bool, pg: bool) -> Result<()> {
    GLOBAL_SETTINGS.init_with(
        backend,
        InitOptions {
            auto_id: auto_generate_id,
            dialect: Some(DialectKind::from_numbered(pg)),
        },
    )
}

/// 绑定数据库句柄并显式指定选项
pub fn init_with(backend: Arc<dyn SettingsBackend>, options: InitOptions) -> Result<()> {
    GLOBAL_SETTINGS.init_with(backend, options)
}

/// 读取值，缺失或出错时返回空字符串
pub fn get_var(name: &str) -> String {
    GLOBAL_SETTINGS.get(name)
}

/// 写入值，出错时仅记录日志
pub fn set_var(name: &str, value: &str) {
    GLOBAL_SETTINGS.set(name, value)
}

/// 删除值，出错时仅记录日志
pub fn del_var(name: &str) {
    GLOBAL_SETTINGS.delete(name)
}

pub fn try_set_var(name: &str, value: &str) -> Result<WriteOutcome> {
    GLOBAL_SETTINGS.try_set(name, value)
}

pub fn try_del_var(name: &str) -> Result<bool> {
    GLOBAL_SETTINGS.try_delete(name)
}
