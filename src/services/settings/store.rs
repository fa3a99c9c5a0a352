//! settings 存储
//!
//! 读穿透 / 写穿透的 name → value 缓存，背后是一张 SQL settings 表。
//!
//! 状态机只有两个状态：未绑定（只接受 `init` / `init_with`）和已绑定
//! （拒绝再次初始化）。绑定只发生一次，不可逆。
//!
//! # 使用示例
//!
//! ```rust
//! use std::path::Path;
//! use std::sync::Arc;
//! use settings_store::data::managers::SqliteManager;
//! use settings_store::services::settings::SettingsStore;
//!
//! let store = SettingsStore::new();
//! store.init(Arc::new(SqliteManager::open(Path::new("app.db"))?))?;
//!
//! store.set("site_name", "duck");
//! assert_eq!(store.get("site_name"), "duck");
//! store.delete("site_name");
//! ```

use crate::data::backend::{SettingsBackend, SqlParam};
use crate::data::cache::SettingsCache;
use crate::data::dialect::{
    Dialect, DialectKind, Statement, NAME_COLUMN, SETTINGS_TABLE, VALUE_COLUMN,
};
use crate::data::{DataError, Result};
use crate::models::config::StoreConfig;
use crate::models::setting::Setting;
use crate::services::id_generator::IdGenerator;
use once_cell::sync::OnceCell;
use std::sync::{Arc, Mutex, MutexGuard};

/// 扩展初始化选项
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InitOptions {
    /// 插入新行时由分布式 ID 生成器分配 id
    pub auto_id: bool,
    /// 语句方言，`None` 表示使用句柄的原生方言
    pub dialect: Option<DialectKind>,
}

impl From<&StoreConfig> for InitOptions {
    fn from(config: &StoreConfig) -> Self {
        Self {
            auto_id: config.auto_id,
            dialect: config.dialect,
        }
    }
}

/// 写入结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// 新插入一行
    Inserted,
    /// 原地更新已有行
    Updated,
}

/// 绑定时渲染好的语句
struct PreparedSql {
    select_value: String,
    count_by_name: String,
    insert: String,
    insert_with_id: String,
    update_value: String,
    delete_by_name: String,
}

impl PreparedSql {
    fn render(dialect: &dyn Dialect) -> Self {
        Self {
            select_value: dialect.render(Statement::SelectValue),
            count_by_name: dialect.render(Statement::CountByName),
            insert: dialect.render(Statement::Insert),
            insert_with_id: dialect.render(Statement::InsertWithId),
            update_value: dialect.render(Statement::UpdateValue),
            delete_by_name: dialect.render(Statement::DeleteByName),
        }
    }
}

/// 已绑定状态
struct Binding {
    backend: Arc<dyn SettingsBackend>,
    dialect: DialectKind,
    sql: PreparedSql,
    id_generator: Option<IdGenerator>,
}

/// settings 存储
pub struct SettingsStore {
    config: StoreConfig,
    binding: OnceCell<Binding>,
    /// 串行化绑定过程
    init_lock: Mutex<()>,
    /// 串行化写入与删除
    write_lock: Mutex<()>,
    cache: SettingsCache,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore {
    /// 创建未绑定的 store（默认配置）
    pub fn new() -> Self {
        Self::with_config(StoreConfig::default())
    }

    /// 创建未绑定的 store
    pub fn with_config(config: StoreConfig) -> Self {
        Self {
            config,
            binding: OnceCell::new(),
            init_lock: Mutex::new(()),
            write_lock: Mutex::new(()),
            cache: SettingsCache::new(),
        }
    }

    /// 绑定数据库句柄，选项取自构造时的配置
    pub fn init(&self, backend: Arc<dyn SettingsBackend>) -> Result<()> {
        let options = InitOptions::from(&self.config);
        self.init_with(backend, options)
    }

    /// 绑定数据库句柄并指定 ID 生成模式与方言
    ///
    /// 表不存在时创建；随后校验 `name`、`value` 两列存在。
    /// 任何一步失败都保持未绑定状态。
    pub fn init_with(&self, backend: Arc<dyn SettingsBackend>, options: InitOptions) -> Result<()> {
        let _guard = lock(&self.init_lock)?;

        if self.binding.get().is_some() {
            tracing::warn!("settings 已绑定，拒绝重复初始化");
            return Err(DataError::AlreadyInitialized);
        }

        let dialect = options
            .dialect
            .unwrap_or_else(|| backend.default_dialect());
        bootstrap(backend.as_ref(), dialect.dialect())?;

        let binding = Binding {
            sql: PreparedSql::render(dialect.dialect()),
            id_generator: options
                .auto_id
                .then(|| IdGenerator::from_config(&self.config)),
            backend,
            dialect,
        };
        self.binding
            .set(binding)
            .map_err(|_| DataError::AlreadyInitialized)?;

        tracing::info!(dialect = %dialect, auto_id = options.auto_id, "settings 已绑定数据库");
        Ok(())
    }

    pub fn is_bound(&self) -> bool {
        self.binding.get().is_some()
    }

    /// 已绑定时使用的方言
    pub fn dialect(&self) -> Option<DialectKind> {
        self.binding.get().map(|b| b.dialect)
    }

    /// 是否启用了自动 ID
    pub fn auto_id(&self) -> bool {
        self.binding
            .get()
            .is_some_and(|b| b.id_generator.is_some())
    }

    fn binding(&self) -> Result<&Binding> {
        self.binding.get().ok_or(DataError::NotInitialized)
    }

    /// 读取值，缺失或出错时返回空字符串
    pub fn get(&self, name: &str) -> String {
        match self.try_get(name) {
            Ok(value) => value.unwrap_or_default(),
            Err(e) => {
                tracing::warn!(name, error = %e, "读取 settings 失败");
                String::new()
            }
        }
    }

    /// 读取值：先查缓存，未命中时查询数据库并回填缓存
    ///
    /// 缺失的名称不会被缓存。
    pub fn try_get(&self, name: &str) -> Result<Option<String>> {
        let binding = self.binding()?;

        if let Some(value) = self.cache.get(name) {
            tracing::trace!(name, "settings 命中缓存");
            return Ok(Some(value));
        }

        tracing::debug!(name, "settings 缓存未命中，查询数据库");
        let value = binding
            .backend
            .query_text(&binding.sql.select_value, &[SqlParam::Text(name)])?;

        Ok(value.map(|v| self.cache.insert_if_absent(name, v)))
    }

    /// 写入值，出错时仅记录日志
    pub fn set(&self, name: &str, value: &str) {
        if let Err(e) = self.try_set(name, value) {
            tracing::error!(name, error = %e, "写入 settings 失败");
        }
    }

    /// 写入值并返回结果
    ///
    /// 缓存先于数据库更新；数据库写入失败时缓存仍保留新值，
    /// 此时缓存领先于持久化数据，调用方可自行重试。
    pub fn try_set(&self, name: &str, value: &str) -> Result<WriteOutcome> {
        let binding = self.binding()?;
        let _guard = lock(&self.write_lock)?;

        self.cache.insert(name, value);

        let exists = binding
            .backend
            .query_count(&binding.sql.count_by_name, &[SqlParam::Text(name)])?
            > 0;
        if exists {
            self.update_row(binding, name, value)?;
            return Ok(WriteOutcome::Updated);
        }

        let inserted = match &binding.id_generator {
            Some(generator) => {
                let id = i64::try_from(generator.next_id()?)
                    .map_err(|e| DataError::IdGeneration(e.to_string()))?;
                binding.backend.execute(
                    &binding.sql.insert_with_id,
                    &[SqlParam::Int(id), SqlParam::Text(name), SqlParam::Text(value)],
                )?
            }
            None => binding.backend.execute(
                &binding.sql.insert,
                &[SqlParam::Text(name), SqlParam::Text(value)],
            )?,
        };

        if inserted == 0 {
            // 计数与插入之间另一个写入方抢先插入了同名行
            tracing::debug!(name, "插入被忽略，改为更新");
            self.update_row(binding, name, value)?;
            return Ok(WriteOutcome::Updated);
        }

        Ok(WriteOutcome::Inserted)
    }

    fn update_row(&self, binding: &Binding, name: &str, value: &str) -> Result<usize> {
        binding.backend.execute(
            &binding.sql.update_value,
            &[SqlParam::Text(value), SqlParam::Text(name)],
        )
    }

    /// 删除值，出错时仅记录日志
    pub fn delete(&self, name: &str) {
        if let Err(e) = self.try_delete(name) {
            tracing::error!(name, error = %e, "删除 settings 失败");
        }
    }

    /// 删除缓存与数据库中的值，返回数据库中是否确有行被删除
    pub fn try_delete(&self, name: &str) -> Result<bool> {
        let binding = self.binding()?;
        let _guard = lock(&self.write_lock)?;

        self.cache.remove(name);
        let affected = binding
            .backend
            .execute(&binding.sql.delete_by_name, &[SqlParam::Text(name)])?;

        Ok(affected > 0)
    }

    /// 仅查看缓存，不访问数据库
    pub fn cached(&self, name: &str) -> Option<String> {
        self.cache.get(name)
    }

    /// 按名称排序列出当前缓存的记录（不含 id）
    pub fn cached_settings(&self) -> Vec<Setting> {
        let mut settings: Vec<Setting> = self
            .cache
            .snapshot()
            .into_iter()
            .map(|(name, value)| Setting::new(name, value))
            .collect();
        settings.sort_by(|a, b| a.name.cmp(&b.name));
        settings
    }

    pub fn cache_len(&self) -> usize {
        self.cache.len()
    }

    /// 清空缓存，之后的读取会重新查询数据库
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

fn lock(mutex: &Mutex<()>) -> Result<MutexGuard<'_, ()>> {
    mutex
        .lock()
        .map_err(|e| DataError::Concurrency(e.to_string()))
}

/// 建表（若不存在）并校验表结构
fn bootstrap(backend: &dyn SettingsBackend, dialect: &dyn Dialect) -> Result<()> {
    if !backend.table_exists(SETTINGS_TABLE)? {
        tracing::info!(table = SETTINGS_TABLE, "settings 表不存在，开始创建");
        backend
            .execute_raw(&dialect.render(Statement::CreateTable))
            .map_err(|e| DataError::TableCreation(Box::new(e)))?;
    }

    let columns = backend.column_names(&dialect.render(Statement::DescribeColumns))?;
    let missing: Vec<String> = [NAME_COLUMN, VALUE_COLUMN]
        .into_iter()
        .filter(|required| !columns.iter().any(|c| c.eq_ignore_ascii_case(required)))
        .map(str::to_string)
        .collect();

    if !missing.is_empty() {
        tracing::error!(?columns, ?missing, "settings 表结构不兼容");
        return Err(DataError::IncompatibleSchema { missing });
    }

    Ok(())
}
