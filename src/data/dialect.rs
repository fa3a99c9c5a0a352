//! SQL 方言
//!
//! 每种后端的占位符风格和"忽略重复键插入"写法不同，
//! 存储层在初始化时选定一种方言，之后所有语句都由它渲染。
//!
//! - `Sqlite`: `?` 占位符，`ON CONFLICT(name) DO NOTHING`
//! - `MySql`: `?` 占位符，`INSERT IGNORE`
//! - `Postgres`: `$1, $2...` 占位符，`ON CONFLICT (name) DO NOTHING`

use serde::{Deserialize, Serialize};

/// settings 表名
pub const SETTINGS_TABLE: &str = "settings";
/// 名称列
pub const NAME_COLUMN: &str = "name";
/// 值列
pub const VALUE_COLUMN: &str = "value";

/// 存储层会执行的全部语句
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Statement {
    /// 建表
    CreateTable,
    /// 读取一行用于校验列名
    DescribeColumns,
    /// 按名称读取值
    SelectValue,
    /// 按名称计数
    CountByName,
    /// 插入 (name, value)，忽略重复名称
    Insert,
    /// 插入 (id, name, value)，忽略重复名称
    InsertWithId,
    /// 按名称更新值
    UpdateValue,
    /// 按名称删除
    DeleteByName,
}

/// 语句渲染策略
pub trait Dialect: Send + Sync {
    /// 第 `n` 个参数（从 1 开始）的占位符
    fn placeholder(&self, n: usize) -> String;

    /// 建表 DDL
    fn create_table_sql(&self) -> String;

    /// 忽略重复名称的插入语句
    fn insert_ignore_sql(&self, columns: &[&str]) -> String;

    /// 渲染指定语句
    fn render(&self, statement: Statement) -> String {
        let p = |n| self.placeholder(n);
        match statement {
            Statement::CreateTable => self.create_table_sql(),
            Statement::DescribeColumns => format!("SELECT * FROM {SETTINGS_TABLE} LIMIT 1"),
            Statement::SelectValue => format!(
                "SELECT {VALUE_COLUMN} FROM {SETTINGS_TABLE} WHERE {NAME_COLUMN} = {}",
                p(1)
            ),
            Statement::CountByName => format!(
                "SELECT COUNT(*) FROM {SETTINGS_TABLE} WHERE {NAME_COLUMN} = {}",
                p(1)
            ),
            Statement::Insert => self.insert_ignore_sql(&[NAME_COLUMN, VALUE_COLUMN]),
            Statement::InsertWithId => self.insert_ignore_sql(&["id", NAME_COLUMN, VALUE_COLUMN]),
            Statement::UpdateValue => format!(
                "UPDATE {SETTINGS_TABLE} SET {VALUE_COLUMN} = {} WHERE {NAME_COLUMN} = {}",
                p(1),
                p(2)
            ),
            Statement::DeleteByName => format!(
                "DELETE FROM {SETTINGS_TABLE} WHERE {NAME_COLUMN} = {}",
                p(1)
            ),
        }
    }
}

fn value_list<D: Dialect + ?Sized>(dialect: &D, count: usize) -> String {
    (1..=count)
        .map(|n| dialect.placeholder(n))
        .collect::<Vec<_>>()
        .join(", ")
}

/// SQLite 方言
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl Dialect for SqliteDialect {
    fn placeholder(&self, _n: usize) -> String {
        "?".to_string()
    }

    fn create_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {SETTINGS_TABLE} (
                id INTEGER PRIMARY KEY,
                {NAME_COLUMN} VARCHAR(200) NOT NULL UNIQUE,
                {VALUE_COLUMN} TEXT NOT NULL
            )"
        )
    }

    fn insert_ignore_sql(&self, columns: &[&str]) -> String {
        format!(
            "INSERT INTO {SETTINGS_TABLE} ({}) VALUES ({}) ON CONFLICT({NAME_COLUMN}) DO NOTHING",
            columns.join(", "),
            value_list(self, columns.len())
        )
    }
}

/// MySQL 方言
#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

impl Dialect for MySqlDialect {
    fn placeholder(&self, _n: usize) -> String {
        "?".to_string()
    }

    fn create_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS `{SETTINGS_TABLE}` (
                `id` BIGINT UNSIGNED NOT NULL AUTO_INCREMENT COMMENT 'pk',
                `{NAME_COLUMN}` VARCHAR(200) COLLATE utf8mb4_bin NOT NULL COMMENT 'varname',
                `{VALUE_COLUMN}` TEXT COLLATE utf8mb4_bin NOT NULL,
                PRIMARY KEY (`id`),
                UNIQUE KEY `name_UNIQUE` (`{NAME_COLUMN}`)
            ) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin"
        )
    }

    fn insert_ignore_sql(&self, columns: &[&str]) -> String {
        format!(
            "INSERT IGNORE INTO {SETTINGS_TABLE} ({}) VALUES ({})",
            columns.join(", "),
            value_list(self, columns.len())
        )
    }
}

/// PostgreSQL 方言
#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl Dialect for PostgresDialect {
    fn placeholder(&self, n: usize) -> String {
        format!("${n}")
    }

    fn create_table_sql(&self) -> String {
        format!(
            "CREATE TABLE IF NOT EXISTS {SETTINGS_TABLE} (
                id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
                {NAME_COLUMN} VARCHAR(200) NOT NULL UNIQUE,
                {VALUE_COLUMN} TEXT NOT NULL
            )"
        )
    }

    fn insert_ignore_sql(&self, columns: &[&str]) -> String {
        format!(
            "INSERT INTO {SETTINGS_TABLE} ({}) VALUES ({}) ON CONFLICT ({NAME_COLUMN}) DO NOTHING",
            columns.join(", "),
            value_list(self, columns.len())
        )
    }
}

/// 可配置的方言类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DialectKind {
    Sqlite,
    MySql,
    Postgres,
}

impl DialectKind {
    /// 兼容旧的布尔开关：`true` 为编号占位符（PostgreSQL），否则为 MySQL
    pub fn from_numbered(pg: bool) -> Self {
        if pg {
            DialectKind::Postgres
        } else {
            DialectKind::MySql
        }
    }

    /// 获取对应的渲染策略
    pub fn dialect(self) -> &'static dyn Dialect {
        match self {
            DialectKind::Sqlite => &SqliteDialect,
            DialectKind::MySql => &MySqlDialect,
            DialectKind::Postgres => &PostgresDialect,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DialectKind::Sqlite => "sqlite",
            DialectKind::MySql => "mysql",
            DialectKind::Postgres => "postgres",
        }
    }
}

impl std::fmt::Display for DialectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
