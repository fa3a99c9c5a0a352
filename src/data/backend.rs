//! 数据库句柄抽象
//!
//! settings 存储层不负责连接池、重试和驱动选择，这些都由外部提供的
//! 句柄决定。这里只定义存储层需要的最小能力集合。

use super::dialect::DialectKind;
use super::Result;

/// 语句参数（借用形式，避免为每次调用分配）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlParam<'a> {
    Int(i64),
    Text(&'a str),
}

impl<'a> From<&'a str> for SqlParam<'a> {
    fn from(v: &'a str) -> Self {
        SqlParam::Text(v)
    }
}

impl From<i64> for SqlParam<'_> {
    fn from(v: i64) -> Self {
        SqlParam::Int(v)
    }
}

/// 外部提供的数据库句柄
///
/// 所有调用均为阻塞调用。
pub trait SettingsBackend: Send + Sync {
    /// 查询目录表判断表是否存在
    fn table_exists(&self, table: &str) -> Result<bool>;

    /// 执行 DDL 等原始 SQL
    fn execute_raw(&self, sql: &str) -> Result<()>;

    /// 获取查询结果集的列名
    fn column_names(&self, sql: &str) -> Result<Vec<String>>;

    /// 读取首行首列的文本值，无结果时返回 `None`
    fn query_text(&self, sql: &str, params: &[SqlParam<'_>]) -> Result<Option<String>>;

    /// 读取 `COUNT(*)` 之类的整数结果
    fn query_count(&self, sql: &str, params: &[SqlParam<'_>]) -> Result<i64>;

    /// 执行更新/插入/删除，返回受影响的行数
    fn execute(&self, sql: &str, params: &[SqlParam<'_>]) -> Result<usize>;

    /// 驱动原生使用的语句方言
    fn default_dialect(&self) -> DialectKind;
}
