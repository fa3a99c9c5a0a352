//! 统一错误类型定义
//!
//! 使用 `thiserror` 定义 settings 存储层的所有错误类型。
//! 初始化阶段的错误会直接返回给调用方；运行期的读写错误由
//! 便捷接口记录日志后吞掉，只有 `try_*` 系列接口才会返回。

use std::path::PathBuf;
use thiserror::Error;

/// settings 存储层的统一错误类型
#[derive(Error, Debug)]
pub enum DataError {
    /// 数据库错误（rusqlite）
    #[error("数据库错误: {0}")]
    Database(#[from] rusqlite::Error),

    /// 其他后端实现返回的错误
    #[error("后端错误: {0}")]
    Backend(String),

    /// 文件 I/O 错误
    #[error("文件 I/O 错误: {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 配置文件解析错误
    #[error("配置解析错误: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// 锁中毒等并发错误
    #[error("并发错误: {0}")]
    Concurrency(String),

    /// 重复初始化
    #[error("settings 已初始化，不能重复绑定数据库句柄")]
    AlreadyInitialized,

    /// 尚未初始化
    #[error("settings 尚未初始化")]
    NotInitialized,

    /// 建表失败
    #[error("创建 settings 表失败: {0}")]
    TableCreation(#[source] Box<DataError>),

    /// 已存在的同名表结构不兼容
    #[error("settings 表结构不受支持，缺少列: {}", .missing.join(", "))]
    IncompatibleSchema { missing: Vec<String> },

    /// 分布式 ID 生成失败
    #[error("ID 生成失败: {0}")]
    IdGeneration(String),
}

/// 便于与现有代码集成的类型别名
pub type Result<T> = std::result::Result<T, DataError>;

impl DataError {
    /// 从 `std::io::Error` 和路径创建 I/O 错误
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// 是否属于初始化阶段的配置错误
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::AlreadyInitialized
                | Self::TableCreation(_)
                | Self::IncompatibleSchema { .. }
        )
    }
}
