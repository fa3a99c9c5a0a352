// 存储配置与日志配置，均可从 TOML 文件加载

use crate::data::dialect::DialectKind;
use crate::data::{DataError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 日志级别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// 日志输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOutput {
    #[default]
    Console,
    File,
    Both,
}

/// 日志配置
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// 日志目录，仅文件输出时使用
    pub file_path: Option<String>,
}

/// settings 存储配置
///
/// ```toml
/// auto_id = true
/// dialect = "postgres"
/// node_id = 7
///
/// [log]
/// level = "debug"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// 插入新行时由分布式 ID 生成器分配 id
    pub auto_id: bool,
    /// 语句方言，缺省时使用数据库句柄的原生方言
    pub dialect: Option<DialectKind>,
    /// ID 生成器的节点号，缺省时取进程号低 16 位
    pub node_id: Option<u16>,
    pub log: LogConfig,
}

impl StoreConfig {
    /// 从 TOML 文本解析
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// 从 TOML 文件加载
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| DataError::io(path, e))?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = StoreConfig::default();
        assert!(!config.auto_id);
        assert!(config.dialect.is_none());
        assert!(config.node_id.is_none());
        assert_eq!(config.log.level, LogLevel::Info);
        assert_eq!(config.log.output, LogOutput::Console);
    }

    #[test]
    fn test_parse_full_config() {
        let config = StoreConfig::from_toml_str(
            r#"
            auto_id = true
            dialect = "postgres"
            node_id = 7

            [log]
            level = "debug"
            format = "json"
            output = "both"
            file_path = "/tmp/logs"
            "#,
        )
        .unwrap();

        assert!(config.auto_id);
        assert_eq!(config.dialect, Some(DialectKind::Postgres));
        assert_eq!(config.node_id, Some(7));
        assert_eq!(config.log.level, LogLevel::Debug);
        assert_eq!(config.log.format, LogFormat::Json);
        assert_eq!(config.log.output, LogOutput::Both);
        assert_eq!(config.log.file_path.as_deref(), Some("/tmp/logs"));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config = StoreConfig::from_toml_str("auto_id = true").unwrap();
        assert!(config.auto_id);
        assert_eq!(config.log, LogConfig::default());
    }

    #[test]
    fn test_invalid_config() {
        let result = StoreConfig::from_toml_str("dialect = \"oracle\"");
        assert!(matches!(result, Err(DataError::ConfigParse(_))));
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.toml");
        std::fs::write(&path, "node_id = 3\n").unwrap();

        let config = StoreConfig::load(&path).unwrap();
        assert_eq!(config.node_id, Some(3));
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let result = StoreConfig::load(&temp_dir.path().join("missing.toml"));
        assert!(matches!(result, Err(DataError::Io { .. })));
    }
}
