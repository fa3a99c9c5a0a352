//! settings 表中的一行

use serde::{Deserialize, Serialize};

/// 一条 settings 记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Setting {
    /// 行主键；仅存在于缓存中的记录没有 id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub value: String,
}

impl Setting {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            value: value.into(),
        }
    }
}
