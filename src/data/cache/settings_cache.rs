//! settings 名称 → 值 缓存
//!
//! 由单个 store 实例持有，读多写少，使用 `RwLock<HashMap>`。
//! 不做淘汰、不做过期；锁中毒时退化为"未命中"或空操作，不会 panic。

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// settings 缓存
#[derive(Debug, Clone, Default)]
pub struct SettingsCache {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl SettingsCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// 获取缓存值
    pub fn get(&self, name: &str) -> Option<String> {
        let entries = self.entries.read().ok()?;
        entries.get(name).cloned()
    }

    /// 写入（覆盖）缓存值
    pub fn insert(&self, name: &str, value: &str) {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(name.to_string(), value.to_string());
        }
    }

    /// 仅在缺失时写入，返回缓存中最终的值
    ///
    /// 读穿透回填使用此方法：数据库查询期间若有并发写入，
    /// 以写入方的值为准，不会被较旧的数据库值覆盖。
    pub fn insert_if_absent(&self, name: &str, value: String) -> String {
        match self.entries.write() {
            Ok(mut entries) => entries.entry(name.to_string()).or_insert(value).clone(),
            Err(_) => value,
        }
    }

    /// 移除缓存值，返回是否存在
    pub fn remove(&self, name: &str) -> bool {
        self.entries
            .write()
            .map(|mut entries| entries.remove(name).is_some())
            .unwrap_or(false)
    }

    /// 清空所有缓存
    pub fn clear(&self) {
        if let Ok(mut entries) = self.entries.write() {
            entries.clear();
        }
    }

    /// 获取当前缓存项数量
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    /// 检查缓存是否为空
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 导出当前缓存内容
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.entries
            .read()
            .map(|e| e.clone())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_insert_and_get() {
        let cache = SettingsCache::new();
        cache.insert("site_name", "duck");

        assert_eq!(cache.get("site_name").as_deref(), Some("duck"));
        assert!(cache.get("missing").is_none());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_overwrites() {
        let cache = SettingsCache::new();
        cache.insert("k", "a");
        cache.insert("k", "b");

        assert_eq!(cache.get("k").as_deref(), Some("b"));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let cache = SettingsCache::new();
        cache.insert("k", "fresh");

        let kept = cache.insert_if_absent("k", "stale".to_string());
        assert_eq!(kept, "fresh");
        assert_eq!(cache.get("k").as_deref(), Some("fresh"));

        let added = cache.insert_if_absent("other", "v".to_string());
        assert_eq!(added, "v");
    }

    #[test]
    fn test_remove() {
        let cache = SettingsCache::new();
        cache.insert("k", "v");

        assert!(cache.remove("k"));
        assert!(!cache.remove("k"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear_and_snapshot() {
        let cache = SettingsCache::new();
        cache.insert("a", "1");
        cache.insert("b", "2");

        let snapshot = cache.snapshot();
        assert_eq!(snapshot.get("a").map(String::as_str), Some("1"));
        assert_eq!(snapshot.len(), 2);

        cache.clear();
        assert!(cache.is_empty());
    }

    #[test]
    fn test_concurrent_writers() {
        let cache = SettingsCache::new();

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let cache = cache.clone();
                thread::spawn(move || {
                    for j in 0..100 {
                        cache.insert(&format!("key-{i}-{j}"), "v");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len(), 800);
    }
}
