//! LocalStorage 封装模块
//!
//! `KeyValueStore` 抽象持久化存储，`LocalStorage` 基于 `web_sys::Storage` 实现。

use serde::{Serialize, de::DeserializeOwned};

/// 抽象键值存储接口
pub trait KeyValueStore {
    /// 键不存在或发生错误时返回 None
    fn get(&self, key: &str) -> Option<String>;
    /// 写入成功返回 true
    fn set(&self, key: &str, value: &str) -> bool;
    /// 删除成功返回 true
    fn delete(&self, key: &str) -> bool;

    /// 读取 JSON 值；解析失败时删除该键并返回 None
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.get(key)?;
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("[Storage] Discarding malformed value under '{}': {}", key, e);
                self.delete(key);
                None
            }
        }
    }

    fn set_json<T: Serialize>(&self, key: &str, value: &T) -> bool {
        match serde_json::to_string(value) {
            Ok(raw) => self.set(key, &raw),
            Err(e) => {
                log::error!("[Storage] Failed to serialize '{}': {}", key, e);
                false
            }
        }
    }
}

/// 浏览器 LocalStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn delete(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

// =========================================================
// 测试环境实现 (Mock)
// =========================================================

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    pub struct MockStorage {
        pub map: RefCell<HashMap<String, String>>,
    }

    impl MockStorage {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(self, key: &str, value: &str) -> Self {
            self.map.borrow_mut().insert(key.to_string(), value.to_string());
            self
        }

        pub fn contains(&self, key: &str) -> bool {
            self.map.borrow().contains_key(key)
        }
    }

    impl KeyValueStore for MockStorage {
        fn get(&self, key: &str) -> Option<String> {
            self.map.borrow().get(key).cloned()
        }

        fn set(&self, key: &str, value: &str) -> bool {
            self.map.borrow_mut().insert(key.to_string(), value.to_string());
            true
        }

        fn delete(&self, key: &str) -> bool {
            self.map.borrow_mut().remove(key);
            true
        }
    }

    #[test]
    fn test_malformed_json_is_discarded() {
        let storage = MockStorage::new().with("auth-session", "{not json");
        let value: Option<serde_json::Value> = storage.get_json("auth-session");
        assert!(value.is_none());
        assert!(!storage.contains("auth-session"));
    }

    #[test]
    fn test_json_round_trip() {
        let storage = MockStorage::new();
        assert!(storage.set_json("k", &vec![1, 2, 3]));
        assert_eq!(storage.get_json::<Vec<i32>>("k"), Some(vec![1, 2, 3]));
    }
}
