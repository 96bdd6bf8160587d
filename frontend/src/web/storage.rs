//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 访问浏览器本地存储。值按原始字符串存取，
//! 与其他页面脚本写入的 `userId` / `username` 保持兼容。

/// 键值存储抽象，便于在非浏览器环境下替换
pub trait KeyValueStorage {
    /// 获取存储的字符串值
    fn get(&self, key: &str) -> Option<String>;
    /// 设置存储值，返回是否成功
    fn set(&self, key: &str, value: &str) -> bool;
    /// 删除存储的键值对，返回是否成功
    fn delete(&self, key: &str) -> bool;
}

/// 浏览器 LocalStorage
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl KeyValueStorage for LocalStorage {
    /// # 返回
    /// - `Some(String)` 如果键存在且有值
    /// - `None` 如果键不存在或发生错误
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
// 测试工具: MemoryStorage
// =========================================================

#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage {
    values: std::cell::RefCell<std::collections::HashMap<String, String>>,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(entries: &[(&str, &str)]) -> Self {
        let storage = Self::new();
        for (k, v) in entries {
            storage.set(k, v);
        }
        storage
    }

    pub fn len(&self) -> usize {
        self.values.borrow().len()
    }
}

#[cfg(test)]
impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.values.borrow().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> bool {
        self.values
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        true
    }

    fn delete(&self, key: &str) -> bool {
        self.values.borrow_mut().remove(key);
        true
    }
}
