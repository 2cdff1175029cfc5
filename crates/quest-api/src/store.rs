//! 内存存储
//!
//! 使用 DashMap 实现的并发内存存储，服务重启后数据丢失。

use dashmap::DashMap;
use std::sync::Arc;

/// 通用内存存储，克隆后共享同一份数据
#[derive(Debug)]
pub struct MemoryStore<T> {
    data: Arc<DashMap<String, T>>,
}

impl<T: Clone> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            data: Arc::new(DashMap::new()),
        }
    }

    /// 插入或覆盖
    pub fn insert(&self, id: &str, value: T) {
        self.data.insert(id.to_string(), value);
    }

    /// 返回数据的克隆，不持有锁
    pub fn get(&self, id: &str) -> Option<T> {
        self.data.get(id).map(|v| v.clone())
    }

    pub fn remove(&self, id: &str) -> Option<T> {
        self.data.remove(id).map(|(_, v)| v)
    }

    /// 在持有该条目写锁期间修改数据
    ///
    /// 条目不存在时返回 None；闭包内不要再访问同一个 store
    pub fn update<R>(&self, id: &str, f: impl FnOnce(&mut T) -> R) -> Option<R> {
        self.data.get_mut(id).map(|mut entry| f(entry.value_mut()))
    }

    /// 持有该键的写锁执行闭包，键不存在时先写入默认值
    ///
    /// 同一个键上的调用串行执行；闭包内不要再访问同一个 store
    pub fn with_lock<R>(&self, id: &str, f: impl FnOnce(&mut T) -> R) -> R
    where
        T: Default,
    {
        let mut entry = self.data.entry(id.to_string()).or_default();
        f(entry.value_mut())
    }

    pub fn list(&self) -> Vec<T> {
        self.data
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn list_by<F>(&self, predicate: F) -> Vec<T>
    where
        F: Fn(&T) -> bool,
    {
        self.data
            .iter()
            .filter(|entry| predicate(entry.value()))
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn count(&self) -> usize {
        self.data.len()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.data.contains_key(id)
    }
}

impl<T: Clone> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            data: Arc::clone(&self.data),
        }
    }
}
