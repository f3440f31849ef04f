//! 流表核心模块 - 表接口契约与单/双哈希实现

pub mod bucket;
pub mod config;
pub mod cursor;
pub mod double_hash_table;
pub mod hash_table;

#[cfg(test)]
pub(crate) mod test_util;

pub use bucket::Bucket;
pub use config::{DoubleHashTableConfig, HashTableConfig, DEFAULT_CONFIG};
pub use cursor::{CursorPhase, DoubleHashCursor, HashCursor, TableCursor};
pub use double_hash_table::DoubleHashTable;
pub use hash_table::HashTable;

use crate::{
    error::{FlowTableError, InsertOutcome, InsertRejected},
    flow::{ExpiryNotifier, FlowEntry, FlowKey},
    stats::{OperationStatsSnapshot, TableStats},
};

/// 流表接口 - 调用方以多态方式使用的统一契约
///
/// 新的表类型实现同一契约即可，调用方无需改动。调用方负责串行化所有访问。
pub trait FlowTable<E: FlowEntry> {
    /// 查找精确匹配的条目 (借用视图)
    fn lookup(&self, key: &FlowKey) -> Option<&E>;

    /// 查找精确匹配的条目 (可变借用)，不得修改条目的键
    fn lookup_mut(&mut self, key: &FlowKey) -> Option<&mut E>;

    /// 插入条目，拒绝时条目交还调用方
    fn insert(&mut self, entry: E) -> Result<InsertOutcome, InsertRejected<E>>;

    /// 删除条目，返回删除数量
    fn delete(&mut self, key: &FlowKey, strict: bool) -> usize;

    /// 释放所有过期条目，每个条目释放前通知一次，返回过期数量
    fn timeout(&mut self, notifier: &mut dyn ExpiryNotifier<E>) -> usize;

    /// 创建游标
    fn cursor(&self) -> TableCursor<'_, E>;

    fn stats(&self) -> TableStats;

    fn operation_stats(&self) -> OperationStatsSnapshot;

    /// 释放所有条目和表本身，返回释放的条目数
    fn destroy(self: Box<Self>) -> usize;
}

impl<E: FlowEntry> FlowTable<E> for HashTable<E> {
    fn lookup(&self, key: &FlowKey) -> Option<&E> {
        HashTable::lookup(self, key)
    }

    fn lookup_mut(&mut self, key: &FlowKey) -> Option<&mut E> {
        HashTable::lookup_mut(self, key)
    }

    fn insert(&mut self, entry: E) -> Result<InsertOutcome, InsertRejected<E>> {
        HashTable::insert(self, entry)
    }

    fn delete(&mut self, key: &FlowKey, strict: bool) -> usize {
        HashTable::delete(self, key, strict)
    }

    fn timeout(&mut self, notifier: &mut dyn ExpiryNotifier<E>) -> usize {
        HashTable::timeout(self, notifier)
    }

    fn cursor(&self) -> TableCursor<'_, E> {
        TableCursor::Hash(HashTable::cursor(self))
    }

    fn stats(&self) -> TableStats {
        HashTable::stats(self)
    }

    fn operation_stats(&self) -> OperationStatsSnapshot {
        HashTable::operation_stats(self)
    }

    fn destroy(self: Box<Self>) -> usize {
        HashTable::destroy(*self)
    }
}

impl<E: FlowEntry> FlowTable<E> for DoubleHashTable<E> {
    fn lookup(&self, key: &FlowKey) -> Option<&E> {
        DoubleHashTable::lookup(self, key)
    }

    fn lookup_mut(&mut self, key: &FlowKey) -> Option<&mut E> {
        DoubleHashTable::lookup_mut(self, key)
    }

    fn insert(&mut self, entry: E) -> Result<InsertOutcome, InsertRejected<E>> {
        DoubleHashTable::insert(self, entry)
    }

    fn delete(&mut self, key: &FlowKey, strict: bool) -> usize {
        DoubleHashTable::delete(self, key, strict)
    }

    fn timeout(&mut self, notifier: &mut dyn ExpiryNotifier<E>) -> usize {
        DoubleHashTable::timeout(self, notifier)
    }

    fn cursor(&self) -> TableCursor<'_, E> {
        TableCursor::Hash2(DoubleHashTable::cursor(self))
    }

    fn stats(&self) -> TableStats {
        DoubleHashTable::stats(self)
    }

    fn operation_stats(&self) -> OperationStatsSnapshot {
        DoubleHashTable::operation_stats(self)
    }

    fn destroy(self: Box<Self>) -> usize {
        DoubleHashTable::destroy(*self)
    }
}

/// 创建单哈希表
///
/// # Panics
///
/// `bucket_count` 不是非零的2的幂时 panic。
pub fn create_single<E: FlowEntry + 'static>(
    polynomial: u32,
    bucket_count: usize,
) -> Result<Box<dyn FlowTable<E>>, FlowTableError> {
    Ok(Box::new(HashTable::new(polynomial, bucket_count)?))
}

/// 创建双哈希表，失败时已分配的子表全部释放
///
/// # Panics
///
/// 任一桶数量不是非零的2的幂时 panic。
pub fn create_double<E: FlowEntry + 'static>(
    poly0: u32,
    buckets0: usize,
    poly1: u32,
    buckets1: usize,
) -> Result<Box<dyn FlowTable<E>>, FlowTableError> {
    Ok(Box::new(DoubleHashTable::new(poly0, buckets0, poly1, buckets1)?))
}
