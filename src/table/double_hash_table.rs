//! 双哈希表 - 两个参数独立的单哈希表组成一个逻辑表
//!
//! 子表0拒绝的插入再尝试子表1。两个子表的地址空间由不同多项式决定，
//! 在一个子表冲突的两个键大概率不会在另一个子表冲突，从而在不引入链表的情况下
//! 提高有效负载因子。

use crate::{
    error::{FlowTableError, InsertOutcome, InsertRejected},
    flow::{ExpiryNotifier, FlowEntry, FlowKey},
    stats::{AtomicOperationStats, OperationStatsSnapshot, OperationType, TableStats},
    table::{
        config::DoubleHashTableConfig,
        cursor::DoubleHashCursor,
        hash_table::HashTable,
    },
};
use std::fmt;

/// 双哈希表
pub struct DoubleHashTable<E> {
    subtables: [HashTable<E>; 2],
    counters: AtomicOperationStats,
}

impl<E: FlowEntry> DoubleHashTable<E> {
    /// 表类型名称
    pub const NAME: &'static str = "hash2";

    /// 创建两个独立的CRC-32子表
    ///
    /// # Panics
    ///
    /// 任一桶数量不是非零的2的幂时 panic。
    pub fn new(
        poly0: u32,
        buckets0: usize,
        poly1: u32,
        buckets1: usize,
    ) -> Result<Self, FlowTableError> {
        Self::with_config(DoubleHashTableConfig::new(poly0, buckets0, poly1, buckets1))
    }

    /// 按配置创建，子表1失败时已创建的子表0随之释放
    pub fn with_config(config: DoubleHashTableConfig) -> Result<Self, FlowTableError> {
        let primary = HashTable::with_config(config.primary)?;
        let secondary = HashTable::with_config(config.secondary).map_err(|err| {
            log_error!("secondary subtable creation failed, releasing primary: {}", err);
            err
        })?;

        Ok(Self {
            subtables: [primary, secondary],
            counters: AtomicOperationStats::new(),
        })
    }

    /// 依次探测子表0、子表1，返回第一个精确匹配
    pub fn lookup(&self, key: &FlowKey) -> Option<&E> {
        let found = self.subtables.iter().find_map(|table| table.find(key));
        self.counters.record_lookup(found.is_some());
        found
    }

    pub fn lookup_mut(&mut self, key: &FlowKey) -> Option<&mut E> {
        let index = (0..2).find(|&i| self.subtables[i].find(key).is_some());
        self.counters.record_lookup(index.is_some());
        index.and_then(|i| self.subtables[i].find_mut(key))
    }

    /// 先插入子表0，被拒绝后再插入子表1；两个都拒绝时整体失败
    ///
    /// 键已在子表1时原地替换，同一个键不会同时存在于两个子表。
    pub fn insert(&mut self, entry: E) -> Result<InsertOutcome, InsertRejected<E>> {
        let result = if self.subtables[1].find(entry.key()).is_some() {
            self.subtables[1].insert_entry(entry)
        } else {
            match self.subtables[0].insert_entry(entry) {
                Ok(outcome) => Ok(outcome),
                Err(rejected) => self.subtables[1].insert_entry(rejected.into_entry()),
            }
        };
        self.counters.record_insert(
            matches!(result, Ok(InsertOutcome::Replaced)),
            result.is_err(),
        );
        result
    }

    /// 对两个子表都执行删除，不短路，返回删除总数
    pub fn delete(&mut self, key: &FlowKey, strict: bool) -> usize {
        let count = self.subtables[0].delete_entries(key, strict)
            + self.subtables[1].delete_entries(key, strict);
        self.counters.record_delete(count);
        count
    }

    /// 对两个子表分别做超时扫描，返回过期总数
    pub fn timeout(&mut self, notifier: &mut dyn ExpiryNotifier<E>) -> usize {
        let count = self.subtables[0].expire_entries(notifier)
            + self.subtables[1].expire_entries(notifier);
        self.counters.record_timeout(count);
        count
    }

    /// 子表0按桶顺序遍历后接着遍历子表1
    pub fn cursor(&self) -> DoubleHashCursor<'_, E> {
        self.counters.record_count(OperationType::Iterate);
        DoubleHashCursor::new(self)
    }

    /// 销毁两个子表，返回释放的条目数
    pub fn destroy(self) -> usize {
        let [primary, secondary] = self.subtables;
        primary.destroy() + secondary.destroy()
    }

    /// 两个子表统计按项求和
    pub fn stats(&self) -> TableStats {
        let substats = [self.subtables[0].stats(), self.subtables[1].stats()];
        TableStats {
            name: Self::NAME,
            n_flows: substats[0].n_flows + substats[1].n_flows,
            max_flows: substats[0].max_flows + substats[1].max_flows,
        }
    }

    pub fn operation_stats(&self) -> OperationStatsSnapshot {
        self.counters.snapshot()
    }

    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self) -> String {
        self.counters.export_prometheus(Self::NAME)
    }

    pub fn len(&self) -> usize {
        self.subtables[0].len() + self.subtables[1].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// 获取子表 (0或1)
    pub fn subtable(&self, index: usize) -> &HashTable<E> {
        &self.subtables[index]
    }
}

impl<E: FlowEntry> fmt::Debug for DoubleHashTable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DoubleHashTable")
            .field("subtable0", &self.subtables[0])
            .field("subtable1", &self.subtables[1])
            .finish()
    }
}
