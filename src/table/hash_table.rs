//! 单哈希表 - 直接映射、无链表的定长流表
//!
//! 每个键只映射到 `hash(key) & bucket_mask` 一个桶。同键插入替换旧条目，
//! 不同键落到已占用的桶时拒绝插入，从不静默驱逐。

use crate::{
    error::{FlowTableError, InsertOutcome, InsertRejected, RejectReason},
    flow::{ExpiryNotifier, FlowEntry, FlowKey},
    hash::{build_hasher, calculate_bucket, FlowHasher, HashAlgorithm},
    stats::{AtomicOperationStats, OperationStatsSnapshot, OperationType, TableStats},
    table::{bucket::Bucket, config::HashTableConfig, cursor::HashCursor},
};
use std::{fmt, mem};

/// 单哈希表
pub struct HashTable<E> {
    buckets: Box<[Bucket<E>]>,
    // 桶数量减一
    bucket_mask: usize,
    n_flows: usize,
    polynomial: u32,
    algorithm: HashAlgorithm,
    hasher: Box<dyn FlowHasher>,
    counters: AtomicOperationStats,
}

impl<E: FlowEntry> HashTable<E> {
    /// 表类型名称
    pub const NAME: &'static str = "hash";

    /// 以CRC-32多项式创建表
    ///
    /// # Panics
    ///
    /// `bucket_count` 不是非零的2的幂时 panic，这是调用方的编程错误。
    pub fn new(polynomial: u32, bucket_count: usize) -> Result<Self, FlowTableError> {
        Self::with_config(HashTableConfig::new(polynomial, bucket_count))
    }

    /// 按配置创建表，桶数组分配失败时返回 `AllocationFailed`
    pub fn with_config(config: HashTableConfig) -> Result<Self, FlowTableError> {
        let n_buckets = config.bucket_count;
        assert!(
            n_buckets.is_power_of_two(),
            "桶数量必须是非零的2的幂: {}",
            n_buckets
        );

        let mut buckets = Vec::new();
        if buckets.try_reserve_exact(n_buckets).is_err() {
            log_error!("failed to allocate {} buckets", n_buckets);
            return Err(FlowTableError::AllocationFailed {
                size: n_buckets.saturating_mul(mem::size_of::<Bucket<E>>()),
                align: mem::align_of::<Bucket<E>>(),
            });
        }
        buckets.resize_with(n_buckets, Bucket::empty);

        log_info!(
            "hash table created: buckets={}, polynomial=0x{:08x}, algorithm={:?}",
            n_buckets,
            config.polynomial,
            config.algorithm
        );

        Ok(Self {
            buckets: buckets.into_boxed_slice(),
            bucket_mask: n_buckets - 1,
            n_flows: 0,
            polynomial: config.polynomial,
            algorithm: config.algorithm,
            hasher: build_hasher(config.algorithm, config.polynomial),
            counters: AtomicOperationStats::new(),
        })
    }

    /// 键对应的桶索引，对整个定长键表示求摘要
    pub fn bucket_index(&self, key: &FlowKey) -> usize {
        calculate_bucket(self.hasher.hash_bytes(&key.to_bytes()), self.bucket_mask)
    }

    /// 查找精确匹配的条目
    pub fn lookup(&self, key: &FlowKey) -> Option<&E> {
        let found = self.find(key);
        self.counters.record_lookup(found.is_some());
        found
    }

    /// 查找精确匹配的条目，可变借用
    ///
    /// 调用方不得修改条目的键。
    pub fn lookup_mut(&mut self, key: &FlowKey) -> Option<&mut E> {
        let index = self.bucket_index(key);
        let found = self.buckets[index]
            .get_mut()
            .filter(|flow| flow.key() == key);
        self.counters.record_lookup(found.is_some());
        found
    }

    /// 插入条目
    ///
    /// 带通配符的键、或目标桶被其他键占用时拒绝，条目原样交还。
    pub fn insert(&mut self, entry: E) -> Result<InsertOutcome, InsertRejected<E>> {
        let result = self.insert_entry(entry);
        self.counters.record_insert(
            matches!(result, Ok(InsertOutcome::Replaced)),
            result.is_err(),
        );
        result
    }

    /// 删除条目，返回删除数量
    ///
    /// 精确键只检查目标桶；带通配符的键扫描全表，按 `matches_for_delete` 删除。
    pub fn delete(&mut self, key: &FlowKey, strict: bool) -> usize {
        let count = self.delete_entries(key, strict);
        self.counters.record_delete(count);
        count
    }

    /// 扫描全表释放过期条目，释放前逐个通知，返回过期数量
    pub fn timeout(&mut self, notifier: &mut dyn ExpiryNotifier<E>) -> usize {
        let count = self.expire_entries(notifier);
        self.counters.record_timeout(count);
        count
    }

    /// 按桶顺序遍历已占用的条目
    pub fn cursor(&self) -> HashCursor<'_, E> {
        self.counters.record_count(OperationType::Iterate);
        HashCursor::new(self)
    }

    /// 释放所有条目和桶数组，返回释放的条目数
    pub fn destroy(mut self) -> usize {
        let freed = self.buckets.iter_mut().filter_map(Bucket::take).count();
        log_info!("hash table destroyed: {} flows freed", freed);
        freed
    }

    pub fn stats(&self) -> TableStats {
        TableStats {
            name: Self::NAME,
            n_flows: self.n_flows,
            max_flows: self.bucket_mask + 1,
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
        self.n_flows
    }

    pub fn is_empty(&self) -> bool {
        self.n_flows == 0
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn polynomial(&self) -> u32 {
        self.polynomial
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }

    pub(crate) fn buckets(&self) -> &[Bucket<E>] {
        &self.buckets
    }

    /// 不计数的查找，供双哈希表探测子表
    pub(crate) fn find(&self, key: &FlowKey) -> Option<&E> {
        self.buckets[self.bucket_index(key)]
            .get()
            .filter(|flow| flow.key() == key)
    }

    pub(crate) fn find_mut(&mut self, key: &FlowKey) -> Option<&mut E> {
        let index = self.bucket_index(key);
        self.buckets[index]
            .get_mut()
            .filter(|flow| flow.key() == key)
    }

    pub(crate) fn insert_entry(&mut self, entry: E) -> Result<InsertOutcome, InsertRejected<E>> {
        if !entry.key().is_exact() {
            return Err(InsertRejected::new(RejectReason::Wildcarded, entry));
        }

        let index = self.bucket_index(entry.key());
        let bucket = &mut self.buckets[index];
        let same_key = bucket.get().map(|old| old.key() == entry.key());
        match same_key {
            None => {
                bucket.replace(entry);
                self.n_flows += 1;
                Ok(InsertOutcome::Inserted)
            }
            Some(true) => {
                // 旧条目在此释放
                drop(bucket.replace(entry));
                log_debug!("replaced flow in bucket {}", index);
                Ok(InsertOutcome::Replaced)
            }
            Some(false) => {
                log_debug!("bucket {} occupied by a different key, insert rejected", index);
                Err(InsertRejected::new(
                    RejectReason::BucketOccupied { bucket: index },
                    entry,
                ))
            }
        }
    }

    pub(crate) fn delete_entries(&mut self, key: &FlowKey, strict: bool) -> usize {
        let count = if key.is_exact() {
            let index = self.bucket_index(key);
            self.buckets[index]
                .take_if(|flow| flow.key() == key)
                .map_or(0, |_| 1)
        } else {
            let count = self
                .buckets
                .iter_mut()
                .filter_map(|bucket| bucket.take_if(|flow| flow.matches_for_delete(key, strict)))
                .count();
            log_debug!("wildcard delete removed {} flows (strict={})", count, strict);
            count
        };
        self.n_flows -= count;
        count
    }

    pub(crate) fn expire_entries(&mut self, notifier: &mut dyn ExpiryNotifier<E>) -> usize {
        let mut count = 0;
        for bucket in self.buckets.iter_mut() {
            if let Some(flow) = bucket.take_if(|flow| flow.is_expired()) {
                notifier.flow_expired(&flow);
                drop(flow);
                count += 1;
            }
        }
        self.n_flows -= count;
        if count > 0 {
            log_debug!("timeout expired {} flows", count);
        }
        count
    }
}

impl<E: FlowEntry> fmt::Debug for HashTable<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stats = self.stats();
        f.debug_struct("HashTable")
            .field("n_flows", &stats.n_flows)
            .field("max_flows", &stats.max_flows)
            .field("polynomial", &format_args!("0x{:08x}", self.polynomial))
            .field("algorithm", &self.algorithm)
            .finish()
    }
}
