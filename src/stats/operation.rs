// src/stats/operation.rs
//! 操作统计 - 跟踪流表操作计数

use std::sync::atomic::{AtomicU64, Ordering};

/// 操作类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationType {
    Lookup,
    Insert,
    Delete,
    Timeout,
    Iterate,
}

impl OperationType {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Lookup => "lookup",
            Self::Insert => "insert",
            Self::Delete => "delete",
            Self::Timeout => "timeout",
            Self::Iterate => "iterate",
        }
    }
}

/// 操作统计快照
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct OperationStatsSnapshot {
    pub lookup_count: u64,
    pub lookup_hit_count: u64,
    pub insert_count: u64,
    pub replace_count: u64,
    pub reject_count: u64,
    pub delete_count: u64,
    pub deleted_flows: u64,
    pub timeout_count: u64,
    pub expired_flows: u64,
    pub iterate_count: u64,
}

impl OperationStatsSnapshot {
    /// 查找命中率
    pub fn hit_rate(&self) -> f32 {
        if self.lookup_count == 0 {
            return 0.0;
        }
        self.lookup_hit_count as f32 / self.lookup_count as f32
    }
}

/// 原子操作统计，`&self` 即可计数
#[derive(Debug, Default)]
pub struct AtomicOperationStats {
    lookup_count: AtomicU64,
    lookup_hit_count: AtomicU64,
    insert_count: AtomicU64,
    replace_count: AtomicU64,
    reject_count: AtomicU64,
    delete_count: AtomicU64,
    deleted_flows: AtomicU64,
    timeout_count: AtomicU64,
    expired_flows: AtomicU64,
    iterate_count: AtomicU64,
}

impl AtomicOperationStats {
    /// 创建新统计
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录操作计数
    pub fn record_count(&self, op_type: OperationType) {
        match op_type {
            OperationType::Lookup => self.lookup_count.fetch_add(1, Ordering::Relaxed),
            OperationType::Insert => self.insert_count.fetch_add(1, Ordering::Relaxed),
            OperationType::Delete => self.delete_count.fetch_add(1, Ordering::Relaxed),
            OperationType::Timeout => self.timeout_count.fetch_add(1, Ordering::Relaxed),
            OperationType::Iterate => self.iterate_count.fetch_add(1, Ordering::Relaxed),
        };
    }

    pub fn record_lookup(&self, hit: bool) {
        self.record_count(OperationType::Lookup);
        if hit {
            self.lookup_hit_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_insert(&self, replaced: bool, rejected: bool) {
        self.record_count(OperationType::Insert);
        if replaced {
            self.replace_count.fetch_add(1, Ordering::Relaxed);
        }
        if rejected {
            self.reject_count.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_delete(&self, removed: usize) {
        self.record_count(OperationType::Delete);
        self.deleted_flows.fetch_add(removed as u64, Ordering::Relaxed);
    }

    pub fn record_timeout(&self, expired: usize) {
        self.record_count(OperationType::Timeout);
        self.expired_flows.fetch_add(expired as u64, Ordering::Relaxed);
    }

    /// 获取统计快照
    pub fn snapshot(&self) -> OperationStatsSnapshot {
        OperationStatsSnapshot {
            lookup_count: self.lookup_count.load(Ordering::Relaxed),
            lookup_hit_count: self.lookup_hit_count.load(Ordering::Relaxed),
            insert_count: self.insert_count.load(Ordering::Relaxed),
            replace_count: self.replace_count.load(Ordering::Relaxed),
            reject_count: self.reject_count.load(Ordering::Relaxed),
            delete_count: self.delete_count.load(Ordering::Relaxed),
            deleted_flows: self.deleted_flows.load(Ordering::Relaxed),
            timeout_count: self.timeout_count.load(Ordering::Relaxed),
            expired_flows: self.expired_flows.load(Ordering::Relaxed),
            iterate_count: self.iterate_count.load(Ordering::Relaxed),
        }
    }

    /// 重置统计
    pub fn reset(&self) {
        self.lookup_count.store(0, Ordering::Relaxed);
        self.lookup_hit_count.store(0, Ordering::Relaxed);
        self.insert_count.store(0, Ordering::Relaxed);
        self.replace_count.store(0, Ordering::Relaxed);
        self.reject_count.store(0, Ordering::Relaxed);
        self.delete_count.store(0, Ordering::Relaxed);
        self.deleted_flows.store(0, Ordering::Relaxed);
        self.timeout_count.store(0, Ordering::Relaxed);
        self.expired_flows.store(0, Ordering::Relaxed);
        self.iterate_count.store(0, Ordering::Relaxed);
    }

    /// 导出Prometheus格式指标
    pub fn export_prometheus(&self, table_name: &str) -> String {
        let snap = self.snapshot();
        let metrics = [
            ("lookup_total", snap.lookup_count),
            ("lookup_hit_total", snap.lookup_hit_count),
            ("insert_total", snap.insert_count),
            ("replace_total", snap.replace_count),
            ("reject_total", snap.reject_count),
            ("delete_total", snap.delete_count),
            ("deleted_flows_total", snap.deleted_flows),
            ("timeout_total", snap.timeout_count),
            ("expired_flows_total", snap.expired_flows),
            ("iterate_total", snap.iterate_count),
        ];

        let mut output = String::new();
        for (name, value) in metrics {
            output.push_str(&format!(
                "# TYPE flow_table_{} counter\nflow_table_{}{{table=\"{}\"}} {}\n",
                name, name, table_name, value
            ));
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_snapshot() {
        let stats = AtomicOperationStats::new();
        stats.record_lookup(true);
        stats.record_lookup(false);
        stats.record_insert(false, false);
        stats.record_insert(true, false);
        stats.record_insert(false, true);
        stats.record_delete(3);
        stats.record_timeout(2);
        stats.record_count(OperationType::Iterate);

        let snap = stats.snapshot();
        assert_eq!(snap.lookup_count, 2);
        assert_eq!(snap.lookup_hit_count, 1);
        assert_eq!(snap.insert_count, 3);
        assert_eq!(snap.replace_count, 1);
        assert_eq!(snap.reject_count, 1);
        assert_eq!(snap.delete_count, 1);
        assert_eq!(snap.deleted_flows, 3);
        assert_eq!(snap.timeout_count, 1);
        assert_eq!(snap.expired_flows, 2);
        assert_eq!(snap.iterate_count, 1);
        assert!((snap.hit_rate() - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_reset() {
        let stats = AtomicOperationStats::new();
        stats.record_lookup(true);
        stats.record_delete(5);
        stats.reset();
        assert_eq!(stats.snapshot(), OperationStatsSnapshot::default());
    }

    #[test]
    fn test_export_prometheus() {
        let stats = AtomicOperationStats::new();
        stats.record_lookup(true);
        let text = stats.export_prometheus("hash");
        assert!(text.contains("flow_table_lookup_total{table=\"hash\"} 1"));
        assert!(text.contains("# TYPE flow_table_reject_total counter"));
    }
}
