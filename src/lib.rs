//! 软件交换机精确匹配流表
//!
//! 数据通路逐包查询和修改的定长关联存储：把报文分类键映射到流表项 (匹配状态、动作、计时器)。
//!
//! ## 主要特性
//! - 直接映射单哈希表：每键一个桶，异键冲突拒绝插入，从不静默驱逐
//! - 双哈希表：两个参数独立的单哈希表组成一个逻辑表，提高有效负载因子
//! - 统一的表接口 [`FlowTable`]，以及覆盖两种表的只向前游标
//! - 超时扫描在释放条目前回调调用方的通知器
//!
//! ## 快速开始
//!
//! ```rust
//! use flow_hashtable::*;
//!
//! let mut table = HashTable::new(0x04C1_1DB7, 1024).expect("创建表失败");
//! let key = FlowKey { in_port: 1, dl_type: 0x0800, ..FlowKey::default() };
//!
//! table.insert(Flow::new(key, vec![Action::Output(2)])).expect("插入失败");
//! assert!(table.lookup(&key).is_some());
//!
//! assert_eq!(table.delete(&key, false), 1);
//! println!("{:?}", table.stats());
//! ```

#![warn(clippy::all)]

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        log::info!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        log::warn!($($arg)*)
    };
}

#[cfg(feature = "logging")]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        log::error!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "logging"))]
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {};
}

// 核心模块导出
pub mod error;
pub mod flow;
pub mod hash;
pub mod stats;
pub mod table;

// 公共接口导出
pub use crate::{
    error::{FlowTableError, InsertOutcome, InsertRejected, RejectReason},
    flow::{Action, ExpiryNotifier, Flow, FlowEntry, FlowKey, Wildcards, FLOW_KEY_LEN},
    hash::{build_hasher, Crc32, FlowHasher, HashAlgorithm},
    stats::{OperationStatsSnapshot, TableStats},
    table::{
        create_double, create_single, CursorPhase, DoubleHashCursor, DoubleHashTable,
        DoubleHashTableConfig, FlowTable, HashCursor, HashTable, HashTableConfig, TableCursor,
    },
};

/// 批量插入，返回成功插入或替换的数量；被拒绝的条目随之释放
pub fn batch_insert<E: FlowEntry, T: FlowTable<E> + ?Sized>(
    table: &mut T,
    entries: impl IntoIterator<Item = E>,
) -> usize {
    let mut count = 0;
    for entry in entries {
        if table.insert(entry).is_ok() {
            count += 1;
        }
    }
    count
}
