//! 统一错误处理 - 流表构造错误与插入拒绝原因

use std::fmt;

/// 流表可能发生的错误
#[derive(Debug, thiserror::Error)]
pub enum FlowTableError {
    #[error("内存分配失败 (大小: {size}, 对齐: {align})")]
    AllocationFailed {
        size: usize,
        align: usize,
    },

    #[error("无效配置: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

impl FlowTableError {
    /// 获取错误恢复建议
    pub fn recovery_suggestion(&self) -> Option<&'static str> {
        match self {
            Self::AllocationFailed { .. } => Some("检查系统内存或减小桶数量"),
            Self::InvalidConfig { .. } => Some("桶数量必须是非零的2的幂"),
        }
    }

    /// 判断错误是否可恢复
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::AllocationFailed { .. })
    }
}

/// 插入被拒绝的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RejectReason {
    /// 键带通配符，本表只接受精确匹配
    #[error("键带通配符，不支持精确匹配表")]
    Wildcarded,

    /// 目标桶已被另一个键占用
    #[error("桶 {bucket} 已被其他键占用")]
    BucketOccupied {
        bucket: usize,
    },
}

/// 插入成功的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    /// 存入空桶
    Inserted,
    /// 替换了同键的旧条目，旧条目已释放
    Replaced,
}

/// 插入被拒绝 - 条目所有权交还给调用方
pub struct InsertRejected<E> {
    pub reason: RejectReason,
    pub entry: E,
}

impl<E> InsertRejected<E> {
    pub fn new(reason: RejectReason, entry: E) -> Self {
        Self { reason, entry }
    }

    /// 取回被拒绝的条目
    pub fn into_entry(self) -> E {
        self.entry
    }
}

impl<E> fmt::Debug for InsertRejected<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InsertRejected")
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

impl<E> fmt::Display for InsertRejected<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "插入被拒绝: {}", self.reason)
    }
}

impl<E> std::error::Error for InsertRejected<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}
