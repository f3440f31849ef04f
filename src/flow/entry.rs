//! 流表项 - 表所消费的条目契约及参考实现

use crate::flow::key::FlowKey;
use std::time::{Duration, Instant};

/// 流表项特征
///
/// 条目一旦插入成功即归表独占，替换、删除、超时或销毁表时由表释放 (`Drop`)，
/// 每个条目只释放一次。
pub trait FlowEntry {
    /// 条目的流键
    fn key(&self) -> &FlowKey;

    /// 条目是否已超时
    fn is_expired(&self) -> bool;

    /// 条目是否被删除请求命中
    fn matches_for_delete(&self, query: &FlowKey, strict: bool) -> bool {
        self.key().del_matches(query, strict)
    }
}

/// 超时通知 - `timeout()` 在释放每个过期条目之前调用一次
pub trait ExpiryNotifier<E: ?Sized> {
    fn flow_expired(&mut self, entry: &E);
}

impl<E: ?Sized, F> ExpiryNotifier<E> for F
where
    F: FnMut(&E),
{
    fn flow_expired(&mut self, entry: &E) {
        self(entry)
    }
}

/// 流动作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// 从指定端口转发
    Output(u16),
    /// 上送控制器，最多携带 `max_len` 字节
    Controller { max_len: u16 },
    SetVlan(u16),
    StripVlan,
    Drop,
}

/// 参考流表项：动作列表、超时计时与统计计数
#[derive(Debug, Clone)]
pub struct Flow {
    key: FlowKey,
    actions: Vec<Action>,
    /// 空闲超时，零表示永不
    idle_timeout: Duration,
    /// 硬超时，零表示永不
    hard_timeout: Duration,
    created: Instant,
    used: Instant,
    packet_count: u64,
    byte_count: u64,
}

impl Flow {
    pub fn new(key: FlowKey, actions: Vec<Action>) -> Self {
        Self::new_at(key, actions, Instant::now())
    }

    /// 指定创建时刻
    pub fn new_at(key: FlowKey, actions: Vec<Action>, now: Instant) -> Self {
        Self {
            key,
            actions,
            idle_timeout: Duration::ZERO,
            hard_timeout: Duration::ZERO,
            created: now,
            used: now,
            packet_count: 0,
            byte_count: 0,
        }
    }

    pub fn with_idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    pub fn with_hard_timeout(mut self, timeout: Duration) -> Self {
        self.hard_timeout = timeout;
        self
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    pub fn packet_count(&self) -> u64 {
        self.packet_count
    }

    pub fn byte_count(&self) -> u64 {
        self.byte_count
    }

    pub fn created(&self) -> Instant {
        self.created
    }

    pub fn last_used(&self) -> Instant {
        self.used
    }

    /// 记录一个命中的报文并刷新空闲计时
    pub fn record_packet(&mut self, bytes: u64, now: Instant) {
        self.packet_count += 1;
        self.byte_count += bytes;
        self.used = now;
    }

    /// 在给定时刻是否已超时
    pub fn is_expired_at(&self, now: Instant) -> bool {
        let idle = !self.idle_timeout.is_zero()
            && now.saturating_duration_since(self.used) >= self.idle_timeout;
        let hard = !self.hard_timeout.is_zero()
            && now.saturating_duration_since(self.created) >= self.hard_timeout;
        idle || hard
    }
}

impl FlowEntry for Flow {
    fn key(&self) -> &FlowKey {
        &self.key
    }

    fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }
}
