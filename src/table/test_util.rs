//! 测试辅助 - 记录释放次数的流表项

use crate::flow::{FlowEntry, FlowKey};
use std::{cell::Cell, rc::Rc};

/// 测试用流表项，释放时递增共享计数
#[derive(Debug)]
pub struct TestFlow {
    pub key: FlowKey,
    pub id: u32,
    pub expired: bool,
    drops: Rc<Cell<usize>>,
}

impl FlowEntry for TestFlow {
    fn key(&self) -> &FlowKey {
        &self.key
    }

    fn is_expired(&self) -> bool {
        self.expired
    }
}

impl Drop for TestFlow {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

/// 释放计数器
#[derive(Debug, Default, Clone)]
pub struct DropCounter(Rc<Cell<usize>>);

impl DropCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn flow(&self, key: FlowKey, id: u32) -> TestFlow {
        TestFlow {
            key,
            id,
            expired: false,
            drops: Rc::clone(&self.0),
        }
    }

    pub fn expired_flow(&self, key: FlowKey, id: u32) -> TestFlow {
        let mut flow = self.flow(key, id);
        flow.expired = true;
        flow
    }

    pub fn count(&self) -> usize {
        self.0.get()
    }
}

/// 由序号生成确定的精确匹配键
pub fn key(n: u32) -> FlowKey {
    FlowKey {
        in_port: (n % 48) as u16,
        dl_type: 0x0800,
        nw_src: 0x0a00_0000 | n,
        nw_dst: 0x0a01_0001,
        nw_proto: 17,
        tp_src: 5000,
        tp_dst: 53,
        ..FlowKey::default()
    }
}

/// 在序号空间里找出满足条件的键对
pub fn find_pair(mut accept: impl FnMut(&FlowKey, &FlowKey) -> bool) -> (FlowKey, FlowKey) {
    for a in 0..4096u32 {
        for b in (a + 1)..4096u32 {
            let (ka, kb) = (key(a), key(b));
            if accept(&ka, &kb) {
                return (ka, kb);
            }
        }
    }
    panic!("序号空间内没有满足条件的键对");
}
