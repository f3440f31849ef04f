//! 游标 - 有限、只向前、不可重启的条目序列
//!
//! 游标借用所遍历的表，因此游标存活期间表不能被修改，由借用检查在编译期保证。
//! 释放游标即 `Drop`，只释放游标状态，从不释放表中的条目。

use crate::{
    flow::FlowEntry,
    table::{double_hash_table::DoubleHashTable, hash_table::HashTable},
};
use std::iter::FusedIterator;

/// 单哈希表游标：当前桶位置
pub struct HashCursor<'a, E> {
    table: &'a HashTable<E>,
    bucket: usize,
    current: Option<&'a E>,
}

impl<'a, E: FlowEntry> HashCursor<'a, E> {
    /// 从0号桶开始，定位到第一个已占用的桶
    pub(crate) fn new(table: &'a HashTable<E>) -> Self {
        let mut cursor = Self {
            table,
            bucket: 0,
            current: None,
        };
        cursor.current = cursor.seek_occupied();
        cursor
    }

    fn seek_occupied(&mut self) -> Option<&'a E> {
        let table: &'a HashTable<E> = self.table;
        let buckets = table.buckets();
        while self.bucket < buckets.len() {
            if let Some(flow) = buckets[self.bucket].get() {
                return Some(flow);
            }
            self.bucket += 1;
        }
        None
    }

    /// 当前条目，`None` 表示已到末尾
    pub fn current(&self) -> Option<&'a E> {
        self.current
    }

    /// 当前条目所在的桶
    pub fn position(&self) -> Option<usize> {
        self.current.map(|_| self.bucket)
    }

    /// 越过当前桶继续向前扫描，到末尾后不再移动
    pub fn advance(&mut self) {
        if self.current.is_none() {
            return;
        }
        self.bucket += 1;
        self.current = self.seek_occupied();
    }

    pub fn is_done(&self) -> bool {
        self.current.is_none()
    }
}

impl<'a, E: FlowEntry> Iterator for HashCursor<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        let flow = self.current?;
        self.advance();
        Some(flow)
    }
}

impl<'a, E: FlowEntry> FusedIterator for HashCursor<'a, E> {}

/// 双哈希游标所处阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorPhase {
    OnTable0,
    OnTable1,
    Done,
}

/// 双哈希游标状态机，每个阶段只持有当前存活的子表游标
enum DoubleCursorState<'a, E> {
    OnTable0(HashCursor<'a, E>),
    OnTable1(HashCursor<'a, E>),
    Done,
}

/// 双哈希表游标：先按桶顺序遍历子表0，再遍历子表1
pub struct DoubleHashCursor<'a, E> {
    table: &'a DoubleHashTable<E>,
    state: DoubleCursorState<'a, E>,
}

impl<'a, E: FlowEntry> DoubleHashCursor<'a, E> {
    pub(crate) fn new(table: &'a DoubleHashTable<E>) -> Self {
        let mut cursor = Self {
            table,
            state: DoubleCursorState::OnTable0(HashCursor::new(table.subtable(0))),
        };
        cursor.settle();
        cursor
    }

    /// 当前子表游标到末尾时切换阶段；被替换的子表游标随之释放
    fn settle(&mut self) {
        loop {
            let exhausted = match &self.state {
                DoubleCursorState::OnTable0(inner) | DoubleCursorState::OnTable1(inner) => {
                    inner.is_done()
                }
                DoubleCursorState::Done => return,
            };
            if !exhausted {
                return;
            }
            self.state = match self.state {
                DoubleCursorState::OnTable0(_) => {
                    DoubleCursorState::OnTable1(HashCursor::new(self.table.subtable(1)))
                }
                _ => DoubleCursorState::Done,
            };
        }
    }

    pub fn current(&self) -> Option<&'a E> {
        match &self.state {
            DoubleCursorState::OnTable0(inner) | DoubleCursorState::OnTable1(inner) => {
                inner.current()
            }
            DoubleCursorState::Done => None,
        }
    }

    pub fn advance(&mut self) {
        match &mut self.state {
            DoubleCursorState::OnTable0(inner) | DoubleCursorState::OnTable1(inner) => {
                inner.advance()
            }
            DoubleCursorState::Done => return,
        }
        self.settle();
    }

    pub fn phase(&self) -> CursorPhase {
        match self.state {
            DoubleCursorState::OnTable0(_) => CursorPhase::OnTable0,
            DoubleCursorState::OnTable1(_) => CursorPhase::OnTable1,
            DoubleCursorState::Done => CursorPhase::Done,
        }
    }

    pub fn is_done(&self) -> bool {
        self.phase() == CursorPhase::Done
    }
}

impl<'a, E: FlowEntry> Iterator for DoubleHashCursor<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        let flow = self.current()?;
        self.advance();
        Some(flow)
    }
}

impl<'a, E: FlowEntry> FusedIterator for DoubleHashCursor<'a, E> {}

/// 表游标 - 按表类型区分的标签联合
pub enum TableCursor<'a, E> {
    Hash(HashCursor<'a, E>),
    Hash2(DoubleHashCursor<'a, E>),
}

impl<'a, E: FlowEntry> TableCursor<'a, E> {
    pub fn current(&self) -> Option<&'a E> {
        match self {
            Self::Hash(cursor) => cursor.current(),
            Self::Hash2(cursor) => cursor.current(),
        }
    }

    pub fn advance(&mut self) {
        match self {
            Self::Hash(cursor) => cursor.advance(),
            Self::Hash2(cursor) => cursor.advance(),
        }
    }
}

impl<'a, E: FlowEntry> Iterator for TableCursor<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            Self::Hash(cursor) => cursor.next(),
            Self::Hash2(cursor) => cursor.next(),
        }
    }
}

impl<'a, E: FlowEntry> FusedIterator for TableCursor<'a, E> {}

impl<'a, E: FlowEntry> From<HashCursor<'a, E>> for TableCursor<'a, E> {
    fn from(cursor: HashCursor<'a, E>) -> Self {
        Self::Hash(cursor)
    }
}

impl<'a, E: FlowEntry> From<DoubleHashCursor<'a, E>> for TableCursor<'a, E> {
    fn from(cursor: DoubleHashCursor<'a, E>) -> Self {
        Self::Hash2(cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::test_util::{key, DropCounter, TestFlow};

    fn filled_table(drops: &DropCounter, count: u32) -> HashTable<TestFlow> {
        let mut table = HashTable::new(0x04C1_1DB7, 64).unwrap();
        for n in 0..count {
            let _ = table.insert(drops.flow(key(n), n));
        }
        table
    }

    #[test]
    fn test_empty_table_immediate_end() {
        let table: HashTable<TestFlow> = HashTable::new(0x04C1_1DB7, 8).unwrap();
        let mut cursor = table.cursor();
        assert!(cursor.current().is_none());
        assert!(cursor.is_done());
        assert_eq!(cursor.position(), None);
        cursor.advance();
        assert!(cursor.next().is_none());
    }

    #[test]
    fn test_yields_occupied_in_bucket_order() {
        let drops = DropCounter::new();
        let table = filled_table(&drops, 30);

        let mut positions = Vec::new();
        let mut cursor = table.cursor();
        while let Some(flow) = cursor.current() {
            let pos = cursor.position().unwrap();
            assert_eq!(table.bucket_index(&flow.key), pos);
            positions.push(pos);
            cursor.advance();
        }

        let expected: Vec<usize> = table
            .buckets()
            .iter()
            .enumerate()
            .filter(|(_, b)| b.is_occupied())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(positions, expected, "应按桶递增顺序恰好遍历一次");
        assert_eq!(positions.len(), table.len());
    }

    #[test]
    fn test_fused_after_end() {
        let drops = DropCounter::new();
        let table = filled_table(&drops, 3);
        let mut cursor = table.cursor();
        while cursor.next().is_some() {}
        assert!(cursor.next().is_none());
        assert!(cursor.next().is_none());
    }

    #[test]
    fn test_release_does_not_free_entries() {
        let drops = DropCounter::new();
        let table = filled_table(&drops, 10);
        let before = drops.count();
        {
            let mut cursor = table.cursor();
            cursor.advance();
        }
        assert_eq!(drops.count(), before, "释放游标不应释放条目");
        assert_eq!(table.cursor().count(), table.len());
    }

    #[test]
    fn test_table_cursor_wraps_hash_cursor() {
        let drops = DropCounter::new();
        let table = filled_table(&drops, 10);
        let direct: Vec<u32> = table.cursor().map(|f| f.id).collect();
        let wrapped: Vec<u32> = TableCursor::from(table.cursor()).map(|f| f.id).collect();
        assert_eq!(direct, wrapped);
    }
}
