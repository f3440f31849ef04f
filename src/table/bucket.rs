// src/table/bucket.rs
//! 桶实现 - 固定数组中的一个槽，至多独占一个流表项

use std::fmt;

/// 桶 - 空或独占一个条目
pub struct Bucket<E> {
    entry: Option<E>,
}

impl<E> Default for Bucket<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E> fmt::Debug for Bucket<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_occupied() {
            write!(f, "Bucket(occupied)")
        } else {
            write!(f, "Bucket(empty)")
        }
    }
}

impl<E> Bucket<E> {
    pub const fn empty() -> Self {
        Self { entry: None }
    }

    pub fn is_occupied(&self) -> bool {
        self.entry.is_some()
    }

    /// 借用桶中的条目
    pub fn get(&self) -> Option<&E> {
        self.entry.as_ref()
    }

    pub fn get_mut(&mut self) -> Option<&mut E> {
        self.entry.as_mut()
    }

    /// 存入条目，返回被替换的旧条目
    pub fn replace(&mut self, entry: E) -> Option<E> {
        self.entry.replace(entry)
    }

    /// 取出条目并清空桶
    pub fn take(&mut self) -> Option<E> {
        self.entry.take()
    }

    /// 条目满足条件时取出并清空桶
    pub fn take_if(&mut self, predicate: impl FnOnce(&E) -> bool) -> Option<E> {
        if self.entry.as_ref().is_some_and(predicate) {
            self.entry.take()
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_bucket_is_empty() {
        let bucket: Bucket<u32> = Bucket::default();
        assert!(!bucket.is_occupied());
        assert!(bucket.get().is_none());
    }

    #[test]
    fn test_replace_and_take() {
        let mut bucket = Bucket::empty();
        assert_eq!(bucket.replace(1), None);
        assert_eq!(bucket.replace(2), Some(1), "替换应返回旧条目");
        assert_eq!(bucket.get(), Some(&2));
        assert_eq!(bucket.take(), Some(2));
        assert!(!bucket.is_occupied());
    }

    #[test]
    fn test_take_if() {
        let mut bucket = Bucket::empty();
        bucket.replace(5);
        assert_eq!(bucket.take_if(|v| *v > 10), None);
        assert!(bucket.is_occupied(), "不满足条件时桶保持不变");
        assert_eq!(bucket.take_if(|v| *v == 5), Some(5));
        assert!(!bucket.is_occupied());
        assert_eq!(bucket.take_if(|_| true), None);
    }
}
