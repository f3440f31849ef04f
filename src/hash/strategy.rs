//! 哈希策略模块 - 定义桶定位使用的摘要函数

use crate::hash::crc32::Crc32;
use ahash::RandomState;
use std::hash::{BuildHasher, Hasher};

/// 哈希算法选择
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashAlgorithm {
    /// 以多项式参数作为CRC-32多项式
    #[default]
    Crc32,
    /// 以多项式参数作为AHash种子
    AHash,
    /// 以多项式参数作为XxHash32种子
    XxHash,
}

/// 哈希函数特征 - 对定长键字节求32位摘要
pub trait FlowHasher: Send + Sync {
    fn hash_bytes(&self, data: &[u8]) -> u32;
}

impl<T> FlowHasher for T
where
    T: Fn(&[u8]) -> u32 + Send + Sync,
{
    fn hash_bytes(&self, data: &[u8]) -> u32 {
        self(data)
    }
}

/// 构建哈希函数
pub fn build_hasher(algorithm: HashAlgorithm, polynomial: u32) -> Box<dyn FlowHasher> {
    match algorithm {
        HashAlgorithm::Crc32 => {
            let crc = Crc32::new(polynomial);
            Box::new(move |data: &[u8]| crc.calculate(data))
        }
        HashAlgorithm::AHash => {
            let state = RandomState::with_seed(polynomial as usize);
            Box::new(move |data: &[u8]| {
                let mut hasher = state.build_hasher();
                hasher.write(data);
                hasher.finish() as u32
            })
        }
        HashAlgorithm::XxHash => {
            Box::new(move |data: &[u8]| {
                let mut hasher = twox_hash::XxHash32::with_seed(polynomial);
                hasher.write(data);
                hasher.finish() as u32
            })
        }
    }
}

// 单元测试
#[cfg(test)]
mod tests {
    use super::*;

    fn check_deterministic(algorithm: HashAlgorithm) {
        let first = build_hasher(algorithm, 0x04C1_1DB7);
        let second = build_hasher(algorithm, 0x04C1_1DB7);
        let data = b"test_key";
        assert_eq!(first.hash_bytes(data), first.hash_bytes(data), "同一函数应确定");
        assert_eq!(first.hash_bytes(data), second.hash_bytes(data), "相同参数应得相同摘要");
    }

    #[test]
    fn test_crc32_deterministic() {
        check_deterministic(HashAlgorithm::Crc32);
    }

    #[test]
    fn test_ahash_deterministic() {
        check_deterministic(HashAlgorithm::AHash);
    }

    #[test]
    fn test_xxhash_deterministic() {
        check_deterministic(HashAlgorithm::XxHash);
    }

    #[test]
    fn test_crc32_matches_primitive() {
        let hasher = build_hasher(HashAlgorithm::Crc32, 0x04C1_1DB7);
        assert_eq!(hasher.hash_bytes(b"123456789"), Crc32::new(0x04C1_1DB7).calculate(b"123456789"));
    }

    #[test]
    fn test_closure_hasher() {
        let hasher: Box<dyn FlowHasher> = Box::new(|data: &[u8]| data.len() as u32);
        assert_eq!(hasher.hash_bytes(b"abc"), 3);
    }
}
