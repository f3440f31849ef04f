//! 哈希模块 - 统一管理桶定位相关功能

pub mod crc32;
pub mod strategy;

pub use crc32::Crc32;
pub use strategy::{build_hasher, FlowHasher, HashAlgorithm};

/// 哈希工具函数：摘要按掩码映射到桶
pub fn calculate_bucket(hash: u32, bucket_mask: usize) -> usize {
    (hash as usize) & bucket_mask
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_calculation() {
        assert_eq!(calculate_bucket(0xFFFF_FFF6, 3), 2);
        assert_eq!(calculate_bucket(123, 1023), 123);
        assert_eq!(calculate_bucket(1024, 1023), 0);
    }
}
