//! 表配置 - 多项式、桶数量与哈希算法

use crate::{error::FlowTableError, hash::HashAlgorithm};
use once_cell::sync::Lazy;

/// 默认CRC-32多项式
pub const DEFAULT_POLYNOMIAL: u32 = 0x04C1_1DB7;
/// 双哈希表第二子表的默认多项式 (Castagnoli)
pub const SECONDARY_POLYNOMIAL: u32 = 0x1EDC_6F41;
pub const DEFAULT_BUCKET_COUNT: usize = 1024;

/// 全局默认配置
pub static DEFAULT_CONFIG: Lazy<HashTableConfig> = Lazy::new(HashTableConfig::default);

/// 单哈希表配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashTableConfig {
    /// 哈希参数：CRC多项式或种子
    pub polynomial: u32,
    /// 桶数量，必须是非零的2的幂
    pub bucket_count: usize,
    pub algorithm: HashAlgorithm,
}

impl Default for HashTableConfig {
    fn default() -> Self {
        Self {
            polynomial: DEFAULT_POLYNOMIAL,
            bucket_count: DEFAULT_BUCKET_COUNT,
            algorithm: HashAlgorithm::Crc32,
        }
    }
}

impl HashTableConfig {
    pub fn new(polynomial: u32, bucket_count: usize) -> Self {
        Self {
            polynomial,
            bucket_count,
            ..*DEFAULT_CONFIG
        }
    }

    pub fn with_algorithm(mut self, algorithm: HashAlgorithm) -> Self {
        self.algorithm = algorithm;
        self
    }

    /// 检查配置参数
    pub fn validate(&self) -> Result<(), FlowTableError> {
        if !self.bucket_count.is_power_of_two() {
            return Err(FlowTableError::InvalidConfig {
                reason: format!("桶数量 {} 不是非零的2的幂", self.bucket_count),
            });
        }
        Ok(())
    }
}

/// 双哈希表配置 - 两个子表参数相互独立
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleHashTableConfig {
    pub primary: HashTableConfig,
    pub secondary: HashTableConfig,
}

impl Default for DoubleHashTableConfig {
    fn default() -> Self {
        Self {
            primary: HashTableConfig::default(),
            secondary: HashTableConfig::new(SECONDARY_POLYNOMIAL, DEFAULT_BUCKET_COUNT),
        }
    }
}

impl DoubleHashTableConfig {
    pub fn new(poly0: u32, buckets0: usize, poly1: u32, buckets1: usize) -> Self {
        Self {
            primary: HashTableConfig::new(poly0, buckets0),
            secondary: HashTableConfig::new(poly1, buckets1),
        }
    }

    pub fn validate(&self) -> Result<(), FlowTableError> {
        self.primary.validate()?;
        self.secondary.validate()
    }
}
