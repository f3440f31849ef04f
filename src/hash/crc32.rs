//! 多项式可配置的CRC-32 - 流键的默认桶定位摘要

const CRC32_TABLE_BITS: u32 = 8;
const CRC32_TABLE_SIZE: usize = 1 << CRC32_TABLE_BITS;

/// 按高位优先处理的查表CRC-32，初始值为0，不做最终异或
#[derive(Clone)]
pub struct Crc32 {
    polynomial: u32,
    table: [u32; CRC32_TABLE_SIZE],
}

impl Crc32 {
    /// 按多项式生成查找表
    pub fn new(polynomial: u32) -> Self {
        let mut table = [0u32; CRC32_TABLE_SIZE];
        for (i, slot) in table.iter_mut().enumerate() {
            let mut reg = (i as u32) << 24;
            for _ in 0..CRC32_TABLE_BITS {
                let top_bit = reg & 0x8000_0000 != 0;
                reg <<= 1;
                if top_bit {
                    reg ^= polynomial;
                }
            }
            *slot = reg;
        }
        Self { polynomial, table }
    }

    /// 计算字节序列的摘要
    pub fn calculate(&self, data: &[u8]) -> u32 {
        data.iter().fold(0u32, |result, &byte| {
            let top = ((result >> 24) ^ byte as u32) as usize;
            (result << 8) ^ self.table[top]
        })
    }

    pub fn polynomial(&self) -> u32 {
        self.polynomial
    }
}

impl std::fmt::Debug for Crc32 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Crc32(poly=0x{:08X})", self.polynomial)
    }
}
