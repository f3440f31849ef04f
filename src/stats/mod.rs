//! 统计模块 - 表容量统计与操作计数

pub mod operation;

pub use operation::{AtomicOperationStats, OperationStatsSnapshot, OperationType};

/// 表统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableStats {
    /// 表类型名称
    pub name: &'static str,
    /// 当前流数量
    pub n_flows: usize,
    /// 最大流数量 (桶数量)
    pub max_flows: usize,
}

impl TableStats {
    /// 负载因子
    pub fn load_factor(&self) -> f32 {
        if self.max_flows == 0 {
            return 0.0;
        }
        self.n_flows as f32 / self.max_flows as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_factor() {
        let stats = TableStats { name: "hash", n_flows: 1, max_flows: 4 };
        assert!((stats.load_factor() - 0.25).abs() < f32::EPSILON);
    }
}
