//! 流键 - 定长匹配字段与通配符掩码

use std::fmt;

/// 流键序列化后的定长字节数
pub const FLOW_KEY_LEN: usize = 36;

/// 通配符掩码 (10位)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Wildcards {
    /// 通配位标志
    pub bits: u32,
}

impl Wildcards {
    pub const IN_PORT: u32 = 1 << 0;
    pub const DL_VLAN: u32 = 1 << 1;
    pub const DL_SRC: u32 = 1 << 2;
    pub const DL_DST: u32 = 1 << 3;
    pub const DL_TYPE: u32 = 1 << 4;
    pub const NW_SRC: u32 = 1 << 5;
    pub const NW_DST: u32 = 1 << 6;
    pub const NW_PROTO: u32 = 1 << 7;
    pub const TP_SRC: u32 = 1 << 8;
    pub const TP_DST: u32 = 1 << 9;
    /// 所有字段通配
    pub const ALL: u32 = (1 << 10) - 1;

    /// 精确匹配 (无通配位)
    pub const fn exact() -> Self {
        Self { bits: 0 }
    }

    pub const fn from_bits(bits: u32) -> Self {
        Self { bits: bits & Self::ALL }
    }

    /// 检查是否为精确匹配
    pub fn is_exact(&self) -> bool {
        self.bits == 0
    }

    /// 检查是否包含指定通配位
    pub fn contains(&self, flags: u32) -> bool {
        (self.bits & flags) == flags
    }

    /// 添加通配位并返回新实例
    pub fn with_flag(&self, flag: u32) -> Self {
        Self::from_bits(self.bits | flag)
    }

    /// 两个掩码的并集
    pub fn union(&self, other: Wildcards) -> Self {
        Self::from_bits(self.bits | other.bits)
    }
}

/// 流键 - 按字节比较的定长匹配描述符
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FlowKey {
    pub in_port: u16,
    pub dl_vlan: u16,
    pub dl_src: [u8; 6],
    pub dl_dst: [u8; 6],
    pub dl_type: u16,
    pub nw_src: u32,
    pub nw_dst: u32,
    pub nw_proto: u8,
    pub tp_src: u16,
    pub tp_dst: u16,
    pub wildcards: Wildcards,
}

impl FlowKey {
    /// 创建全零精确匹配键
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置通配掩码
    pub fn with_wildcards(mut self, bits: u32) -> Self {
        self.wildcards = Wildcards::from_bits(bits);
        self
    }

    /// 检查是否为精确匹配键
    pub fn is_exact(&self) -> bool {
        self.wildcards.is_exact()
    }

    /// 序列化为定长字节 (网络字节序)，用于哈希
    pub fn to_bytes(&self) -> [u8; FLOW_KEY_LEN] {
        let mut buf = [0u8; FLOW_KEY_LEN];
        buf[0..2].copy_from_slice(&self.in_port.to_be_bytes());
        buf[2..4].copy_from_slice(&self.dl_vlan.to_be_bytes());
        buf[4..10].copy_from_slice(&self.dl_src);
        buf[10..16].copy_from_slice(&self.dl_dst);
        buf[16..18].copy_from_slice(&self.dl_type.to_be_bytes());
        buf[18..22].copy_from_slice(&self.nw_src.to_be_bytes());
        buf[22..26].copy_from_slice(&self.nw_dst.to_be_bytes());
        buf[26] = self.nw_proto;
        // buf[27] 填充
        buf[28..30].copy_from_slice(&self.tp_src.to_be_bytes());
        buf[30..32].copy_from_slice(&self.tp_dst.to_be_bytes());
        buf[32..36].copy_from_slice(&self.wildcards.bits.to_be_bytes());
        buf
    }

    /// 比较两个键，任一方通配的字段被忽略
    pub fn matches(&self, other: &FlowKey) -> bool {
        let w = self.wildcards.union(other.wildcards);
        (w.contains(Wildcards::IN_PORT) || self.in_port == other.in_port)
            && (w.contains(Wildcards::DL_VLAN) || self.dl_vlan == other.dl_vlan)
            && (w.contains(Wildcards::DL_SRC) || self.dl_src == other.dl_src)
            && (w.contains(Wildcards::DL_DST) || self.dl_dst == other.dl_dst)
            && (w.contains(Wildcards::DL_TYPE) || self.dl_type == other.dl_type)
            && (w.contains(Wildcards::NW_SRC) || self.nw_src == other.nw_src)
            && (w.contains(Wildcards::NW_DST) || self.nw_dst == other.nw_dst)
            && (w.contains(Wildcards::NW_PROTO) || self.nw_proto == other.nw_proto)
            && (w.contains(Wildcards::TP_SRC) || self.tp_src == other.tp_src)
            && (w.contains(Wildcards::TP_DST) || self.tp_dst == other.tp_dst)
    }

    /// 删除匹配：严格模式下通配掩码也必须一致
    pub fn del_matches(&self, query: &FlowKey, strict: bool) -> bool {
        if strict && self.wildcards != query.wildcards {
            return false;
        }
        self.matches(query)
    }
}

struct MacAddr<'a>(&'a [u8; 6]);

impl fmt::Display for MacAddr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.0;
        write!(
            f,
            "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
            m[0], m[1], m[2], m[3], m[4], m[5]
        )
    }
}

impl fmt::Debug for FlowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FlowKey(port={} vlan={} {}->{} type=0x{:04x} {:08x}->{:08x} proto={} {}->{} wc=0x{:03x})",
            self.in_port,
            self.dl_vlan,
            MacAddr(&self.dl_src),
            MacAddr(&self.dl_dst),
            self.dl_type,
            self.nw_src,
            self.nw_dst,
            self.nw_proto,
            self.tp_src,
            self.tp_dst,
            self.wildcards.bits
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tcp_key(in_port: u16, tp_dst: u16) -> FlowKey {
        FlowKey {
            in_port,
            dl_type: 0x0800,
            nw_src: 0x0a00_0001,
            nw_dst: 0x0a00_0002,
            nw_proto: 6,
            tp_src: 40000,
            tp_dst,
            ..FlowKey::default()
        }
    }

    #[test]
    fn test_to_bytes_layout() {
        let key = tcp_key(1, 80);
        let bytes = key.to_bytes();
        assert_eq!(&bytes[0..2], &[0, 1]);
        assert_eq!(&bytes[16..18], &[0x08, 0x00]);
        assert_eq!(bytes[26], 6);
        assert_eq!(&bytes[30..32], &80u16.to_be_bytes());
        assert_eq!(&bytes[32..36], &[0, 0, 0, 0]);
    }

    #[test]
    fn test_wildcards_change_bytes() {
        let exact = tcp_key(1, 80);
        let wild = exact.with_wildcards(Wildcards::TP_DST);
        assert_ne!(exact, wild);
        assert_ne!(exact.to_bytes(), wild.to_bytes());
        assert!(!wild.is_exact());
    }

    #[test]
    fn test_wildcards_mask_unknown_bits() {
        assert_eq!(Wildcards::from_bits(0xFFFF_FFFF).bits, Wildcards::ALL);
    }

    #[test]
    fn test_matches_ignores_wildcarded_fields() {
        let entry = tcp_key(1, 80);
        let query = tcp_key(1, 443).with_wildcards(Wildcards::TP_DST);
        assert!(entry.matches(&query));

        let query = tcp_key(2, 443).with_wildcards(Wildcards::TP_DST);
        assert!(!entry.matches(&query), "入端口不同且未通配");

        let all = FlowKey::new().with_wildcards(Wildcards::ALL);
        assert!(entry.matches(&all));
    }

    #[test]
    fn test_del_matches_strict() {
        let entry = tcp_key(1, 80);
        let query = tcp_key(1, 443).with_wildcards(Wildcards::TP_DST);
        assert!(entry.del_matches(&query, false));
        assert!(!entry.del_matches(&query, true), "严格模式要求掩码一致");
        assert!(entry.del_matches(&entry, true));
    }

    #[test]
    fn test_debug_shows_mac_addresses() {
        let a = tcp_key(1, 80);
        let b = FlowKey {
            dl_src: [0x00, 0x1b, 0x21, 0x3c, 0x4d, 0x5e],
            ..a
        };
        let shown = format!("{:?}", b);
        assert!(shown.contains("00:1b:21:3c:4d:5e->00:00:00:00:00:00"), "{}", shown);
        assert_ne!(format!("{:?}", a), shown);
    }
}
