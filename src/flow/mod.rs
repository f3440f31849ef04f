//! 流模块 - 流键、流表项契约与参考实现

pub mod entry;
pub mod key;

pub use entry::{Action, ExpiryNotifier, Flow, FlowEntry};
pub use key::{FlowKey, Wildcards, FLOW_KEY_LEN};
