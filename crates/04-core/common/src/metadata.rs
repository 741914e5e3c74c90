//! 实例与类的标识

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// 组件实例唯一标识，进程内单调递增，从 0 开始
pub type Uid = u64;

/// 组件类标识
pub type ClassId = u64;

static NEXT_UID: AtomicU64 = AtomicU64::new(0);
static NEXT_CID: AtomicU64 = AtomicU64::new(0);

/// 分配下一个实例标识
pub fn next_uid() -> Uid {
    NEXT_UID.fetch_add(1, Ordering::Relaxed)
}

/// 分配下一个类标识
pub fn next_cid() -> ClassId {
    NEXT_CID.fetch_add(1, Ordering::Relaxed)
}

/// 组件树中的节点位置
///
/// 实例之间只通过节点位置互相引用，子实例不拥有祖先。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// 节点在组件树中的下标
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uids_are_monotonic() {
        let first = next_uid();
        let second = next_uid();
        assert!(second > first);
    }

    #[test]
    fn node_id_display() {
        assert_eq!(NodeId(3).to_string(), "#3");
        assert_eq!(NodeId(3).index(), 3);
    }
}
