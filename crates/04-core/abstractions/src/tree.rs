//! 组件实例树
//!
//! 实例保存在一个数组里，父子关系只通过 [`NodeId`] 表示。

use crate::class::ComponentClass;
use crate::instance::Instance;
use component_common::{InstanceError, InstanceResult, NodeId};
use std::sync::Arc;

/// 组件实例树
#[derive(Debug, Default)]
pub struct ComponentTree {
    nodes: Vec<Instance>,
}

impl ComponentTree {
    /// 创建空树
    pub fn new() -> Self {
        Self::default()
    }

    /// 为组件类分配一个未初始化的实例外壳
    pub fn allocate(&mut self, class: Arc<ComponentClass>) -> NodeId {
        let node = NodeId(self.nodes.len());
        self.nodes.push(Instance::shell(node, class));
        node
    }

    /// 获取实例
    pub fn get(&self, node: NodeId) -> Option<&Instance> {
        self.nodes.get(node.index())
    }

    /// 获取实例（可写）
    pub fn get_mut(&mut self, node: NodeId) -> Option<&mut Instance> {
        self.nodes.get_mut(node.index())
    }

    /// 获取实例，不存在时返回错误
    pub fn instance(&self, node: NodeId) -> InstanceResult<&Instance> {
        self.get(node).ok_or(InstanceError::InstanceNotFound { id: node })
    }

    /// 获取实例（可写），不存在时返回错误
    pub fn instance_mut(&mut self, node: NodeId) -> InstanceResult<&mut Instance> {
        self.get_mut(node).ok_or(InstanceError::InstanceNotFound { id: node })
    }

    /// 实例数量
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// 是否没有实例
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 从指定实例自身开始，沿父引用向上遍历
    pub fn ancestors(&self, node: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: Some(node),
        }
    }
}

/// 祖先链迭代器，第一个元素是起点实例自身
pub struct Ancestors<'a> {
    tree: &'a ComponentTree,
    next: Option<NodeId>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a Instance;

    fn next(&mut self) -> Option<Self::Item> {
        let instance = self.tree.get(self.next?)?;
        self.next = instance.parent();
        Some(instance)
    }
}
