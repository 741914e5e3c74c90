//! 生命周期、事件与渲染相关的簿记

use component_abstractions::{ComponentTree, Instance, VNode};
use component_common::{InstanceError, InstanceResult, NodeId};
use indexmap::IndexMap;

/// 默认插槽名
pub const DEFAULT_SLOT: &str = "default";

/// 建立父子与根的关系
///
/// 父实例来自选项中的 `parent`，子实例登记到父实例的子节点列表中。
/// 父实例必须已经触发过 `created`。
pub fn init_lifecycle(tree: &mut ComponentTree, node: NodeId) -> InstanceResult<()> {
    let parent = tree.instance(node)?.options().parent();
    let root = match parent {
        Some(parent) => {
            let parent_instance = tree.instance_mut(parent)?;
            if !parent_instance.phase().is_created() {
                return Err(InstanceError::ParentNotCreated { id: parent });
            }
            parent_instance.push_child(node);
            parent_instance.root()
        }
        None => node,
    };
    tree.instance_mut(node)?.attach(parent, root);
    Ok(())
}

/// 把初始化失败的实例从父实例的子节点列表中移除
pub fn detach(tree: &mut ComponentTree, node: NodeId) {
    let parent = tree.get(node).and_then(Instance::parent);
    if let Some(parent) = parent.and_then(|parent| tree.get_mut(parent)) {
        parent.remove_child(node);
    }
}

/// 从父占位节点接收事件监听器
pub fn init_events(instance: &mut Instance) {
    if let Some(listeners) = instance.options().parent_listeners().cloned() {
        instance.set_listeners(listeners.as_ref().clone());
    }
}

/// 按插槽名分组占位节点的子节点
pub fn init_render(instance: &mut Instance) {
    if let Some(children) = instance.options().render_children().cloned() {
        instance.set_slots(resolve_slots(&children));
    }
}

/// 子节点按 `slot` 数据分组，未指定的归入默认插槽；只含空白文本的插槽被丢弃
pub fn resolve_slots(children: &[VNode]) -> IndexMap<String, Vec<VNode>> {
    let mut slots: IndexMap<String, Vec<VNode>> = IndexMap::new();
    for child in children {
        let name = child.slot_name().unwrap_or(DEFAULT_SLOT);
        slots.entry(name.to_string()).or_default().push(child.clone());
    }
    slots.retain(|_, nodes| !nodes.iter().all(VNode::is_whitespace));
    slots
}
