//! 虚拟节点
//!
//! 这里只保留实例化子组件时需要读取的部分。

use crate::class::ComponentClass;
use crate::declarations::{Listeners, ValueMap};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// 虚拟节点
#[derive(Debug, Clone, Default)]
pub struct VNode {
    pub tag: Option<String>,
    pub data: Option<ValueMap>,
    pub children: Vec<VNode>,
    pub text: Option<String>,
    /// 组件占位节点携带的组件元数据
    pub component_options: Option<VNodeComponentOptions>,
}

impl VNode {
    /// 元素节点
    pub fn element(tag: impl Into<String>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..Self::default()
        }
    }

    /// 文本节点
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    /// 组件占位节点
    pub fn component(tag: impl Into<String>, options: VNodeComponentOptions) -> Self {
        Self {
            tag: Some(tag.into()),
            component_options: Some(options),
            ..Self::default()
        }
    }

    /// 添加子节点
    pub fn with_child(mut self, child: VNode) -> Self {
        self.children.push(child);
        self
    }

    /// 设置节点数据项
    pub fn with_data(mut self, key: impl Into<String>, value: Value) -> Self {
        self.data.get_or_insert_with(ValueMap::new).insert(key.into(), value);
        self
    }

    /// 节点声明的具名插槽
    pub fn slot_name(&self) -> Option<&str> {
        self.data.as_ref()?.get("slot")?.as_str()
    }

    /// 是否为空白文本节点
    pub fn is_whitespace(&self) -> bool {
        self.tag.is_none()
            && self.component_options.is_none()
            && self.text.as_deref().map_or(true, |t| t.trim().is_empty())
    }
}

/// 组件占位节点上的组件元数据
#[derive(Clone)]
pub struct VNodeComponentOptions {
    pub class: Arc<ComponentClass>,
    pub props_data: Option<Arc<ValueMap>>,
    pub listeners: Option<Arc<Listeners>>,
    pub children: Option<Arc<Vec<VNode>>>,
    pub tag: Option<Arc<str>>,
}

impl VNodeComponentOptions {
    /// 为指定组件类创建元数据
    pub fn new(class: Arc<ComponentClass>) -> Self {
        Self {
            class,
            props_data: None,
            listeners: None,
            children: None,
            tag: None,
        }
    }

    /// 设置 props 数据
    pub fn with_props_data(mut self, props_data: ValueMap) -> Self {
        self.props_data = Some(Arc::new(props_data));
        self
    }

    /// 设置监听器
    pub fn with_listeners(mut self, listeners: Listeners) -> Self {
        self.listeners = Some(Arc::new(listeners));
        self
    }

    /// 设置插槽子节点
    pub fn with_children(mut self, children: Vec<VNode>) -> Self {
        self.children = Some(Arc::new(children));
        self
    }

    /// 设置组件标签
    pub fn with_tag(mut self, tag: &str) -> Self {
        self.tag = Some(Arc::from(tag));
        self
    }
}

impl fmt::Debug for VNodeComponentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VNodeComponentOptions")
            .field("class", &self.class.cid())
            .field("props_data", &self.props_data)
            .field(
                "listeners",
                &self.listeners.as_ref().map(|l| l.keys().cloned().collect::<Vec<_>>()),
            )
            .field("children", &self.children.as_ref().map(|c| c.len()))
            .field("tag", &self.tag)
            .finish()
    }
}
