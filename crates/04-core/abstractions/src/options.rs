//! 组件选项
//!
//! 选项的每个顶层字段都通过 `Arc` 共享，字段是否被修改按引用身份判断。
//! 顶层字段的集合是固定的，比较与覆盖都显式地逐字段进行。

use crate::class::{ComponentClass, ComponentRef, ComponentRegistry};
use crate::declarations::*;
use crate::vnode::VNode;
use component_common::{BoxError, LifecycleHook, NodeId};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// 组件选项
#[derive(Clone, Default)]
pub struct ComponentOptions {
    pub name: Option<Arc<str>>,
    /// 挂载目标，只能在创建实例时使用
    pub el: Option<Arc<str>>,
    pub parent: Option<NodeId>,
    pub props: Option<Arc<PropsDecl>>,
    /// props 数据，只能在创建实例时使用
    pub props_data: Option<Arc<ValueMap>>,
    pub data: Option<DataFn>,
    pub computed: Option<Arc<indexmap::IndexMap<String, ComputedFn>>>,
    pub methods: Option<Arc<indexmap::IndexMap<String, MethodFn>>>,
    pub watch: Option<Arc<indexmap::IndexMap<String, Vec<WatchFn>>>>,
    pub hooks: Option<Arc<HookTable>>,
    pub components: Option<Arc<ComponentRegistry>>,
    pub directives: Option<Arc<ValueMap>>,
    pub provide: Option<ProvideDecl>,
    pub inject: Option<Arc<InjectDecl>>,
    pub mixins: Option<Arc<Vec<ComponentOptions>>>,
    pub extends: Option<Arc<ComponentOptions>>,
    pub render: Option<RenderFn>,
    pub static_render_fns: Option<Arc<Vec<RenderFn>>>,
    pub parent_vnode: Option<Arc<VNode>>,
    pub parent_listeners: Option<Arc<Listeners>>,
    pub render_children: Option<Arc<Vec<VNode>>>,
    pub component_tag: Option<Arc<str>>,
}

fn same<T: ?Sized>(a: &Option<Arc<T>>, b: &Option<Arc<T>>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => Arc::ptr_eq(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn same_provide(a: &Option<ProvideDecl>, b: &Option<ProvideDecl>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.same_as(b),
        (None, None) => true,
        _ => false,
    }
}

macro_rules! diff_fields {
    ($latest:expr, $baseline:expr, $modified:ident; $($field:ident),* $(,)?) => {
        $(
            if !same(&$latest.$field, &$baseline.$field) {
                $modified.values.$field = $latest.$field.clone();
                $modified.fields.push(stringify!($field));
            }
        )*
    };
}

macro_rules! overlay_fields {
    ($target:expr, $values:ident, $fields:ident; $($field:ident),* $(,)?) => {
        $(
            if $fields.contains(&stringify!($field)) {
                $target.$field = $values.$field;
            }
        )*
    };
}

/// 与基线相比被修改过的字段
///
/// `fields` 记录变化的字段名，被移除的字段在 `values` 中为 `None`。
#[derive(Clone, Default)]
pub struct ModifiedOptions {
    pub values: ComponentOptions,
    pub fields: Vec<&'static str>,
}

impl ModifiedOptions {
    /// 字段是否被修改
    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|name| *name == field)
    }
}

impl fmt::Debug for ModifiedOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModifiedOptions")
            .field("fields", &self.fields)
            .finish_non_exhaustive()
    }
}

impl ComponentOptions {
    /// 空选项
    pub fn new() -> Self {
        Self::default()
    }

    /// 与基线相比被修改过的顶层字段
    ///
    /// 比较的是引用身份；没有变化时返回 `None`。
    pub fn modified_since(&self, baseline: &ComponentOptions) -> Option<ModifiedOptions> {
        let mut modified = ModifiedOptions::default();
        diff_fields!(self, baseline, modified;
            name, el, props, props_data, data, computed, methods, watch, hooks,
            components, directives, inject, mixins, extends, render,
            static_render_fns, parent_vnode, parent_listeners, render_children,
            component_tag,
        );
        if self.parent != baseline.parent {
            modified.values.parent = self.parent;
            modified.fields.push("parent");
        }
        if !same_provide(&self.provide, &baseline.provide) {
            modified.values.provide = self.provide.clone();
            modified.fields.push("provide");
        }
        (!modified.fields.is_empty()).then_some(modified)
    }

    /// 把修改过的字段覆盖到当前选项上，被移除的字段同样移除
    pub fn overlay(&mut self, modified: ModifiedOptions) {
        let ModifiedOptions { values, fields } = modified;
        overlay_fields!(self, values, fields;
            name, el, parent, props, props_data, data, computed, methods, watch,
            hooks, components, directives, provide, inject, mixins, extends,
            render, static_render_fns, parent_vnode, parent_listeners,
            render_children, component_tag,
        );
    }

    /// 指定钩子的处理函数
    pub fn hooks_for(&self, hook: LifecycleHook) -> &[HookFn] {
        self.hooks
            .as_ref()
            .and_then(|table| table.get(&hook))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// 在组件注册表中登记一个组件
    pub fn register_component(&mut self, name: impl Into<String>, component: ComponentRef) {
        Arc::make_mut(self.components.get_or_insert_with(Default::default))
            .insert(name.into(), component);
    }

    /// 设置组件名称
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(Arc::from(name));
        self
    }

    /// 设置挂载目标
    pub fn with_el(mut self, el: &str) -> Self {
        self.el = Some(Arc::from(el));
        self
    }

    /// 设置父实例
    pub fn with_parent(mut self, parent: NodeId) -> Self {
        self.parent = Some(parent);
        self
    }

    /// 声明 prop
    pub fn with_prop(mut self, key: impl Into<String>, spec: PropSpec) -> Self {
        Arc::make_mut(self.props.get_or_insert_with(Default::default)).insert(key.into(), spec);
        self
    }

    /// 设置 props 数据
    pub fn with_props_data(mut self, props_data: ValueMap) -> Self {
        self.props_data = Some(Arc::new(props_data));
        self
    }

    /// 设置 data 工厂
    pub fn with_data<F>(mut self, data: F) -> Self
    where
        F: Fn(&crate::Instance) -> Result<ValueMap, BoxError> + Send + Sync + 'static,
    {
        self.data = Some(Arc::new(data));
        self
    }

    /// 声明计算属性
    pub fn with_computed<F>(mut self, key: impl Into<String>, getter: F) -> Self
    where
        F: Fn(&crate::Instance) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Arc::make_mut(self.computed.get_or_insert_with(Default::default))
            .insert(key.into(), Arc::new(getter));
        self
    }

    /// 声明方法
    pub fn with_method<F>(mut self, key: impl Into<String>, method: F) -> Self
    where
        F: Fn(&crate::Instance, &[Value]) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        Arc::make_mut(self.methods.get_or_insert_with(Default::default))
            .insert(key.into(), Arc::new(method));
        self
    }

    /// 声明侦听器
    pub fn with_watch<F>(mut self, key: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&Value, &Value) + Send + Sync + 'static,
    {
        Arc::make_mut(self.watch.get_or_insert_with(Default::default))
            .entry(key.into())
            .or_default()
            .push(Arc::new(handler));
        self
    }

    /// 添加生命周期钩子
    pub fn with_hook<F>(self, hook: LifecycleHook, handler: F) -> Self
    where
        F: Fn(&mut crate::Instance) -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.with_hook_fn(hook, Arc::new(handler))
    }

    /// 添加已包装的生命周期钩子
    pub fn with_hook_fn(mut self, hook: LifecycleHook, handler: HookFn) -> Self {
        Arc::make_mut(self.hooks.get_or_insert_with(Default::default))
            .entry(hook)
            .or_default()
            .push(handler);
        self
    }

    /// 注册局部组件
    pub fn with_component(mut self, name: impl Into<String>, class: Arc<ComponentClass>) -> Self {
        self.register_component(name, ComponentRef::Class(class));
        self
    }

    /// 注册指令定义
    pub fn with_directive(mut self, name: impl Into<String>, definition: Value) -> Self {
        Arc::make_mut(self.directives.get_or_insert_with(Default::default))
            .insert(name.into(), definition);
        self
    }

    /// 静态 provide
    pub fn with_provide(mut self, provided: ValueMap) -> Self {
        self.provide = Some(ProvideDecl::Static(Arc::new(provided)));
        self
    }

    /// 工厂形式的 provide
    pub fn with_provide_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&crate::Instance) -> Result<ValueMap, BoxError> + Send + Sync + 'static,
    {
        self.provide = Some(ProvideDecl::Factory(Arc::new(factory)));
        self
    }

    /// 声明一个 inject
    pub fn with_inject(mut self, key: impl Into<String>, spec: InjectSpec) -> Self {
        Arc::make_mut(self.inject.get_or_insert_with(Default::default)).insert(key.into(), spec);
        self
    }

    /// 以 key 列表声明 inject
    pub fn with_inject_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Arc::make_mut(self.inject.get_or_insert_with(Default::default)).extend(inject_keys(keys));
        self
    }

    /// 添加混入
    pub fn with_mixin(mut self, mixin: ComponentOptions) -> Self {
        Arc::make_mut(self.mixins.get_or_insert_with(Default::default)).push(mixin);
        self
    }

    /// 设置继承的选项
    pub fn with_extends(mut self, base: ComponentOptions) -> Self {
        self.extends = Some(Arc::new(base));
        self
    }

    /// 设置渲染函数
    pub fn with_render<F>(mut self, render: F) -> Self
    where
        F: Fn(&crate::Instance) -> Result<VNode, BoxError> + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }
}

impl fmt::Debug for ComponentOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys = |map: Option<Vec<String>>| map.unwrap_or_default();
        f.debug_struct("ComponentOptions")
            .field("name", &self.name)
            .field("el", &self.el)
            .field("parent", &self.parent)
            .field("props", &keys(self.props.as_ref().map(|p| p.keys().cloned().collect())))
            .field("data", &self.data.is_some())
            .field("methods", &keys(self.methods.as_ref().map(|m| m.keys().cloned().collect())))
            .field(
                "hooks",
                &self
                    .hooks
                    .as_ref()
                    .map(|h| h.iter().map(|(k, v)| (k.as_str(), v.len())).collect::<Vec<_>>()),
            )
            .field(
                "components",
                &keys(self.components.as_ref().map(|c| c.keys().cloned().collect())),
            )
            .field("provide", &self.provide)
            .field("inject", &self.inject)
            .field("render", &self.render.is_some())
            .field("component_tag", &self.component_tag)
            .finish_non_exhaustive()
    }
}
