//! 组件实例

use crate::class::ComponentClass;
use crate::declarations::*;
use crate::options::ComponentOptions;
use crate::vnode::VNode;
use component_common::{BoxError, InitPhase, LifecycleHook, LifecycleResult, NodeId, Uid};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// 写入拦截回调，参数为被写入的 key
pub type SetterHook = Arc<dyn Fn(&str) + Send + Sync>;

/// 安装在实例上的响应式字段
#[derive(Clone)]
pub struct ReactiveField {
    pub value: Value,
    /// 值本身是否被深度观察
    pub observed: bool,
    setter: Option<SetterHook>,
}

impl ReactiveField {
    /// 创建响应式字段
    pub fn new(value: Value, observed: bool, setter: Option<SetterHook>) -> Self {
        Self {
            value,
            observed,
            setter,
        }
    }

    /// 没有观察、没有写入拦截的普通字段
    pub fn plain(value: Value) -> Self {
        Self::new(value, false, None)
    }

    /// 是否安装了写入拦截
    pub fn has_setter(&self) -> bool {
        self.setter.is_some()
    }
}

impl fmt::Debug for ReactiveField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveField")
            .field("value", &self.value)
            .field("observed", &self.observed)
            .field("setter", &self.setter.is_some())
            .finish()
    }
}

/// 渲染代理
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderProxy {
    #[default]
    Uninstalled,
    /// 直接访问实例自身
    Direct,
    /// 访问未定义属性时输出诊断
    Guarded,
}

/// 实例的有效选项
///
/// 两层结构：自身覆盖层，以及可选的回退层（组件类的静态选项）。
/// 读取字段时先查覆盖层，缺失再查回退层。
#[derive(Clone, Default)]
pub struct LayeredOptions {
    own: ComponentOptions,
    fallback: Option<Arc<ComponentOptions>>,
}

macro_rules! layered_getters {
    ($($field:ident: $ty:ty),* $(,)?) => {
        $(
            #[allow(missing_docs)]
            pub fn $field(&self) -> Option<&$ty> {
                self.own
                    .$field
                    .as_ref()
                    .or_else(|| self.fallback.as_ref().and_then(|f| f.$field.as_ref()))
            }
        )*
    };
}

impl LayeredOptions {
    /// 完整合并后的单层选项
    pub fn flat(options: ComponentOptions) -> Self {
        Self {
            own: options,
            fallback: None,
        }
    }

    /// 以组件类静态选项为回退层的空覆盖层
    pub fn layered(fallback: Arc<ComponentOptions>) -> Self {
        Self {
            own: ComponentOptions::default(),
            fallback: Some(fallback),
        }
    }

    /// 覆盖层
    pub fn own(&self) -> &ComponentOptions {
        &self.own
    }

    /// 覆盖层（可写）
    pub fn own_mut(&mut self) -> &mut ComponentOptions {
        &mut self.own
    }

    /// 回退层
    pub fn fallback(&self) -> Option<&Arc<ComponentOptions>> {
        self.fallback.as_ref()
    }

    /// 是否为两层结构
    pub fn is_layered(&self) -> bool {
        self.fallback.is_some()
    }

    layered_getters! {
        name: Arc<str>,
        el: Arc<str>,
        props: Arc<PropsDecl>,
        props_data: Arc<ValueMap>,
        data: DataFn,
        computed: Arc<IndexMap<String, ComputedFn>>,
        methods: Arc<IndexMap<String, MethodFn>>,
        watch: Arc<IndexMap<String, Vec<WatchFn>>>,
        hooks: Arc<HookTable>,
        components: Arc<crate::class::ComponentRegistry>,
        directives: Arc<ValueMap>,
        provide: ProvideDecl,
        inject: Arc<InjectDecl>,
        render: RenderFn,
        static_render_fns: Arc<Vec<RenderFn>>,
        parent_vnode: Arc<VNode>,
        parent_listeners: Arc<Listeners>,
        render_children: Arc<Vec<VNode>>,
        component_tag: Arc<str>,
    }

    /// 父实例
    pub fn parent(&self) -> Option<NodeId> {
        self.own
            .parent
            .or_else(|| self.fallback.as_ref().and_then(|f| f.parent))
    }

    /// 指定钩子的处理函数
    pub fn hooks_for(&self, hook: LifecycleHook) -> Vec<HookFn> {
        self.hooks()
            .and_then(|table| table.get(&hook))
            .cloned()
            .unwrap_or_default()
    }
}

impl fmt::Debug for LayeredOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayeredOptions")
            .field("own", &self.own)
            .field("layered", &self.is_layered())
            .finish()
    }
}

/// 组件实例
pub struct Instance {
    node: NodeId,
    uid: Option<Uid>,
    class: Arc<ComponentClass>,
    options: LayeredOptions,
    phase: InitPhase,
    self_ref: Option<NodeId>,
    render_proxy: RenderProxy,
    parent: Option<NodeId>,
    root: NodeId,
    children: Vec<NodeId>,
    listeners: Listeners,
    slots: IndexMap<String, Vec<VNode>>,
    vnode: Option<VNode>,
    mount_target: Option<String>,
    provided: Option<Arc<ValueMap>>,
    injected_keys: Vec<String>,
    fields: IndexMap<String, ReactiveField>,
    methods: IndexMap<String, MethodFn>,
    computed: IndexMap<String, ComputedFn>,
    watchers: IndexMap<String, Vec<WatchFn>>,
}

impl Instance {
    /// 已分配但尚未初始化的实例外壳
    pub fn shell(node: NodeId, class: Arc<ComponentClass>) -> Self {
        Self {
            node,
            uid: None,
            class,
            options: LayeredOptions::default(),
            phase: InitPhase::Unconstructed,
            self_ref: None,
            render_proxy: RenderProxy::Uninstalled,
            parent: None,
            root: node,
            children: Vec::new(),
            listeners: Listeners::new(),
            slots: IndexMap::new(),
            vnode: None,
            mount_target: None,
            provided: None,
            injected_keys: Vec::new(),
            fields: IndexMap::new(),
            methods: IndexMap::new(),
            computed: IndexMap::new(),
            watchers: IndexMap::new(),
        }
    }

    /// 实例在组件树中的位置
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// 实例唯一标识
    pub fn uid(&self) -> Option<Uid> {
        self.uid
    }

    /// 分配实例唯一标识
    pub fn assign_uid(&mut self, uid: Uid) {
        self.uid = Some(uid);
    }

    /// 组件类
    pub fn class(&self) -> &Arc<ComponentClass> {
        &self.class
    }

    /// 有效选项
    pub fn options(&self) -> &LayeredOptions {
        &self.options
    }

    /// 设置有效选项
    pub fn set_options(&mut self, options: LayeredOptions) {
        self.options = options;
    }

    /// 当前初始化阶段
    pub fn phase(&self) -> InitPhase {
        self.phase
    }

    /// 进入下一个初始化阶段
    pub fn advance(&mut self, to: InitPhase) -> LifecycleResult<()> {
        self.phase = self.phase.advance_to(to)?;
        trace!(node = %self.node, phase = ?self.phase, "初始化阶段推进");
        Ok(())
    }

    /// 自引用
    pub fn self_ref(&self) -> Option<NodeId> {
        self.self_ref
    }

    /// 设置自引用
    pub fn expose_self(&mut self) {
        self.self_ref = Some(self.node);
    }

    /// 渲染代理
    pub fn render_proxy(&self) -> RenderProxy {
        self.render_proxy
    }

    /// 安装渲染代理
    pub fn set_render_proxy(&mut self, proxy: RenderProxy) {
        self.render_proxy = proxy;
    }

    /// 父实例
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// 根实例
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// 设置父实例与根实例
    pub fn attach(&mut self, parent: Option<NodeId>, root: NodeId) {
        self.parent = parent;
        self.root = root;
    }

    /// 子实例
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// 登记子实例
    pub fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    /// 移除子实例
    pub fn remove_child(&mut self, child: NodeId) {
        self.children.retain(|node| *node != child);
    }

    /// 父虚拟节点传入的监听器
    pub fn listeners(&self) -> &Listeners {
        &self.listeners
    }

    /// 设置监听器
    pub fn set_listeners(&mut self, listeners: Listeners) {
        self.listeners = listeners;
    }

    /// 触发事件，返回调用的监听器数量
    pub fn emit(&self, event: &str, args: &[Value]) -> usize {
        let handlers = self.listeners.get(event).map(Vec::as_slice).unwrap_or(&[]);
        for handler in handlers {
            handler(args);
        }
        handlers.len()
    }

    /// 插槽
    pub fn slots(&self) -> &IndexMap<String, Vec<VNode>> {
        &self.slots
    }

    /// 设置插槽
    pub fn set_slots(&mut self, slots: IndexMap<String, Vec<VNode>>) {
        self.slots = slots;
    }

    /// 最近一次渲染得到的虚拟节点
    pub fn vnode(&self) -> Option<&VNode> {
        self.vnode.as_ref()
    }

    /// 保存渲染结果
    pub fn set_vnode(&mut self, vnode: VNode) {
        self.vnode = Some(vnode);
    }

    /// 挂载目标
    pub fn mount_target(&self) -> Option<&str> {
        self.mount_target.as_deref()
    }

    /// 记录挂载目标
    pub fn set_mount_target(&mut self, target: impl Into<String>) {
        self.mount_target = Some(target.into());
    }

    /// 是否已挂载
    pub fn is_mounted(&self) -> bool {
        self.phase == InitPhase::Mounted
    }

    /// 提供给后代的值
    pub fn provided(&self) -> Option<&Arc<ValueMap>> {
        self.provided.as_ref()
    }

    /// 设置提供给后代的值
    pub fn set_provided(&mut self, provided: Arc<ValueMap>) {
        self.provided = Some(provided);
    }

    /// 是否提供了指定 key
    pub fn provides(&self, key: &str) -> bool {
        self.provided.as_ref().map_or(false, |p| p.contains_key(key))
    }

    /// 注入进来的 key
    pub fn injected_keys(&self) -> &[String] {
        &self.injected_keys
    }

    /// 登记注入进来的 key
    pub fn mark_injected(&mut self, key: impl Into<String>) {
        self.injected_keys.push(key.into());
    }

    /// 读取字段值
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key).map(|field| &field.value)
    }

    /// 字段
    pub fn field(&self, key: &str) -> Option<&ReactiveField> {
        self.fields.get(key)
    }

    /// 安装字段
    pub fn insert_field(&mut self, key: impl Into<String>, field: ReactiveField) {
        self.fields.insert(key.into(), field);
    }

    /// 写入字段
    ///
    /// 已有字段先经过写入拦截，再替换值并通知侦听器；不存在的字段作为普通字段添加。
    pub fn set(&mut self, key: &str, value: Value) {
        match self.fields.get_mut(key) {
            Some(field) => {
                if let Some(setter) = &field.setter {
                    setter(key);
                }
                let old = std::mem::replace(&mut field.value, value);
                if let Some(handlers) = self.watchers.get(key) {
                    for handler in handlers {
                        handler(&field.value, &old);
                    }
                }
            }
            None => {
                self.fields.insert(key.to_string(), ReactiveField::plain(value));
            }
        }
    }

    /// 字段名
    pub fn field_keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// 注册方法
    pub fn insert_method(&mut self, key: impl Into<String>, method: MethodFn) {
        self.methods.insert(key.into(), method);
    }

    /// 调用方法
    pub fn call_method(&self, key: &str, args: &[Value]) -> Option<Result<Value, BoxError>> {
        let method = self.methods.get(key)?;
        Some(method(self, args))
    }

    /// 注册计算属性
    pub fn insert_computed(&mut self, key: impl Into<String>, getter: ComputedFn) {
        self.computed.insert(key.into(), getter);
    }

    /// 求值计算属性
    pub fn computed(&self, key: &str) -> Option<Result<Value, BoxError>> {
        let getter = self.computed.get(key)?;
        Some(getter(self))
    }

    /// 注册侦听器
    pub fn insert_watcher(&mut self, key: impl Into<String>, handler: WatchFn) {
        self.watchers.entry(key.into()).or_default().push(handler);
    }

    /// 指定 key 上的侦听器数量
    pub fn watcher_count(&self, key: &str) -> usize {
        self.watchers.get(key).map_or(0, Vec::len)
    }

    /// 实例上是否存在该 key（字段、方法或计算属性）
    pub fn has_key(&self, key: &str) -> bool {
        self.fields.contains_key(key) || self.methods.contains_key(key) || self.computed.contains_key(key)
    }

    /// 格式化后的组件名称，用于诊断
    pub fn component_name(&self) -> String {
        if self.root == self.node && self.parent.is_none() && self.options.parent_vnode().is_none() {
            return "<Root>".to_string();
        }
        match self.options.name().or_else(|| self.options.component_tag()) {
            Some(name) => format!("<{}>", classify(name)),
            None => "<Anonymous>".to_string(),
        }
    }
}

impl fmt::Debug for Instance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instance")
            .field("node", &self.node)
            .field("uid", &self.uid)
            .field("phase", &self.phase)
            .field("parent", &self.parent)
            .field("fields", &self.fields)
            .field("provided", &self.provided)
            .finish_non_exhaustive()
    }
}

/// `my-comp` / `my_comp` -> `MyComp`
fn classify(name: &str) -> String {
    name.split(|c: char| c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect()
}
