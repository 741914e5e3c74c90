//! 实例初始化
//!
//! 初始化严格按以下顺序进行，任何一步失败都直接向调用方返回错误：
//!
//! 1. 分配 uid
//! 2. 解析选项（内部路径或通用路径）
//! 3. 安装渲染代理
//! 4. 暴露自身引用
//! 5. 生命周期、事件、渲染相关的簿记
//! 6. `beforeCreate`
//! 7. 解析并安装注入
//! 8. 初始化本地状态
//! 9. 登记 provide
//! 10. `created`
//! 11. 配置了挂载目标时立即挂载

use crate::bookkeeping;
use crate::proxy;
use crate::runtime::Runtime;
use component_abstractions::{ComponentOptions, LayeredOptions, RenderFn, VNode};
use component_common::{next_uid, InitPhase, InstanceResult, LifecycleHook, NodeId};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// 实例化选项
#[derive(Debug, Clone)]
pub enum InstantiationOptions {
    /// 用户传入的选项，与组件类的有效选项完整合并
    General(ComponentOptions),
    /// 渲染流程创建子组件时使用
    Internal(InternalComponentOptions),
}

impl Default for InstantiationOptions {
    fn default() -> Self {
        Self::General(ComponentOptions::default())
    }
}

/// 内部子组件的实例化选项
#[derive(Clone)]
pub struct InternalComponentOptions {
    pub parent: NodeId,
    /// 组件占位节点
    pub parent_vnode: Arc<VNode>,
    pub render: Option<RenderFn>,
    pub static_render_fns: Option<Arc<Vec<RenderFn>>>,
}

impl InternalComponentOptions {
    pub fn new(parent: NodeId, parent_vnode: Arc<VNode>) -> Self {
        Self {
            parent,
            parent_vnode,
            render: None,
            static_render_fns: None,
        }
    }

    /// 使用自定义渲染函数
    pub fn with_render(mut self, render: RenderFn, static_render_fns: Vec<RenderFn>) -> Self {
        self.render = Some(render);
        self.static_render_fns = Some(Arc::new(static_render_fns));
        self
    }
}

impl std::fmt::Debug for InternalComponentOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InternalComponentOptions")
            .field("parent", &self.parent)
            .field("parent_vnode", &self.parent_vnode.tag)
            .field("render", &self.render.is_some())
            .finish()
    }
}

impl Runtime {
    pub(crate) fn init(&mut self, node: NodeId, options: InstantiationOptions) -> InstanceResult<()> {
        let started = self.config.performance.then(Instant::now);
        let uid = next_uid();
        self.tree.instance_mut(node)?.assign_uid(uid);
        debug!(uid, node = %node, "开始初始化实例");

        match options {
            InstantiationOptions::Internal(internal) => self.init_internal_component(node, internal)?,
            InstantiationOptions::General(options) => self.init_general_options(node, options)?,
        }

        let instance = self.tree.instance_mut(node)?;
        instance.advance(InitPhase::OptionsResolved)?;
        proxy::install(instance, &self.config);
        instance.expose_self();

        bookkeeping::init_lifecycle(&mut self.tree, node)?;
        let instance = self.tree.instance_mut(node)?;
        bookkeeping::init_events(instance);
        bookkeeping::init_render(instance);

        self.hooks.call_hook(instance, LifecycleHook::BeforeCreate)?;
        instance.advance(InitPhase::BeforeCreateFired)?;

        let resolved = self.injector.resolve(self.tree.instance(node)?, &self.tree)?;
        let instance = self.tree.instance_mut(node)?;
        if let Some(resolved) = resolved {
            self.injector.install(instance, resolved, self.installer.as_ref());
        }
        instance.advance(InitPhase::InjectionsInstalled)?;

        self.state.init_state(instance, self.installer.as_ref())?;
        instance.advance(InitPhase::StateInitialized)?;

        self.provider.register(instance)?;
        instance.advance(InitPhase::ProvisionsInstalled)?;

        self.hooks.call_hook(instance, LifecycleHook::Created)?;
        instance.advance(InitPhase::Created)?;
        debug!(uid, node = %node, "实例初始化完成");

        if let Some(started) = started {
            info!("init {}: {:?}", instance.component_name(), started.elapsed());
        }

        if let Some(target) = instance.options().el().cloned() {
            self.mounter.mount(instance, &target, self.hooks.as_ref())?;
        }
        Ok(())
    }

    /// 内部路径：以组件类的静态选项为回退层，只写入虚拟节点带来的字段
    fn init_internal_component(
        &mut self,
        node: NodeId,
        internal: InternalComponentOptions,
    ) -> InstanceResult<()> {
        let instance = self.tree.instance_mut(node)?;
        let mut options = LayeredOptions::layered(instance.class().options());
        let own = options.own_mut();
        own.parent = Some(internal.parent);
        if let Some(component) = &internal.parent_vnode.component_options {
            own.props_data = component.props_data.clone();
            own.parent_listeners = component.listeners.clone();
            own.render_children = component.children.clone();
            own.component_tag = component.tag.clone();
        }
        own.parent_vnode = Some(internal.parent_vnode);
        if let Some(render) = internal.render {
            own.render = Some(render);
            own.static_render_fns = internal.static_render_fns;
        }
        instance.set_options(options);
        Ok(())
    }

    /// 通用路径：组件类的有效选项与传入选项完整合并
    fn init_general_options(&mut self, node: NodeId, options: ComponentOptions) -> InstanceResult<()> {
        let class = Arc::clone(self.tree.instance(node)?.class());
        let resolved = self.resolver.resolve(&class)?;
        let merged = self
            .merger
            .merge(&resolved, &options, Some(self.tree.instance(node)?))?;
        self.tree
            .instance_mut(node)?
            .set_options(LayeredOptions::flat(merged));
        Ok(())
    }
}
