//! 组件运行时

use crate::bookkeeping;
use crate::init::{InstantiationOptions, InternalComponentOptions};
use crate::proxy::RenderScope;
use component_abstractions::{
    ComponentClass, ComponentOptions, ComponentTree, HookDispatcher, Instance, Mounter,
    OptionMerger, ReactiveInstaller, StateInitializer,
};
use component_common::{
    DiagnosticSink, InstanceError, InstanceResult, NodeId, OptionsResult, RuntimeConfig,
};
use di_impl::{InjectionResolver, ProvideRegistrar};
use options_impl::ConstructorResolver;
use std::sync::Arc;
use tracing::warn;

/// 组件运行时
///
/// 持有根组件类、选项合并与解析、依赖注入、各协作者，以及所有实例所在的组件树。
/// 通过 [`crate::RuntimeBuilder`] 创建。
pub struct Runtime {
    pub(crate) root_class: Arc<ComponentClass>,
    pub(crate) merger: Arc<dyn OptionMerger>,
    pub(crate) resolver: ConstructorResolver,
    pub(crate) installer: Arc<dyn ReactiveInstaller>,
    pub(crate) hooks: Arc<dyn HookDispatcher>,
    pub(crate) state: Arc<dyn StateInitializer>,
    pub(crate) mounter: Arc<dyn Mounter>,
    pub(crate) injector: InjectionResolver,
    pub(crate) provider: ProvideRegistrar,
    pub(crate) diagnostics: Arc<dyn DiagnosticSink>,
    pub(crate) config: RuntimeConfig,
    pub(crate) tree: ComponentTree,
}

impl Runtime {
    /// 根组件类
    pub fn root_class(&self) -> &Arc<ComponentClass> {
        &self.root_class
    }

    /// 运行时配置
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// 组件树
    pub fn tree(&self) -> &ComponentTree {
        &self.tree
    }

    /// 获取实例
    pub fn instance(&self, node: NodeId) -> InstanceResult<&Instance> {
        self.tree.instance(node)
    }

    /// 获取实例（可写）
    pub fn instance_mut(&mut self, node: NodeId) -> InstanceResult<&mut Instance> {
        self.tree.instance_mut(node)
    }

    /// 以根组件类为父类声明组件类
    pub fn extend(&self, options: ComponentOptions) -> OptionsResult<Arc<ComponentClass>> {
        options_impl::extend(&self.root_class, options, self.merger.as_ref())
    }

    /// 以指定组件类为父类声明组件类
    pub fn extend_from(
        &self,
        super_class: &Arc<ComponentClass>,
        options: ComponentOptions,
    ) -> OptionsResult<Arc<ComponentClass>> {
        options_impl::extend(super_class, options, self.merger.as_ref())
    }

    /// 混入根组件类的基础选项，影响之后解析的所有组件类
    ///
    /// 返回运行时自身，可以连续调用。
    pub fn mixin(&self, options: &ComponentOptions) -> OptionsResult<&Self> {
        options_impl::mixin_into(&self.root_class, options, self.merger.as_ref())?;
        Ok(self)
    }

    /// 解析组件类的有效选项
    pub fn resolve_constructor_options(
        &self,
        class: &Arc<ComponentClass>,
    ) -> OptionsResult<Arc<ComponentOptions>> {
        self.resolver.resolve(class)
    }

    /// 创建并初始化一个实例
    ///
    /// 选项与组件类的有效选项完整合并。配置了 `el` 时初始化结束后立即挂载。
    pub fn new_instance(
        &mut self,
        class: &Arc<ComponentClass>,
        options: Option<ComponentOptions>,
    ) -> InstanceResult<NodeId> {
        self.instantiate(
            class,
            InstantiationOptions::General(options.unwrap_or_default()),
        )
    }

    /// 为带组件元数据的虚拟节点创建子实例
    ///
    /// 供渲染流程调用，走不做完整合并的内部路径。
    pub fn create_component_instance(
        &mut self,
        options: InternalComponentOptions,
    ) -> InstanceResult<NodeId> {
        let class = options
            .parent_vnode
            .component_options
            .as_ref()
            .map(|component| Arc::clone(&component.class))
            .ok_or_else(|| InstanceError::MissingComponentOptions {
                tag: options.parent_vnode.tag.clone().unwrap_or_default(),
            })?;
        if !self.tree.instance(options.parent)?.phase().is_created() {
            return Err(InstanceError::ParentNotCreated { id: options.parent });
        }
        self.resolver.resolve(&class)?;
        self.instantiate(&class, InstantiationOptions::Internal(options))
    }

    /// 分配实例并按给定路径初始化
    ///
    /// 初始化失败的实例会从父实例的子节点列表中移除。
    pub fn instantiate(
        &mut self,
        class: &Arc<ComponentClass>,
        options: InstantiationOptions,
    ) -> InstanceResult<NodeId> {
        let node = self.tree.allocate(Arc::clone(class));
        if let Err(e) = self.init(node, options) {
            warn!(node = %node, error = %e, "实例初始化失败");
            bookkeeping::detach(&mut self.tree, node);
            return Err(e);
        }
        Ok(node)
    }

    /// 渲染期间读取实例属性的作用域
    pub fn render_scope(&self, node: NodeId) -> InstanceResult<RenderScope<'_>> {
        Ok(RenderScope::new(
            self.tree.instance(node)?,
            self.diagnostics.as_ref(),
            &self.config,
        ))
    }
}
