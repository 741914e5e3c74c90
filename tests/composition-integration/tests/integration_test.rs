//! 组件类选项解析与实例构造的集成测试

use anyhow::Result;
use component_abstractions::{
    ComponentClass, ComponentOptions, Instance, OptionMerger, VNode, VNodeComponentOptions,
    ValueMap,
};
use component_common::{LifecycleHook, OptionsResult, RecordingDiagnostics, RuntimeConfig};
use component_composition::{InternalComponentOptions, Runtime, RuntimeBuilder};
use options_impl::StrategyMerger;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 统计调用次数的合并器
struct CountingMerger {
    inner: StrategyMerger,
    calls: AtomicUsize,
}

impl CountingMerger {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            inner: StrategyMerger::new(Arc::new(RecordingDiagnostics::new()), RuntimeConfig::development()),
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl OptionMerger for CountingMerger {
    fn merge(
        &self,
        parent: &ComponentOptions,
        child: &ComponentOptions,
        instance: Option<&Instance>,
    ) -> OptionsResult<ComponentOptions> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.merge(parent, child, instance)
    }
}

fn object(value: Value) -> ValueMap {
    value.as_object().cloned().unwrap_or_default()
}

fn runtime_with(merger: Arc<CountingMerger>) -> Result<Runtime> {
    Ok(RuntimeBuilder::new()
        .with_root_class(ComponentClass::root(ComponentOptions::new()))
        .with_merger(merger)
        .with_config(RuntimeConfig::development())
        .build()?)
}

fn runtime() -> Result<Runtime> {
    runtime_with(CountingMerger::new())
}

#[test]
fn mixin_added_after_declaration_reaches_subclasses() -> Result<()> {
    let runtime = runtime()?;
    let a = runtime.extend(ComponentOptions::new().with_name("a"))?;
    let b = runtime.extend_from(&a, ComponentOptions::new().with_name("b"))?;

    runtime.mixin(&ComponentOptions::new().with_method("plugged", |_, _| Ok(json!("plugin"))))?;

    let resolved = runtime.resolve_constructor_options(&b)?;
    assert!(resolved.methods.as_ref().is_some_and(|methods| methods.contains_key("plugged")));
    assert!(runtime
        .resolve_constructor_options(&a)?
        .methods
        .as_ref()
        .is_some_and(|methods| methods.contains_key("plugged")));
    Ok(())
}

#[test]
fn runtime_mixins_chain() -> Result<()> {
    let runtime = runtime()?;
    let a = runtime.extend(ComponentOptions::new().with_name("a"))?;

    runtime
        .mixin(&ComponentOptions::new().with_method("first", |_, _| Ok(json!(1))))?
        .mixin(&ComponentOptions::new().with_method("second", |_, _| Ok(json!(2))))?;

    let resolved = runtime.resolve_constructor_options(&a)?;
    let methods = resolved.methods.as_ref().expect("mixins add methods");
    assert!(methods.contains_key("first") && methods.contains_key("second"));
    Ok(())
}

#[test]
fn mixin_on_a_middle_class_reaches_its_subclasses() -> Result<()> {
    let runtime = runtime()?;
    let a = runtime.extend(ComponentOptions::new().with_name("a"))?;
    let b = runtime.extend_from(&a, ComponentOptions::new().with_name("b"))?;

    options_impl::mixin_into(
        &a,
        &ComponentOptions::new().with_hook(LifecycleHook::Mounted, |_| Ok(())),
        &StrategyMerger::new(Arc::new(RecordingDiagnostics::new()), RuntimeConfig::development()),
    )?;

    let resolved = runtime.resolve_constructor_options(&b)?;
    assert_eq!(resolved.hooks_for(LifecycleHook::Mounted).len(), 1);
    Ok(())
}

#[test]
fn unchanged_class_resolves_to_identical_options() -> Result<()> {
    let merger = CountingMerger::new();
    let runtime = runtime_with(merger.clone())?;
    let a = runtime.extend(ComponentOptions::new().with_inject_keys(["theme"]))?;
    let b = runtime.extend_from(&a, ComponentOptions::new().with_name("b"))?;
    let calls = merger.calls();

    let first = runtime.resolve_constructor_options(&b)?;
    let second = runtime.resolve_constructor_options(&b)?;

    assert!(Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(
        first.inject.as_ref().expect("inject is inherited"),
        second.inject.as_ref().expect("inject is inherited"),
    ));
    assert_eq!(merger.calls(), calls);
    Ok(())
}

#[test]
fn late_modification_survives_upstream_change() -> Result<()> {
    let runtime = runtime()?;
    let a = runtime.extend(ComponentOptions::new().with_name("a"))?;
    let b = runtime.extend_from(&a, ComponentOptions::new().with_name("b"))?;

    b.update_options(|options| {
        *options = options.clone().with_method("late", |_, _| Ok(json!("late")));
    });
    runtime.mixin(&ComponentOptions::new().with_hook(LifecycleHook::Created, |_| Ok(())))?;

    let resolved = runtime.resolve_constructor_options(&b)?;
    assert!(resolved.methods.as_ref().is_some_and(|methods| methods.contains_key("late")));
    assert_eq!(resolved.hooks_for(LifecycleHook::Created).len(), 1);
    assert!(b.lookup_component("b").is_some());

    // 重新合并后基线已更新，再次解析命中缓存
    let again = runtime.resolve_constructor_options(&b)?;
    assert!(Arc::ptr_eq(&resolved, &again));
    Ok(())
}

#[test]
fn late_removal_survives_upstream_change() -> Result<()> {
    let runtime = runtime()?;
    let b = runtime.extend(
        ComponentOptions::new()
            .with_name("b")
            .with_method("declared", |_, _| Ok(json!("declared"))),
    )?;

    b.update_options(|options| options.methods = None);
    runtime.mixin(&ComponentOptions::new().with_hook(LifecycleHook::Created, |_| Ok(())))?;

    let resolved = runtime.resolve_constructor_options(&b)?;
    assert!(resolved.methods.is_none());
    assert_eq!(resolved.hooks_for(LifecycleHook::Created).len(), 1);
    Ok(())
}

#[test]
fn provide_observes_injected_and_local_state() -> Result<()> {
    let mut runtime = runtime()?;
    let provider = runtime.extend(ComponentOptions::new().with_provide(object(json!({"a": "from-root"}))))?;
    let root = runtime.new_instance(&provider, None)?;

    let middle = runtime.extend(
        ComponentOptions::new()
            .with_inject_keys(["a"])
            .with_data(|_| Ok(object(json!({"local": 1}))))
            .with_provide_factory(|instance| {
                Ok(object(json!({
                    "b": instance.get("a").cloned(),
                    "c": instance.get("local").cloned(),
                })))
            }),
    )?;
    let node = runtime.new_instance(&middle, Some(ComponentOptions::new().with_parent(root)))?;

    let instance = runtime.instance(node)?;
    let provided = instance.provided().expect("provide registered");
    assert_eq!(provided["b"], json!("from-root"));
    assert_eq!(provided.get("b"), instance.get("a"));
    assert_eq!(provided["c"], json!(1));
    Ok(())
}

#[test]
fn internal_path_never_calls_the_merger() -> Result<()> {
    let merger = CountingMerger::new();
    let mut runtime = runtime_with(merger.clone())?;
    let parent_class = runtime.extend(ComponentOptions::new().with_name("parent"))?;
    let child_class = runtime.extend(ComponentOptions::new().with_name("child"))?;
    let parent = runtime.new_instance(&parent_class, None)?;

    let before = merger.calls();
    let vnode = VNode::component(
        "child",
        VNodeComponentOptions::new(Arc::clone(&child_class)).with_tag("child"),
    );
    let child = runtime.create_component_instance(InternalComponentOptions::new(parent, Arc::new(vnode)))?;

    assert_eq!(merger.calls(), before);
    let options = runtime.instance(child)?.options();
    assert!(options.is_layered());
    assert!(options
        .fallback()
        .is_some_and(|fallback| Arc::ptr_eq(fallback, &child_class.options())));
    assert!(options.own().name.is_none());
    assert_eq!(options.name().map(|name| name.as_ref()), Some("child"));
    Ok(())
}

#[test]
fn general_path_produces_flat_options() -> Result<()> {
    let merger = CountingMerger::new();
    let mut runtime = runtime_with(merger.clone())?;
    let class = runtime.extend(ComponentOptions::new().with_name("flat"))?;

    let before = merger.calls();
    let node = runtime.new_instance(&class, None)?;

    assert_eq!(merger.calls(), before + 1);
    let options = runtime.instance(node)?.options();
    assert!(!options.is_layered());
    assert_eq!(options.own().name.as_deref(), Some("flat"));
    Ok(())
}

#[test]
fn global_mixin_extends_the_process_base_options() -> Result<()> {
    let merger = StrategyMerger::new(Arc::new(RecordingDiagnostics::new()), RuntimeConfig::development());
    let before = options_impl::base_options();

    options_impl::mixin(
        &ComponentOptions::new().with_directive("global-focus", json!({"inserted": true})),
        &merger,
    )?;

    let after = options_impl::base_options();
    assert!(!Arc::ptr_eq(&before, &after));
    assert!(after
        .directives
        .as_ref()
        .is_some_and(|directives| directives.contains_key("global-focus")));

    let runtime = RuntimeBuilder::new().with_config(RuntimeConfig::development()).build()?;
    let class = runtime.extend(ComponentOptions::new().with_name("global-child"))?;
    let resolved = runtime.resolve_constructor_options(&class)?;
    assert!(resolved
        .directives
        .as_ref()
        .is_some_and(|directives| directives.contains_key("global-focus")));
    Ok(())
}
