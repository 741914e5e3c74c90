//! provide / inject 在组件树上的集成测试

use anyhow::Result;
use component_abstractions::{ComponentClass, ComponentOptions, InjectSpec, ValueMap};
use component_common::{DiagnosticKind, LifecycleHook, NodeId, RecordingDiagnostics, RuntimeConfig};
use component_composition::{Runtime, RuntimeBuilder};
use di_impl::OBSERVER_MARKER;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn object(value: Value) -> ValueMap {
    value.as_object().cloned().unwrap_or_default()
}

fn runtime() -> Result<(Runtime, Arc<RecordingDiagnostics>)> {
    let sink = Arc::new(RecordingDiagnostics::new());
    let runtime = RuntimeBuilder::new()
        .with_root_class(ComponentClass::root(ComponentOptions::new()))
        .with_diagnostics(sink.clone())
        .with_config(RuntimeConfig::development())
        .build()?;
    Ok((runtime, sink))
}

fn spawn(runtime: &mut Runtime, parent: Option<NodeId>, options: ComponentOptions) -> Result<NodeId> {
    let class = runtime.extend(ComponentOptions::new())?;
    let options = match parent {
        Some(parent) => options.with_parent(parent),
        None => options,
    };
    Ok(runtime.new_instance(&class, Some(options))?)
}

#[test]
fn nearest_ancestor_provider_wins() -> Result<()> {
    let (mut runtime, _) = runtime()?;
    let grandparent = spawn(&mut runtime, None, ComponentOptions::new().with_provide(object(json!({"x": 1}))))?;
    let parent = spawn(&mut runtime, Some(grandparent), ComponentOptions::new().with_provide(object(json!({"x": 2}))))?;
    let child = spawn(&mut runtime, Some(parent), ComponentOptions::new().with_inject_keys(["x"]))?;

    assert_eq!(runtime.instance(child)?.get("x"), Some(&json!(2)));
    Ok(())
}

#[test]
fn farther_ancestor_is_used_when_nearer_ones_do_not_provide() -> Result<()> {
    let (mut runtime, _) = runtime()?;
    let grandparent = spawn(&mut runtime, None, ComponentOptions::new().with_provide(object(json!({"x": 1}))))?;
    let parent = spawn(&mut runtime, Some(grandparent), ComponentOptions::new().with_provide(object(json!({"y": 2}))))?;
    let child = spawn(&mut runtime, Some(parent), ComponentOptions::new().with_inject_keys(["x", "y"]))?;

    let instance = runtime.instance(child)?;
    assert_eq!(instance.get("x"), Some(&json!(1)));
    assert_eq!(instance.get("y"), Some(&json!(2)));
    assert_eq!(instance.injected_keys(), ["x".to_string(), "y".to_string()]);
    Ok(())
}

#[test]
fn literal_default_is_used_without_provider() -> Result<()> {
    let (mut runtime, sink) = runtime()?;
    let node = spawn(
        &mut runtime,
        None,
        ComponentOptions::new().with_inject("x", InjectSpec::from_key("x").with_default(json!(5))),
    )?;

    assert_eq!(runtime.instance(node)?.get("x"), Some(&json!(5)));
    assert!(sink.is_empty());
    Ok(())
}

#[test]
fn factory_default_reads_the_requesting_instance() -> Result<()> {
    let (mut runtime, _) = runtime()?;
    let node = spawn(
        &mut runtime,
        None,
        ComponentOptions::new()
            .with_hook(LifecycleHook::BeforeCreate, |instance| {
                instance.set("y", json!(42));
                Ok(())
            })
            .with_inject(
                "x",
                InjectSpec::from_key("x")
                    .with_default_factory(|instance| Ok(instance.get("y").cloned().unwrap_or(Value::Null))),
            ),
    )?;

    assert_eq!(runtime.instance(node)?.get("x"), Some(&json!(42)));
    Ok(())
}

#[test]
fn unmet_injection_warns_once_and_stays_unset() -> Result<()> {
    let (mut runtime, sink) = runtime()?;
    let node = spawn(&mut runtime, None, ComponentOptions::new().with_inject_keys(["missing"]))?;

    assert!(runtime.instance(node)?.get("missing").is_none());
    assert_eq!(sink.count(DiagnosticKind::InjectionNotFound), 1);
    assert_eq!(sink.len(), 1);
    Ok(())
}

#[test]
fn production_runtime_stays_silent_for_unmet_injection() -> Result<()> {
    let sink = Arc::new(RecordingDiagnostics::new());
    let mut runtime = RuntimeBuilder::new()
        .with_root_class(ComponentClass::root(ComponentOptions::new()))
        .with_diagnostics(sink.clone())
        .with_config(RuntimeConfig::production())
        .build()?;
    let node = spawn(&mut runtime, None, ComponentOptions::new().with_inject_keys(["missing"]))?;

    assert!(runtime.instance(node)?.get("missing").is_none());
    assert!(sink.is_empty());
    Ok(())
}

#[test]
fn provide_factory_runs_exactly_once() -> Result<()> {
    let (mut runtime, _) = runtime()?;
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let parent = spawn(
        &mut runtime,
        None,
        ComponentOptions::new()
            .with_data(|_| Ok(object(json!({"theme": "dark"}))))
            .with_provide_factory(move |instance| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(object(json!({"theme": instance.get("theme").cloned()})))
            }),
    )?;
    let first = spawn(&mut runtime, Some(parent), ComponentOptions::new().with_inject_keys(["theme"]))?;
    let second = spawn(&mut runtime, Some(parent), ComponentOptions::new().with_inject_keys(["theme"]))?;

    assert_eq!(runtime.instance(first)?.get("theme"), Some(&json!("dark")));
    assert_eq!(runtime.instance(second)?.get("theme"), Some(&json!("dark")));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    Ok(())
}

#[test]
fn static_provide_is_shared_with_the_declaration() -> Result<()> {
    let (mut runtime, _) = runtime()?;
    let options = ComponentOptions::new().with_provide(object(json!({"x": 1})));
    let Some(component_abstractions::ProvideDecl::Static(declared)) = options.provide.clone() else {
        anyhow::bail!("expected a static provide declaration");
    };
    let node = spawn(&mut runtime, None, options)?;

    let provided = runtime.instance(node)?.provided().cloned();
    assert!(provided.is_some_and(|provided| Arc::ptr_eq(&provided, &declared)));
    Ok(())
}

#[test]
fn mutating_an_injected_field_warns_but_writes() -> Result<()> {
    let (mut runtime, sink) = runtime()?;
    let parent = spawn(&mut runtime, None, ComponentOptions::new().with_provide(object(json!({"x": 1}))))?;
    let child = spawn(&mut runtime, Some(parent), ComponentOptions::new().with_inject_keys(["x"]))?;

    let instance = runtime.instance_mut(child)?;
    assert!(instance.field("x").is_some_and(|field| field.has_setter() && !field.observed));
    instance.set("x", json!(3));

    assert_eq!(runtime.instance(child)?.get("x"), Some(&json!(3)));
    assert_eq!(sink.count(DiagnosticKind::InjectedValueMutated), 1);
    Ok(())
}

#[test]
fn observer_marker_is_never_injected() -> Result<()> {
    let (mut runtime, sink) = runtime()?;
    let parent = spawn(&mut runtime, None, ComponentOptions::new().with_provide(object(json!({"__ob__": {}}))))?;
    let child = spawn(&mut runtime, Some(parent), ComponentOptions::new().with_inject_keys([OBSERVER_MARKER]))?;

    assert!(runtime.instance(child)?.get(OBSERVER_MARKER).is_none());
    assert!(sink.is_empty());
    Ok(())
}
