//! 运行时与实例初始化测试

use crate::{InternalComponentOptions, RuntimeBuilder};
use component_abstractions::{
    ComponentClass, ComponentOptions, Instance, PropSpec, RenderProxy, VNode,
    VNodeComponentOptions,
};
use component_common::{
    DiagnosticKind, InitPhase, InstanceError, LifecycleError, LifecycleHook,
    RecordingDiagnostics, RuntimeConfig,
};
use serde_json::{json, Value};
use parking_lot::Mutex;
use std::sync::Arc;

fn runtime(config: RuntimeConfig) -> (crate::Runtime, Arc<RecordingDiagnostics>) {
    let sink = Arc::new(RecordingDiagnostics::new());
    let runtime = RuntimeBuilder::new()
        .with_root_class(ComponentClass::root(ComponentOptions::new()))
        .with_diagnostics(sink.clone())
        .with_config(config)
        .build()
        .unwrap();
    (runtime, sink)
}

fn record(log: &Arc<Mutex<Vec<String>>>, entry: &str) {
    log.lock().push(entry.to_string());
}

#[test]
fn hooks_observe_each_initialization_stage() {
    let (mut runtime, _) = runtime(RuntimeConfig::development());
    let log = Arc::new(Mutex::new(Vec::new()));
    let (before, created, mounted) = (log.clone(), log.clone(), log.clone());

    let class = runtime
        .extend(
            ComponentOptions::new()
                .with_name("stage")
                .with_data(|_| Ok(json!({"ready": true}).as_object().cloned().unwrap_or_default()))
                .with_hook(LifecycleHook::BeforeCreate, move |instance| {
                    assert_eq!(instance.phase(), InitPhase::OptionsResolved);
                    assert!(instance.get("ready").is_none());
                    record(&before, "beforeCreate");
                    Ok(())
                })
                .with_hook(LifecycleHook::Created, move |instance| {
                    assert_eq!(instance.phase(), InitPhase::ProvisionsInstalled);
                    assert_eq!(instance.get("ready"), Some(&json!(true)));
                    record(&created, "created");
                    Ok(())
                })
                .with_hook(LifecycleHook::Mounted, move |instance| {
                    assert!(instance.is_mounted());
                    record(&mounted, "mounted");
                    Ok(())
                }),
        )
        .unwrap();

    let node = runtime
        .new_instance(&class, Some(ComponentOptions::new().with_el("#app")))
        .unwrap();

    assert_eq!(*log.lock(), vec!["beforeCreate", "created", "mounted"]);
    let instance = runtime.instance(node).unwrap();
    assert_eq!(instance.phase(), InitPhase::Mounted);
    assert_eq!(instance.mount_target(), Some("#app"));
    assert_eq!(instance.self_ref(), Some(node));
}

#[test]
fn uids_increase_across_instances() {
    let (mut runtime, _) = runtime(RuntimeConfig::development());
    let class = runtime.extend(ComponentOptions::new()).unwrap();

    let first = runtime.new_instance(&class, None).unwrap();
    let second = runtime.new_instance(&class, None).unwrap();

    let first_uid = runtime.instance(first).unwrap().uid().unwrap();
    let second_uid = runtime.instance(second).unwrap().uid().unwrap();
    assert!(second_uid > first_uid);
}

#[test]
fn instance_without_el_is_not_mounted() {
    let (mut runtime, _) = runtime(RuntimeConfig::development());
    let class = runtime.extend(ComponentOptions::new()).unwrap();

    let node = runtime.new_instance(&class, None).unwrap();
    let instance = runtime.instance(node).unwrap();
    assert_eq!(instance.phase(), InitPhase::Created);
    assert!(!instance.is_mounted());
}

#[test]
fn render_output_is_recorded_on_mount() {
    let (mut runtime, _) = runtime(RuntimeConfig::development());
    let class = runtime
        .extend(ComponentOptions::new().with_render(|instance| {
            let title = instance.get("title").and_then(Value::as_str).unwrap_or_default();
            Ok(VNode::element("h1").with_child(VNode::text(title)))
        }))
        .unwrap();

    let node = runtime
        .new_instance(
            &class,
            Some(
                ComponentOptions::new()
                    .with_el("#app")
                    .with_data(|_| Ok(json!({"title": "hi"}).as_object().cloned().unwrap_or_default())),
            ),
        )
        .unwrap();

    let vnode = runtime.instance(node).unwrap().vnode().unwrap();
    assert_eq!(vnode.tag.as_deref(), Some("h1"));
    assert_eq!(vnode.children[0].text.as_deref(), Some("hi"));
}

#[test]
fn hook_failure_aborts_construction() {
    let (mut runtime, _) = runtime(RuntimeConfig::development());
    let class = runtime
        .extend(
            ComponentOptions::new()
                .with_name("fragile")
                .with_hook(LifecycleHook::Created, |_| Err("created failed".into())),
        )
        .unwrap();

    let result = runtime.new_instance(&class, None);
    assert!(matches!(
        result,
        Err(InstanceError::Lifecycle {
            source: LifecycleError::HookFailed { hook: "created", .. }
        })
    ));
}

#[test]
fn failed_child_is_detached_and_cannot_parent() {
    let (mut runtime, _) = runtime(RuntimeConfig::development());
    let parent_class = runtime.extend(ComponentOptions::new().with_name("list")).unwrap();
    let fragile = runtime
        .extend(
            ComponentOptions::new()
                .with_name("fragile")
                .with_hook(LifecycleHook::Created, |_| Err("created failed".into())),
        )
        .unwrap();
    let healthy = runtime.extend(ComponentOptions::new().with_name("healthy")).unwrap();
    let parent = runtime.new_instance(&parent_class, None).unwrap();

    let vnode = Arc::new(VNode::component("fragile", VNodeComponentOptions::new(fragile)));
    assert!(runtime
        .create_component_instance(InternalComponentOptions::new(parent, vnode))
        .is_err());
    assert!(runtime.instance(parent).unwrap().children().is_empty());

    let failed = component_common::NodeId(runtime.tree().len() - 1);
    assert!(!runtime.instance(failed).unwrap().phase().is_created());

    let result = runtime.new_instance(&healthy, Some(ComponentOptions::new().with_parent(failed)));
    assert!(matches!(result, Err(InstanceError::ParentNotCreated { id }) if id == failed));

    let vnode = Arc::new(VNode::component("healthy", VNodeComponentOptions::new(healthy)));
    let result = runtime.create_component_instance(InternalComponentOptions::new(failed, vnode));
    assert!(matches!(result, Err(InstanceError::ParentNotCreated { .. })));
}

#[test]
fn internal_child_receives_vnode_data() {
    let (mut runtime, _) = runtime(RuntimeConfig::development());
    let parent_class = runtime.extend(ComponentOptions::new().with_name("list")).unwrap();
    let child_class = runtime
        .extend(
            ComponentOptions::new()
                .with_name("list-item")
                .with_prop("label", PropSpec::required()),
        )
        .unwrap();
    let parent = runtime.new_instance(&parent_class, None).unwrap();

    let heard = Arc::new(Mutex::new(Vec::new()));
    let sink = heard.clone();
    let mut listeners = component_abstractions::Listeners::new();
    let listener: component_abstractions::ListenerFn = Arc::new(move |args: &[Value]| {
        sink.lock().extend(args.iter().cloned());
    });
    listeners.insert("select".to_string(), vec![listener]);

    let vnode = VNode::component(
        "list-item",
        VNodeComponentOptions::new(child_class)
            .with_props_data(json!({"label": "first"}).as_object().cloned().unwrap_or_default())
            .with_listeners(listeners)
            .with_children(vec![
                VNode::text("body"),
                VNode::element("i").with_data("slot", json!("icon")),
            ])
            .with_tag("list-item"),
    );
    let child = runtime
        .create_component_instance(InternalComponentOptions::new(parent, Arc::new(vnode)))
        .unwrap();

    let instance = runtime.instance(child).unwrap();
    assert!(instance.options().is_layered());
    assert_eq!(instance.get("label"), Some(&json!("first")));
    assert_eq!(instance.parent(), Some(parent));
    assert_eq!(instance.root(), parent);
    assert_eq!(instance.slots().keys().collect::<Vec<_>>(), vec!["default", "icon"]);
    assert_eq!(instance.component_name(), "<ListItem>");
    assert_eq!(instance.emit("select", &[json!(1)]), 1);
    assert_eq!(*heard.lock(), vec![json!(1)]);
    assert_eq!(runtime.instance(parent).unwrap().children(), [child]);
}

#[test]
fn internal_child_can_override_render() {
    let (mut runtime, _) = runtime(RuntimeConfig::development());
    let parent_class = runtime.extend(ComponentOptions::new()).unwrap();
    let child_class = runtime.extend(ComponentOptions::new().with_name("leaf")).unwrap();
    let parent = runtime.new_instance(&parent_class, None).unwrap();

    let render: component_abstractions::RenderFn =
        Arc::new(|_: &Instance| -> Result<VNode, component_common::BoxError> { Ok(VNode::element("span")) });
    let vnode = Arc::new(VNode::component("leaf", VNodeComponentOptions::new(child_class)));
    let child = runtime
        .create_component_instance(
            InternalComponentOptions::new(parent, vnode).with_render(render.clone(), Vec::new()),
        )
        .unwrap();

    let options = runtime.instance(child).unwrap().options();
    assert!(Arc::ptr_eq(options.render().unwrap(), &render));
    assert!(options.static_render_fns().is_some());
}

#[test]
fn vnode_without_component_metadata_is_rejected() {
    let (mut runtime, _) = runtime(RuntimeConfig::development());
    let class = runtime.extend(ComponentOptions::new()).unwrap();
    let parent = runtime.new_instance(&class, None).unwrap();

    let result = runtime.create_component_instance(InternalComponentOptions::new(
        parent,
        Arc::new(VNode::element("div")),
    ));
    assert!(matches!(result, Err(InstanceError::MissingComponentOptions { .. })));
}

#[test]
fn render_proxy_follows_development_mode() {
    let (mut dev, dev_sink) = runtime(RuntimeConfig::development());
    let class = dev.extend(ComponentOptions::new()).unwrap();
    let node = dev.new_instance(&class, None).unwrap();
    assert_eq!(dev.instance(node).unwrap().render_proxy(), RenderProxy::Guarded);
    assert_eq!(dev.render_scope(node).unwrap().get("nope").unwrap(), None);
    assert_eq!(dev_sink.count(DiagnosticKind::UndefinedRenderProperty), 1);

    let (mut prod, prod_sink) = runtime(RuntimeConfig::production());
    let class = prod.extend(ComponentOptions::new()).unwrap();
    let node = prod.new_instance(&class, None).unwrap();
    assert_eq!(prod.instance(node).unwrap().render_proxy(), RenderProxy::Direct);
    assert_eq!(prod.render_scope(node).unwrap().get("nope").unwrap(), None);
    assert!(prod_sink.is_empty());
}

#[test]
fn performance_mode_still_constructs() {
    let (mut runtime, _) = runtime(RuntimeConfig::development().with_performance(true));
    let class = runtime.extend(ComponentOptions::new().with_name("timed")).unwrap();
    let node = runtime.new_instance(&class, None).unwrap();
    assert_eq!(runtime.instance(node).unwrap().phase(), InitPhase::Created);
}

#[test]
fn builder_loads_config_file() {
    use std::io::Write;

    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{ "development": false }}"#).unwrap();

    let runtime = RuntimeBuilder::new()
        .with_root_class(ComponentClass::root(ComponentOptions::new()))
        .with_config_file(file.path())
        .build()
        .unwrap();
    assert!(!runtime.config().development);
}
