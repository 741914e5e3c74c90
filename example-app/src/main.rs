//! # 示例应用程序
//!
//! 演示 Trellis 的组件类声明、全局混入、provide / inject 以及子组件创建

use anyhow::Result;
use clap::Parser;
use component_abstractions::{
    ComponentOptions, InjectSpec, ValueMap, VNode, VNodeComponentOptions,
};
use component_common::{LifecycleHook, NodeId, RuntimeConfig};
use component_composition::{InternalComponentOptions, LoggingConfig, Runtime, RuntimeBuilder};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Trellis 示例应用")]
struct Args {
    /// 配置文件路径（json / toml / yaml）
    #[arg(short, long)]
    config: Option<String>,

    /// 以生产模式运行（关闭诊断）
    #[arg(long)]
    production: bool,

    /// 记录每个实例的初始化耗时
    #[arg(long)]
    performance: bool,

    /// 日志级别
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = RuntimeBuilder::new().with_logging(LoggingConfig {
        level: parse_log_level(&args.log_level),
        ..LoggingConfig::default()
    });
    match &args.config {
        Some(path) => builder = builder.with_config_file(path),
        None => {
            let config = if args.production {
                RuntimeConfig::production()
            } else {
                RuntimeConfig::development()
            };
            builder = builder.with_config(config.with_performance(args.performance));
        }
    }
    let mut runtime = builder.build()?;

    info!("启动 Trellis 示例应用");

    install_plugin(&runtime)?;
    let app = mount_app(&mut runtime)?;
    let panel = create_panel(&mut runtime, app)?;
    demonstrate_injection(&runtime, panel)?;

    info!("示例结束，共创建 {} 个实例", runtime.tree().len());
    Ok(())
}

/// 全局混入：为所有组件添加 created 日志
fn install_plugin(runtime: &Runtime) -> Result<()> {
    runtime.mixin(&ComponentOptions::new().with_hook(LifecycleHook::Created, |instance| {
        info!("created: {}", instance.component_name());
        Ok(())
    }))?;
    Ok(())
}

/// 根实例：提供主题与当前用户
fn mount_app(runtime: &mut Runtime) -> Result<NodeId> {
    let app = runtime.extend(
        ComponentOptions::new()
            .with_name("app")
            .with_data(|_| Ok(object(json!({"user": {"name": "ada"}}))))
            .with_provide_factory(|instance| {
                Ok(object(json!({
                    "theme": "dark",
                    "user": instance.get("user").cloned().unwrap_or(Value::Null),
                })))
            })
            .with_render(|_| Ok(VNode::element("main"))),
    )?;

    let node = runtime.new_instance(&app, Some(ComponentOptions::new().with_el("#app")))?;
    info!(
        "根实例已挂载到 {}",
        runtime.instance(node)?.mount_target().unwrap_or_default()
    );
    Ok(node)
}

/// 通过虚拟节点创建子组件
fn create_panel(runtime: &mut Runtime, parent: NodeId) -> Result<NodeId> {
    let panel = runtime.extend(
        ComponentOptions::new()
            .with_name("user-panel")
            .with_inject_keys(["theme", "user"])
            .with_inject("locale", InjectSpec::from_key("locale").with_default(json!("en")))
            .with_computed("greeting", |instance| {
                let name = instance
                    .get("user")
                    .and_then(|user| user.get("name"))
                    .and_then(Value::as_str)
                    .unwrap_or("guest");
                Ok(json!(format!("hello, {name}")))
            }),
    )?;

    let vnode = VNode::component(
        "user-panel",
        VNodeComponentOptions::new(panel)
            .with_tag("user-panel")
            .with_children(vec![VNode::text("body")]),
    );
    let node = runtime.create_component_instance(InternalComponentOptions::new(parent, Arc::new(vnode)))?;
    Ok(node)
}

/// 打印注入结果与计算属性
fn demonstrate_injection(runtime: &Runtime, panel: NodeId) -> Result<()> {
    let instance = runtime.instance(panel)?;
    for key in instance.injected_keys() {
        info!("注入 {} = {}", key, instance.get(key).unwrap_or(&serde_json::Value::Null));
    }

    let scope = runtime.render_scope(panel)?;
    match scope.get("greeting") {
        Ok(Some(greeting)) => info!("greeting = {}", greeting),
        Ok(None) => info!("greeting 未定义"),
        Err(e) => return Err(anyhow::anyhow!("计算属性求值失败: {}", e)),
    }
    Ok(())
}

fn object(value: Value) -> ValueMap {
    value.as_object().cloned().unwrap_or_default()
}

/// 解析日志级别
fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "info" => tracing::Level::INFO,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
