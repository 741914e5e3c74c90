//! 按字段策略合并选项
//!
//! | 字段                                   | 策略                         |
//! |----------------------------------------|------------------------------|
//! | 生命周期钩子                           | 父在前子在后拼接，按引用去重 |
//! | `data` / `provide`                     | 递归合并，子优先             |
//! | `props` / `methods` / `computed` / `inject` | 扩展，子覆盖父          |
//! | `components` / `directives`            | 扩展映射                     |
//! | `watch`                                | 按 key 拼接                  |
//! | `el` / `props_data`                    | 子优先，只允许在创建实例时使用 |
//! | 其他字段                               | 子存在取子，否则取父         |
//!
//! 子选项的 `extends` 与 `mixins` 先折叠进父选项。

use component_abstractions::{
    ComponentOptions, DataFn, HookTable, Instance, OptionMerger, ProvideDecl, ValueMap, WatchFn,
};
use component_common::{
    diagnostics, global_config, BoxError, Diagnostic, DiagnosticKind, DiagnosticSink,
    OptionsError, OptionsResult, RuntimeConfig, TracingDiagnostics,
};
use indexmap::IndexMap;
use serde_json::Value;
use std::hash::Hash;
use std::sync::Arc;

const RESERVED_COMPONENT_NAMES: [&str; 2] = ["slot", "component"];

/// 校验组件名称
pub fn validate_component_name(name: &str) -> OptionsResult<()> {
    let mut chars = name.chars();
    let valid = chars.next().map_or(false, |c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !valid {
        return Err(OptionsError::InvalidComponentName {
            name: name.to_string(),
        });
    }
    if RESERVED_COMPONENT_NAMES.contains(&name.to_ascii_lowercase().as_str()) {
        return Err(OptionsError::ReservedComponentName {
            name: name.to_string(),
        });
    }
    Ok(())
}

fn validate_inject(options: &ComponentOptions) -> OptionsResult<()> {
    for (key, spec) in options.inject.iter().flat_map(|decl| decl.iter()) {
        if spec.from.is_empty() {
            return Err(OptionsError::InvalidInject {
                key: key.clone(),
                message: "from 不能为空".to_string(),
            });
        }
    }
    Ok(())
}

/// 默认选项合并器
pub struct StrategyMerger {
    diagnostics: Arc<dyn DiagnosticSink>,
    config: RuntimeConfig,
}

impl StrategyMerger {
    /// 创建合并器
    pub fn new(diagnostics: Arc<dyn DiagnosticSink>, config: RuntimeConfig) -> Self {
        Self {
            diagnostics,
            config,
        }
    }

    fn instance_only<T: ?Sized>(
        &self,
        key: &str,
        parent: &Option<Arc<T>>,
        child: &Option<Arc<T>>,
        instance: Option<&Instance>,
    ) -> Option<Arc<T>> {
        if instance.is_none() && child.is_some() {
            diagnostics::warn(
                self.diagnostics.as_ref(),
                &self.config,
                Diagnostic::new(
                    DiagnosticKind::InstanceOnlyOption,
                    format!("option \"{key}\" can only be used during instance creation"),
                ),
            );
        }
        pick(parent, child)
    }
}

impl Default for StrategyMerger {
    fn default() -> Self {
        Self::new(Arc::new(TracingDiagnostics), global_config())
    }
}

impl OptionMerger for StrategyMerger {
    fn merge(
        &self,
        parent: &ComponentOptions,
        child: &ComponentOptions,
        instance: Option<&Instance>,
    ) -> OptionsResult<ComponentOptions> {
        for name in child.components.iter().flat_map(|registry| registry.keys()) {
            validate_component_name(name)?;
        }
        validate_inject(child)?;

        let mut folded: Option<ComponentOptions> = None;
        if let Some(base) = &child.extends {
            folded = Some(self.merge(parent, base, instance)?);
        }
        for mixin in child.mixins.iter().flat_map(|mixins| mixins.iter()) {
            let next = self.merge(folded.as_ref().unwrap_or(parent), mixin, instance)?;
            folded = Some(next);
        }
        let parent = folded.as_ref().unwrap_or(parent);

        Ok(ComponentOptions {
            name: pick(&parent.name, &child.name),
            el: self.instance_only("el", &parent.el, &child.el, instance),
            parent: child.parent.or(parent.parent),
            props: extend_map(&parent.props, &child.props),
            props_data: self.instance_only("propsData", &parent.props_data, &child.props_data, instance),
            data: merge_data(&parent.data, &child.data),
            computed: extend_map(&parent.computed, &child.computed),
            methods: extend_map(&parent.methods, &child.methods),
            watch: merge_watch(&parent.watch, &child.watch),
            hooks: merge_hooks(&parent.hooks, &child.hooks),
            components: extend_map(&parent.components, &child.components),
            directives: merge_value_map(&parent.directives, &child.directives),
            provide: merge_provide(&parent.provide, &child.provide),
            inject: extend_map(&parent.inject, &child.inject),
            mixins: None,
            extends: None,
            render: pick(&parent.render, &child.render),
            static_render_fns: pick(&parent.static_render_fns, &child.static_render_fns),
            parent_vnode: pick(&parent.parent_vnode, &child.parent_vnode),
            parent_listeners: pick(&parent.parent_listeners, &child.parent_listeners),
            render_children: pick(&parent.render_children, &child.render_children),
            component_tag: pick(&parent.component_tag, &child.component_tag),
        })
    }
}

fn pick<T: ?Sized>(parent: &Option<Arc<T>>, child: &Option<Arc<T>>) -> Option<Arc<T>> {
    child.clone().or_else(|| parent.clone())
}

fn extend_map<K, V>(
    parent: &Option<Arc<IndexMap<K, V>>>,
    child: &Option<Arc<IndexMap<K, V>>>,
) -> Option<Arc<IndexMap<K, V>>>
where
    K: Hash + Eq + Clone,
    V: Clone,
{
    match (parent, child) {
        (Some(parent), Some(child)) => {
            let mut merged = IndexMap::clone(parent);
            merged.extend(child.iter().map(|(k, v)| (k.clone(), v.clone())));
            Some(Arc::new(merged))
        }
        _ => pick(parent, child),
    }
}

fn merge_value_map(
    parent: &Option<Arc<ValueMap>>,
    child: &Option<Arc<ValueMap>>,
) -> Option<Arc<ValueMap>> {
    match (parent, child) {
        (Some(parent), Some(child)) => {
            let mut merged = ValueMap::clone(parent);
            merged.extend(child.iter().map(|(k, v)| (k.clone(), v.clone())));
            Some(Arc::new(merged))
        }
        _ => pick(parent, child),
    }
}

fn merge_hooks(parent: &Option<Arc<HookTable>>, child: &Option<Arc<HookTable>>) -> Option<Arc<HookTable>> {
    let (Some(parent), Some(child)) = (parent, child) else {
        return pick(parent, child);
    };
    let mut merged = HookTable::clone(parent);
    for (hook, handlers) in child.iter() {
        let entry = merged.entry(*hook).or_default();
        for handler in handlers {
            if !entry.iter().any(|existing| Arc::ptr_eq(existing, handler)) {
                entry.push(Arc::clone(handler));
            }
        }
    }
    Some(Arc::new(merged))
}

fn merge_watch(
    parent: &Option<Arc<IndexMap<String, Vec<WatchFn>>>>,
    child: &Option<Arc<IndexMap<String, Vec<WatchFn>>>>,
) -> Option<Arc<IndexMap<String, Vec<WatchFn>>>> {
    let (Some(parent), Some(child)) = (parent, child) else {
        return pick(parent, child);
    };
    let mut merged = IndexMap::clone(parent);
    for (key, handlers) in child.iter() {
        merged.entry(key.clone()).or_default().extend(handlers.iter().cloned());
    }
    Some(Arc::new(merged))
}

/// 把 `from` 中缺失的 key 递归补进 `to`，`to` 优先
pub fn merge_data_values(to: &mut ValueMap, from: &ValueMap) {
    for (key, from_value) in from {
        match to.get_mut(key) {
            None => {
                to.insert(key.clone(), from_value.clone());
            }
            Some(Value::Object(to_object)) => {
                if let Value::Object(from_object) = from_value {
                    merge_data_values(to_object, from_object);
                }
            }
            Some(_) => {}
        }
    }
}

fn merge_data(parent: &Option<DataFn>, child: &Option<DataFn>) -> Option<DataFn> {
    let (Some(parent), Some(child)) = (parent, child) else {
        return pick(parent, child);
    };
    let (parent, child) = (Arc::clone(parent), Arc::clone(child));
    Some(Arc::new(move |instance: &Instance| -> Result<ValueMap, BoxError> {
        let mut data = child(instance)?;
        merge_data_values(&mut data, &parent(instance)?);
        Ok(data)
    }))
}

fn evaluate_provide(decl: &ProvideDecl, instance: &Instance) -> Result<ValueMap, BoxError> {
    match decl {
        ProvideDecl::Static(map) => Ok(ValueMap::clone(map)),
        ProvideDecl::Factory(factory) => factory(instance),
    }
}

fn merge_provide(parent: &Option<ProvideDecl>, child: &Option<ProvideDecl>) -> Option<ProvideDecl> {
    let (Some(parent), Some(child)) = (parent, child) else {
        return child.clone().or_else(|| parent.clone());
    };
    let (parent, child) = (parent.clone(), child.clone());
    Some(ProvideDecl::Factory(Arc::new(
        move |instance: &Instance| -> Result<ValueMap, BoxError> {
            let mut provided = evaluate_provide(&child, instance)?;
            merge_data_values(&mut provided, &evaluate_provide(&parent, instance)?);
            Ok(provided)
        },
    )))
}
