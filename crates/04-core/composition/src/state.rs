//! 本地状态初始化
//!
//! 顺序为 props、methods、data、computed、watch。

use component_abstractions::{Instance, ReactiveInstaller, StateInitializer};
use component_common::{
    diagnostics, Diagnostic, DiagnosticKind, DiagnosticSink, RuntimeConfig, StateError,
    TracingDiagnostics,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// 默认状态初始化器
pub struct DefaultStateInitializer {
    diagnostics: Arc<dyn DiagnosticSink>,
    config: RuntimeConfig,
}

impl DefaultStateInitializer {
    pub fn new(diagnostics: Arc<dyn DiagnosticSink>, config: RuntimeConfig) -> Self {
        Self {
            diagnostics,
            config,
        }
    }

    fn warn(&self, instance: &Instance, kind: DiagnosticKind, message: String) {
        diagnostics::warn(
            self.diagnostics.as_ref(),
            &self.config,
            Diagnostic::new(kind, message).with_component(instance.component_name()),
        );
    }

    fn init_props(&self, instance: &mut Instance, installer: &dyn ReactiveInstaller) {
        let Some(props) = instance.options().props().cloned() else {
            return;
        };
        let props_data = instance.options().props_data().cloned();

        // 非根实例的 props 值来自父实例，已经被观察过
        let is_root = instance.parent().is_none();
        if !is_root {
            installer.toggle_observing(false);
        }
        for (key, spec) in props.iter() {
            let value = match props_data.as_ref().and_then(|data| data.get(key)) {
                Some(value) => value.clone(),
                None => {
                    if spec.required && spec.default.is_none() {
                        self.warn(
                            instance,
                            DiagnosticKind::MissingRequiredProp,
                            format!("Missing required prop: \"{key}\""),
                        );
                    }
                    spec.default.clone().unwrap_or(Value::Null)
                }
            };
            installer.define_reactive(instance, key, value, None);
        }
        installer.toggle_observing(true);
    }

    fn init_data(
        &self,
        instance: &mut Instance,
        installer: &dyn ReactiveInstaller,
    ) -> Result<(), StateError> {
        let Some(data) = instance.options().data().cloned() else {
            return Ok(());
        };
        let values = data(&*instance).map_err(|source| StateError::DataFactoryFailed {
            component: instance.component_name(),
            source,
        })?;

        let props = instance.options().props().cloned();
        for (key, value) in values {
            if props.as_ref().is_some_and(|props| props.contains_key(&key)) {
                self.warn(
                    instance,
                    DiagnosticKind::ReservedDataKey,
                    format!(
                        "The data property \"{key}\" is already declared as a prop. \
                         Use prop default value instead."
                    ),
                );
                continue;
            }
            installer.define_reactive(instance, &key, value, None);
        }
        Ok(())
    }
}

impl Default for DefaultStateInitializer {
    fn default() -> Self {
        Self::new(Arc::new(TracingDiagnostics), component_common::global_config())
    }
}

impl StateInitializer for DefaultStateInitializer {
    fn init_state(
        &self,
        instance: &mut Instance,
        installer: &dyn ReactiveInstaller,
    ) -> Result<(), StateError> {
        self.init_props(instance, installer);

        if let Some(methods) = instance.options().methods().cloned() {
            for (key, method) in methods.iter() {
                instance.insert_method(key.clone(), Arc::clone(method));
            }
        }

        self.init_data(instance, installer)?;

        if let Some(computed) = instance.options().computed().cloned() {
            for (key, getter) in computed.iter() {
                instance.insert_computed(key.clone(), Arc::clone(getter));
            }
        }

        if let Some(watch) = instance.options().watch().cloned() {
            for (key, handlers) in watch.iter() {
                for handler in handlers {
                    instance.insert_watcher(key.clone(), Arc::clone(handler));
                }
            }
        }

        debug!(node = %instance.node(), fields = instance.field_keys().count(), "本地状态初始化完成");
        Ok(())
    }
}
