//! 默认的响应式字段安装器

use component_abstractions::{Instance, ReactiveField, ReactiveInstaller, SetterHook};
use serde_json::Value;
use std::sync::atomic::{AtomicBool, Ordering};

/// 默认响应式安装器
///
/// 观察开启时，对象和数组类型的值会被标记为深度观察。
#[derive(Debug)]
pub struct DefaultReactiveInstaller {
    observing: AtomicBool,
}

impl DefaultReactiveInstaller {
    pub fn new() -> Self {
        Self {
            observing: AtomicBool::new(true),
        }
    }
}

impl Default for DefaultReactiveInstaller {
    fn default() -> Self {
        Self::new()
    }
}

impl ReactiveInstaller for DefaultReactiveInstaller {
    fn define_reactive(
        &self,
        instance: &mut Instance,
        key: &str,
        value: Value,
        custom_setter: Option<SetterHook>,
    ) {
        let observed = self.is_observing() && (value.is_object() || value.is_array());
        instance.insert_field(key, ReactiveField::new(value, observed, custom_setter));
    }

    fn toggle_observing(&self, enabled: bool) {
        self.observing.store(enabled, Ordering::SeqCst);
    }

    fn is_observing(&self) -> bool {
        self.observing.load(Ordering::SeqCst)
    }
}
