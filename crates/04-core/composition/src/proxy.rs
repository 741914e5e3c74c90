//! 渲染代理
//!
//! 开发模式下安装带检查的代理：渲染期间读取实例上不存在的属性会输出诊断。
//! 生产模式直接访问实例。

use component_abstractions::{Instance, RenderProxy};
use component_common::{
    diagnostics, BoxError, Diagnostic, DiagnosticKind, DiagnosticSink, RuntimeConfig,
};
use serde_json::Value;

/// 渲染期间可直接引用的全局名称
const ALLOWED_GLOBALS: &[&str] = &[
    "Infinity", "undefined", "NaN", "isFinite", "isNaN", "parseFloat", "parseInt",
    "decodeURI", "decodeURIComponent", "encodeURI", "encodeURIComponent", "Math",
    "Number", "Date", "Array", "Object", "Boolean", "String", "RegExp", "Map", "Set",
    "JSON", "Intl", "BigInt", "require",
];

/// 按运行时配置为实例安装渲染代理
pub fn install(instance: &mut Instance, config: &RuntimeConfig) {
    let proxy = if config.development {
        RenderProxy::Guarded
    } else {
        RenderProxy::Direct
    };
    instance.set_render_proxy(proxy);
}

/// 渲染期间读取实例属性的作用域
pub struct RenderScope<'a> {
    instance: &'a Instance,
    diagnostics: &'a dyn DiagnosticSink,
    config: &'a RuntimeConfig,
}

impl<'a> RenderScope<'a> {
    pub fn new(
        instance: &'a Instance,
        diagnostics: &'a dyn DiagnosticSink,
        config: &'a RuntimeConfig,
    ) -> Self {
        Self {
            instance,
            diagnostics,
            config,
        }
    }

    /// 读取字段或计算属性
    ///
    /// 带检查的代理下，不存在的属性（以 `_` / `$` 开头的内部名称和全局名称除外）输出一条诊断。
    pub fn get(&self, key: &str) -> Result<Option<Value>, BoxError> {
        if let Some(value) = self.instance.get(key) {
            return Ok(Some(value.clone()));
        }
        if let Some(value) = self.instance.computed(key) {
            return value.map(Some);
        }
        if self.instance.render_proxy() == RenderProxy::Guarded
            && !self.instance.has_key(key)
            && !is_allowed(key)
        {
            diagnostics::warn(
                self.diagnostics,
                self.config,
                Diagnostic::new(
                    DiagnosticKind::UndefinedRenderProperty,
                    format!(
                        "Property or method \"{key}\" is not defined on the instance but \
                         referenced during render."
                    ),
                )
                .with_component(self.instance.component_name()),
            );
        }
        Ok(None)
    }
}

fn is_allowed(key: &str) -> bool {
    key.starts_with('_') || key.starts_with('$') || ALLOWED_GLOBALS.contains(&key)
}
