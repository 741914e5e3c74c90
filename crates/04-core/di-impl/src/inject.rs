//! inject 解析与安装

use component_abstractions::{
    ComponentTree, InjectDefault, Instance, ReactiveInstaller, SetterHook,
};
use component_common::{
    diagnostics, Diagnostic, DiagnosticKind, DiagnosticSink, InjectError, InjectResult, NodeId,
    RuntimeConfig,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

/// 响应式系统在对象上挂的观察标记，不能作为注入 key
pub const OBSERVER_MARKER: &str = "__ob__";

/// 注入值的来源
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectionSource {
    /// 由祖先链上的某个实例提供（可能是请求者自身）
    Provider(NodeId),
    /// 使用了声明中的默认值
    Default,
}

/// 一条解析完成的注入
#[derive(Debug, Clone)]
pub struct ResolvedInjection {
    /// 实例上的本地属性名
    pub key: String,
    pub value: Value,
    pub source: InjectionSource,
}

/// inject 解析器
pub struct InjectionResolver {
    diagnostics: Arc<dyn DiagnosticSink>,
    config: RuntimeConfig,
}

impl InjectionResolver {
    pub fn new(diagnostics: Arc<dyn DiagnosticSink>, config: RuntimeConfig) -> Self {
        Self {
            diagnostics,
            config,
        }
    }

    /// 解析请求者声明的全部注入
    ///
    /// 没有声明 inject 时返回 `None`。查找从请求者自身开始，沿父引用向上，
    /// 遇到第一个提供了该 key 的实例就停止。找不到且没有默认值的 key 输出一条诊断，
    /// 不出现在结果中。
    pub fn resolve(
        &self,
        requester: &Instance,
        tree: &ComponentTree,
    ) -> InjectResult<Option<Vec<ResolvedInjection>>> {
        let Some(inject) = requester.options().inject() else {
            return Ok(None);
        };

        let mut resolved = Vec::with_capacity(inject.len());
        for (key, spec) in inject.iter() {
            if key == OBSERVER_MARKER {
                continue;
            }

            let provider = std::iter::once(requester)
                .chain(requester.parent().into_iter().flat_map(|parent| tree.ancestors(parent)))
                .find_map(|node| {
                    node.provided()
                        .and_then(|provided| provided.get(&spec.from))
                        .map(|value| (node.node(), value.clone()))
                });

            match (provider, &spec.default) {
                (Some((node, value)), _) => {
                    debug!(key = %key, from = %spec.from, provider = %node, "注入来自祖先");
                    resolved.push(ResolvedInjection {
                        key: key.clone(),
                        value,
                        source: InjectionSource::Provider(node),
                    });
                }
                (None, Some(default)) => {
                    let value = match default {
                        InjectDefault::Value(value) => value.clone(),
                        InjectDefault::Factory(factory) => factory(requester).map_err(|source| {
                            InjectError::DefaultFactoryFailed {
                                key: key.clone(),
                                source,
                            }
                        })?,
                    };
                    debug!(key = %key, "注入使用默认值");
                    resolved.push(ResolvedInjection {
                        key: key.clone(),
                        value,
                        source: InjectionSource::Default,
                    });
                }
                (None, None) => {
                    diagnostics::warn(
                        self.diagnostics.as_ref(),
                        &self.config,
                        Diagnostic::new(
                            DiagnosticKind::InjectionNotFound,
                            format!("Injection \"{key}\" not found"),
                        )
                        .with_component(requester.component_name()),
                    );
                }
            }
        }
        Ok(Some(resolved))
    }

    /// 把解析结果安装为实例上的响应式字段
    ///
    /// 安装期间暂停自动观察。开发模式下每个字段都带写入拦截，直接修改时输出诊断但不阻止写入。
    pub fn install(
        &self,
        instance: &mut Instance,
        resolved: Vec<ResolvedInjection>,
        installer: &dyn ReactiveInstaller,
    ) {
        installer.toggle_observing(false);
        for injection in resolved {
            let setter = self
                .config
                .diagnostics_enabled()
                .then(|| self.mutation_warning(instance.component_name()));
            installer.define_reactive(instance, &injection.key, injection.value, setter);
            instance.mark_injected(injection.key);
        }
        installer.toggle_observing(true);
    }

    fn mutation_warning(&self, component: String) -> SetterHook {
        let sink = Arc::clone(&self.diagnostics);
        let config = self.config.clone();
        Arc::new(move |key: &str| {
            diagnostics::warn(
                sink.as_ref(),
                &config,
                Diagnostic::new(
                    DiagnosticKind::InjectedValueMutated,
                    format!(
                        "Avoid mutating an injected value directly since the changes will be \
                         overwritten whenever the provided component re-renders. \
                         injection being mutated: \"{key}\""
                    ),
                )
                .with_component(component.clone()),
            );
        })
    }
}
