//! 非致命诊断输出
//!
//! 诊断只记录，不中断执行。

use crate::configuration::RuntimeConfig;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::warn as trace_warn;

/// 诊断类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    /// 注入的 key 在祖先链上找不到提供者，且没有默认值
    InjectionNotFound,
    /// 直接修改了注入进来的属性
    InjectedValueMutated,
    /// 渲染期间读取了实例上未定义的属性
    UndefinedRenderProperty,
    /// 在没有实例的情况下合并了只能用于实例创建的选项
    InstanceOnlyOption,
    /// 缺少必需的 prop
    MissingRequiredProp,
    /// data 中的 key 与 prop 冲突
    ReservedDataKey,
}

/// 一条诊断
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// 格式化后的组件名称，例如 `<Root>`、`<Child>`
    pub component: Option<String>,
    pub emitted_at: DateTime<Utc>,
}

impl Diagnostic {
    /// 创建新的诊断
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            component: None,
            emitted_at: Utc::now(),
        }
    }

    /// 附加组件名称
    pub fn with_component(mut self, component: impl Into<String>) -> Self {
        self.component = Some(component.into());
        self
    }
}

/// 诊断输出端
pub trait DiagnosticSink: Send + Sync {
    /// 输出一条诊断
    fn emit(&self, diagnostic: Diagnostic);
}

/// 按运行时配置过滤后输出诊断
///
/// 生产模式或静默模式下不输出。
pub fn warn(sink: &dyn DiagnosticSink, config: &RuntimeConfig, diagnostic: Diagnostic) {
    if config.diagnostics_enabled() {
        sink.emit(diagnostic);
    }
}

/// 基于 tracing 的诊断输出
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticSink for TracingDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        match &diagnostic.component {
            Some(component) => trace_warn!(
                kind = ?diagnostic.kind,
                "[Trellis warn]: {}\n\n(found in {})",
                diagnostic.message,
                component
            ),
            None => trace_warn!(kind = ?diagnostic.kind, "[Trellis warn]: {}", diagnostic.message),
        }
    }
}

/// 记录所有诊断，供测试和工具读取
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    records: Mutex<Vec<Diagnostic>>,
}

impl RecordingDiagnostics {
    /// 创建新的记录器
    pub fn new() -> Self {
        Self::default()
    }

    /// 已记录的诊断
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().clone()
    }

    /// 指定类型的诊断数量
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.records.lock().iter().filter(|d| d.kind == kind).count()
    }

    /// 诊断总数
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// 是否没有任何诊断
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// 清空记录
    pub fn clear(&self) {
        self.records.lock().clear();
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn emit(&self, diagnostic: Diagnostic) {
        self.records.lock().push(diagnostic);
    }
}
