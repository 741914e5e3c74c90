//! 选项中的声明类型与回调类型

use crate::instance::Instance;
use crate::vnode::VNode;
use component_common::{BoxError, LifecycleHook};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::Arc;

/// 字符串到值的映射（provide 的值、props 数据、data 返回值）
pub type ValueMap = Map<String, Value>;

/// data 工厂
pub type DataFn = Arc<dyn Fn(&Instance) -> Result<ValueMap, BoxError> + Send + Sync>;
/// provide 工厂
pub type ProvideFn = Arc<dyn Fn(&Instance) -> Result<ValueMap, BoxError> + Send + Sync>;
/// inject 默认值工厂
pub type InjectDefaultFn = Arc<dyn Fn(&Instance) -> Result<Value, BoxError> + Send + Sync>;
/// 生命周期钩子
pub type HookFn = Arc<dyn Fn(&mut Instance) -> Result<(), BoxError> + Send + Sync>;
/// 方法
pub type MethodFn = Arc<dyn Fn(&Instance, &[Value]) -> Result<Value, BoxError> + Send + Sync>;
/// 计算属性 getter
pub type ComputedFn = Arc<dyn Fn(&Instance) -> Result<Value, BoxError> + Send + Sync>;
/// 侦听回调，参数为 (新值, 旧值)
pub type WatchFn = Arc<dyn Fn(&Value, &Value) + Send + Sync>;
/// 事件监听器
pub type ListenerFn = Arc<dyn Fn(&[Value]) + Send + Sync>;
/// 渲染函数
pub type RenderFn = Arc<dyn Fn(&Instance) -> Result<VNode, BoxError> + Send + Sync>;

/// 生命周期钩子表
pub type HookTable = IndexMap<LifecycleHook, Vec<HookFn>>;
/// 事件监听器表
pub type Listeners = IndexMap<String, Vec<ListenerFn>>;
/// props 声明
pub type PropsDecl = IndexMap<String, PropSpec>;
/// inject 声明：本地属性名 -> 来源声明，保持插入顺序
pub type InjectDecl = IndexMap<String, InjectSpec>;

/// 单个 prop 的声明
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropSpec {
    pub default: Option<Value>,
    pub required: bool,
}

impl PropSpec {
    /// 可选 prop
    pub fn optional() -> Self {
        Self::default()
    }

    /// 必需 prop
    pub fn required() -> Self {
        Self {
            default: None,
            required: true,
        }
    }

    /// 设置默认值
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }
}

/// inject 默认值
#[derive(Clone)]
pub enum InjectDefault {
    /// 字面值
    Value(Value),
    /// 以请求注入的实例为上下文执行的工厂
    Factory(InjectDefaultFn),
}

impl fmt::Debug for InjectDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Self::Factory(_) => f.write_str("Factory(<function>)"),
        }
    }
}

/// 单个 inject 的来源声明
#[derive(Debug, Clone)]
pub struct InjectSpec {
    /// 祖先 provide 中的 key
    pub from: String,
    pub default: Option<InjectDefault>,
}

impl InjectSpec {
    /// 从指定 key 注入
    pub fn from_key(from: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            default: None,
        }
    }

    /// 设置字面默认值
    pub fn with_default(mut self, value: Value) -> Self {
        self.default = Some(InjectDefault::Value(value));
        self
    }

    /// 设置默认值工厂
    pub fn with_default_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn(&Instance) -> Result<Value, BoxError> + Send + Sync + 'static,
    {
        self.default = Some(InjectDefault::Factory(Arc::new(factory)));
        self
    }
}

/// 把 key 列表规范化为 inject 声明，每个 key 都从同名的 provide 注入
pub fn inject_keys<I, S>(keys: I) -> InjectDecl
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    keys.into_iter()
        .map(|key| {
            let key = key.into();
            (key.clone(), InjectSpec::from_key(key))
        })
        .collect()
}

/// provide 声明
#[derive(Clone)]
pub enum ProvideDecl {
    /// 直接使用的映射，不做拷贝
    Static(Arc<ValueMap>),
    /// 初始化时以实例为上下文执行一次的工厂
    Factory(ProvideFn),
}

impl ProvideDecl {
    /// 两个声明是否为同一个对象
    pub fn same_as(&self, other: &ProvideDecl) -> bool {
        match (self, other) {
            (Self::Static(a), Self::Static(b)) => Arc::ptr_eq(a, b),
            (Self::Factory(a), Self::Factory(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for ProvideDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(map) => f.debug_tuple("Static").field(map).finish(),
            Self::Factory(_) => f.write_str("Factory(<function>)"),
        }
    }
}
