//! 外部协作者接口
//!
//! 实例初始化只通过这些窄接口调用响应式系统、生命周期派发、状态初始化与挂载。

use crate::instance::{Instance, SetterHook};
use component_common::{LifecycleHook, LifecycleResult, StateError};
use serde_json::Value;

/// 响应式属性安装器
pub trait ReactiveInstaller: Send + Sync {
    /// 在实例上安装响应式字段，可附带写入拦截
    fn define_reactive(
        &self,
        instance: &mut Instance,
        key: &str,
        value: Value,
        custom_setter: Option<SetterHook>,
    );

    /// 暂停或恢复自动观察
    fn toggle_observing(&self, enabled: bool);

    /// 当前是否自动观察
    fn is_observing(&self) -> bool;
}

/// 生命周期钩子派发器
pub trait HookDispatcher: Send + Sync {
    /// 按名称调用钩子，钩子的错误直接向上传播
    fn call_hook(&self, instance: &mut Instance, hook: LifecycleHook) -> LifecycleResult<()>;
}

/// 本地状态初始化器（props、methods、data、computed、watch）
pub trait StateInitializer: Send + Sync {
    /// 初始化实例的本地状态
    fn init_state(
        &self,
        instance: &mut Instance,
        installer: &dyn ReactiveInstaller,
    ) -> Result<(), StateError>;
}

/// 挂载器
pub trait Mounter: Send + Sync {
    /// 把实例挂载到目标上
    fn mount(
        &self,
        instance: &mut Instance,
        target: &str,
        hooks: &dyn HookDispatcher,
    ) -> LifecycleResult<()>;
}
