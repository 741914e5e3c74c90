//! 生命周期钩子派发

use component_abstractions::{HookDispatcher, Instance};
use component_common::{LifecycleError, LifecycleHook, LifecycleResult};
use tracing::debug;

/// 默认钩子派发器
///
/// 按注册顺序调用选项中的处理函数，第一个失败的处理函数中止派发。
/// 之后向实例上的 `hook:<name>` 监听器广播。
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultHookDispatcher;

impl HookDispatcher for DefaultHookDispatcher {
    fn call_hook(&self, instance: &mut Instance, hook: LifecycleHook) -> LifecycleResult<()> {
        let handlers = instance.options().hooks_for(hook);
        debug!(hook = hook.as_str(), handlers = handlers.len(), node = %instance.node(), "调用生命周期钩子");
        for handler in handlers {
            handler(&mut *instance).map_err(|source| LifecycleError::HookFailed {
                hook: hook.as_str(),
                component: instance.component_name(),
                source,
            })?;
        }
        instance.emit(&format!("hook:{}", hook.as_str()), &[]);
        Ok(())
    }
}
