//! 挂载

use component_abstractions::{HookDispatcher, Instance, Mounter};
use component_common::{InitPhase, LifecycleError, LifecycleHook, LifecycleResult};
use tracing::{debug, info};

/// 默认挂载器
///
/// 记录挂载目标，依次触发 `beforeMount`、执行渲染函数、进入已挂载阶段并触发 `mounted`。
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMounter;

impl Mounter for DefaultMounter {
    fn mount(
        &self,
        instance: &mut Instance,
        target: &str,
        hooks: &dyn HookDispatcher,
    ) -> LifecycleResult<()> {
        instance.set_mount_target(target);
        hooks.call_hook(instance, LifecycleHook::BeforeMount)?;

        match instance.options().render().cloned() {
            Some(render) => {
                let vnode = render(&*instance).map_err(|source| LifecycleError::MountFailed {
                    target: target.to_string(),
                    source,
                })?;
                instance.set_vnode(vnode);
            }
            None => debug!(node = %instance.node(), "没有渲染函数，跳过渲染"),
        }

        instance.advance(InitPhase::Mounted)?;
        hooks.call_hook(instance, LifecycleHook::Mounted)?;
        info!(component = %instance.component_name(), target, "实例已挂载");
        Ok(())
    }
}
