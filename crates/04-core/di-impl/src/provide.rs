//! provide 注册

use component_abstractions::{Instance, ProvideDecl};
use component_common::ProvideError;
use std::sync::Arc;
use tracing::debug;

/// provide 注册器
#[derive(Debug, Default, Clone, Copy)]
pub struct ProvideRegistrar;

impl ProvideRegistrar {
    pub fn new() -> Self {
        Self
    }

    /// 计算并登记实例提供给后代的值
    ///
    /// 没有声明 provide 时不做任何事。静态映射直接共享，不做拷贝；
    /// 工厂以实例为上下文只执行这一次。
    pub fn register(&self, instance: &mut Instance) -> Result<(), ProvideError> {
        let Some(decl) = instance.options().provide().cloned() else {
            return Ok(());
        };

        let provided = match decl {
            ProvideDecl::Static(map) => map,
            ProvideDecl::Factory(factory) => {
                let map = factory(instance).map_err(|source| ProvideError::FactoryFailed {
                    component: instance.component_name(),
                    source,
                })?;
                Arc::new(map)
            }
        };

        debug!(
            node = %instance.node(),
            keys = ?provided.keys().collect::<Vec<_>>(),
            "登记 provide"
        );
        instance.set_provided(provided);
        Ok(())
    }
}
