//! 声明子类

use crate::merger::validate_component_name;
use component_abstractions::{ComponentClass, ComponentOptions, OptionMerger};
use component_common::OptionsResult;
use std::sync::Arc;
use tracing::info;

/// 以 `super_class` 为父类声明一个新的组件类
///
/// 合并结果作为子类的选项与声明基线。有名称的子类会在自己的注册表中登记自身。
pub fn extend(
    super_class: &Arc<ComponentClass>,
    extend_options: ComponentOptions,
    merger: &dyn OptionMerger,
) -> OptionsResult<Arc<ComponentClass>> {
    let name = extend_options.name.clone().or_else(|| super_class.name());
    if let Some(name) = &name {
        validate_component_name(name)?;
    }

    let super_options = super_class.options();
    let merged = merger.merge(&super_options, &extend_options, None)?;
    let class = ComponentClass::derived(
        Arc::clone(super_class),
        super_options,
        extend_options,
        merged,
    );

    if name.is_some() {
        let mut options = ComponentOptions::clone(&class.options());
        class.register_self(&mut options);
        class.set_options(Arc::new(options));
        class.seal();
    }

    info!(
        cid = class.cid(),
        super_cid = super_class.cid(),
        name = name.as_deref().unwrap_or("<Anonymous>"),
        "声明组件类"
    );
    Ok(class)
}
