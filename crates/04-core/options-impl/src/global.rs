//! 进程级基础选项与全局混入
//!
//! 所有通过运行时声明的组件类默认以全局根类为父类。全局混入替换根类的选项，
//! 已声明的子类在下次解析时自动重新合并。

use component_abstractions::{ComponentClass, ComponentOptions, OptionMerger};
use component_common::OptionsResult;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::info;

/// 全局根类
static GLOBAL_ROOT: Lazy<Arc<ComponentClass>> =
    Lazy::new(|| ComponentClass::root(ComponentOptions::new()));

/// 获取全局根类
pub fn global_root() -> Arc<ComponentClass> {
    Arc::clone(&GLOBAL_ROOT)
}

/// 全局根类当前的基础选项
pub fn base_options() -> Arc<ComponentOptions> {
    GLOBAL_ROOT.options()
}

/// 把混入合并进指定类的选项
///
/// 合并结果是新的选项对象，原有选项不被修改。返回目标类，便于连续混入。
pub fn mixin_into(
    class: &Arc<ComponentClass>,
    mixin: &ComponentOptions,
    merger: &dyn OptionMerger,
) -> OptionsResult<Arc<ComponentClass>> {
    let merged = merger.merge(&class.options(), mixin, None)?;
    class.set_options(Arc::new(merged));
    info!(cid = class.cid(), "应用混入");
    Ok(Arc::clone(class))
}

/// 全局混入：合并进全局根类的基础选项，返回全局根类
pub fn mixin(mixin: &ComponentOptions, merger: &dyn OptionMerger) -> OptionsResult<Arc<ComponentClass>> {
    mixin_into(&GLOBAL_ROOT, mixin, merger)
}
