//! 选项合并器抽象接口

use crate::instance::Instance;
use crate::options::ComponentOptions;
use component_common::OptionsResult;

/// 选项合并器
///
/// 按字段策略把两份选项合并成一份新选项，不修改输入。
pub trait OptionMerger: Send + Sync {
    /// 合并父选项与子选项
    ///
    /// `instance` 只在创建实例时传入，部分策略需要实例上下文。
    fn merge(
        &self,
        parent: &ComponentOptions,
        child: &ComponentOptions,
        instance: Option<&Instance>,
    ) -> OptionsResult<ComponentOptions>;
}
