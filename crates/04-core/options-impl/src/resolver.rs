//! 组件类有效选项的解析
//!
//! 父类选项以引用身份缓存。父类链上任一层在声明之后重新解析或被替换过选项，
//! 子类会在下次解析时重新合并，并保留自身在声明之后被直接修改的字段。

use component_abstractions::{ComponentClass, ComponentOptions, ModifiedOptions, OptionMerger};
use component_common::OptionsResult;
use std::sync::Arc;
use tracing::debug;

/// 组件类选项解析器
#[derive(Clone)]
pub struct ConstructorResolver {
    merger: Arc<dyn OptionMerger>,
}

impl ConstructorResolver {
    /// 创建解析器
    pub fn new(merger: Arc<dyn OptionMerger>) -> Self {
        Self { merger }
    }

    /// 使用的合并器
    pub fn merger(&self) -> &Arc<dyn OptionMerger> {
        &self.merger
    }

    /// 解析组件类的有效选项
    ///
    /// 没有父类时直接返回保存的选项。父类选项与缓存是同一个对象时不重新合并。
    pub fn resolve(&self, class: &Arc<ComponentClass>) -> OptionsResult<Arc<ComponentOptions>> {
        let Some(super_class) = class.super_class() else {
            return Ok(class.options());
        };

        let super_options = self.resolve(super_class)?;
        let cached = class.cached_super_options();
        if cached.is_some_and(|cached| Arc::ptr_eq(&cached, &super_options)) {
            debug!(cid = class.cid(), "父类选项未变化，沿用已解析的选项");
            return Ok(class.options());
        }

        debug!(
            cid = class.cid(),
            super_cid = super_class.cid(),
            "父类选项已变化，重新合并"
        );
        if let Some(modified) = resolve_modified_options(class) {
            debug!(cid = class.cid(), "保留声明之后被修改的字段");
            class.overlay_extend_options(modified);
        }

        let mut merged = self
            .merger
            .merge(&super_options, &class.extend_options(), None)?;
        class.register_self(&mut merged);
        let merged = Arc::new(merged);

        class.set_cached_super_options(super_options);
        class.set_options(Arc::clone(&merged));
        class.seal();
        Ok(merged)
    }
}

/// 组件类保存的选项中，与声明基线相比被修改过的字段
pub fn resolve_modified_options(class: &ComponentClass) -> Option<ModifiedOptions> {
    class.options().modified_since(&class.sealed_options())
}
