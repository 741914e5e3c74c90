//! # Options Implementation
//!
//! 组件选项的具体实现。
//!
//! ## 主要组件
//!
//! - [`StrategyMerger`] - 按字段策略合并选项
//! - [`ConstructorResolver`] - 沿父类链解析组件类的有效选项，带缓存失效
//! - [`extend`] - 声明子类
//! - [`mixin`] / [`global_root`] - 进程级基础选项与全局混入

pub mod extend;
pub mod global;
pub mod merger;
pub mod resolver;

pub use extend::*;
pub use global::*;
pub use merger::*;
pub use resolver::*;
