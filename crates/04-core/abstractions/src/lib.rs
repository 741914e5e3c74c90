//! # Component Abstractions
//!
//! 组件实例化与依赖注入的核心抽象。
//!
//! ## 核心接口
//!
//! - [`ComponentOptions`] - 组件选项（静态配置）
//! - [`ComponentClass`] - 组件类，带父类链与选项缓存
//! - [`Instance`] / [`LayeredOptions`] - 组件实例与其有效选项
//! - [`ComponentTree`] - 通过节点位置互相引用的实例树
//! - [`OptionMerger`] - 选项合并器
//! - [`ReactiveInstaller`] / [`HookDispatcher`] / [`StateInitializer`] / [`Mounter`] - 外部协作者

pub mod class;
pub mod collaborators;
pub mod declarations;
pub mod instance;
pub mod merger;
pub mod options;
pub mod tree;
pub mod vnode;

pub use class::*;
pub use collaborators::*;
pub use declarations::*;
pub use instance::*;
pub use merger::*;
pub use options::*;
pub use tree::*;
pub use vnode::*;
