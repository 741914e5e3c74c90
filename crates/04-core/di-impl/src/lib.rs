//! # 依赖注入具体实现
//!
//! 祖先向后代传值的 provide / inject 机制。
//!
//! - [`InjectionResolver`] - 从实例自身开始沿祖先链查找提供者
//! - [`ProvideRegistrar`] - 计算实例提供给后代的值
//! - [`DefaultReactiveInstaller`] - 带观察开关的响应式字段安装器

pub mod inject;
pub mod provide;
pub mod reactive;

pub use inject::*;
pub use provide::*;
pub use reactive::*;
