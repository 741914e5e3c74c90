//! # 组件组合层
//!
//! 把选项解析、依赖注入与各个协作者组合成一个可以创建组件实例的运行时。
//!
//! ## 主要功能
//!
//! - **运行时构建器**: 使用构建者模式组装运行时
//! - **实例初始化**: 按固定顺序完成选项解析、注入、状态初始化、provide 与挂载
//! - **子组件创建**: 渲染流程通过虚拟节点创建子组件实例，走不做完整合并的内部路径
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use component_abstractions::ComponentOptions;
//! use component_composition::RuntimeBuilder;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut runtime = RuntimeBuilder::new().build()?;
//!
//!     let app = runtime.extend(ComponentOptions::new().with_name("app"))?;
//!     let node = runtime.new_instance(&app, None)?;
//!
//!     println!("{}", runtime.instance(node)?.component_name());
//!     Ok(())
//! }
//! ```

pub mod bookkeeping;
pub mod builder;
pub mod hooks;
pub mod init;
pub mod mount;
pub mod proxy;
pub mod runtime;
pub mod state;

pub use builder::{LoggingConfig, RuntimeBuilder};
pub use hooks::DefaultHookDispatcher;
pub use init::{InstantiationOptions, InternalComponentOptions};
pub use mount::DefaultMounter;
pub use proxy::RenderScope;
pub use runtime::Runtime;
pub use state::DefaultStateInitializer;

#[cfg(test)]
mod tests;
