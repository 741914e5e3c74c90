//! # Component Common
//!
//! Trellis 组件核心层的公共类型。
//!
//! ## 核心内容
//!
//! - [`errors`] - 错误类型与结果别名
//! - [`configuration`] - 运行时配置（开发模式、静默、性能度量）
//! - [`diagnostics`] - 非致命诊断输出
//! - [`lifecycle`] - 生命周期钩子与实例初始化阶段
//! - [`metadata`] - 实例标识与类标识

pub mod configuration;
pub mod diagnostics;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use configuration::*;
pub use diagnostics::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;

/// 进程级运行时配置
///
/// 生命周期与进程相同，新建的运行时默认读取这里的配置。
static GLOBAL_CONFIG: once_cell::sync::Lazy<parking_lot::RwLock<RuntimeConfig>> =
    once_cell::sync::Lazy::new(|| parking_lot::RwLock::new(RuntimeConfig::default()));

/// 获取当前进程级运行时配置
pub fn global_config() -> RuntimeConfig {
    GLOBAL_CONFIG.read().clone()
}

/// 设置进程级运行时配置
pub fn set_global_config(config: RuntimeConfig) {
    *GLOBAL_CONFIG.write() = config;
}
