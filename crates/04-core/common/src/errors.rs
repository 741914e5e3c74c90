//! 错误类型定义

use crate::lifecycle::InitPhase;
use crate::metadata::NodeId;
use thiserror::Error;

/// 用户回调（钩子、工厂函数、渲染函数）返回的错误类型
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// 配置加载错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("运行时配置加载失败: {source}")]
    LoadFailed {
        #[from]
        source: config::ConfigError,
    },
}

/// 组件选项错误类型
#[derive(Error, Debug)]
pub enum OptionsError {
    #[error("组件名称无效: \"{name}\", 名称必须以字母开头，且只能包含字母、数字、连字符和下划线")]
    InvalidComponentName { name: String },

    #[error("组件名称 \"{name}\" 是保留标签，不能用作组件 id")]
    ReservedComponentName { name: String },

    #[error("inject 声明无效: {key}, 原因: {message}")]
    InvalidInject { key: String, message: String },
}

/// 注入解析错误类型
#[derive(Error, Debug)]
pub enum InjectError {
    #[error("inject 默认值工厂执行失败: {key}, 原因: {source}")]
    DefaultFactoryFailed { key: String, source: BoxError },
}

/// provide 注册错误类型
#[derive(Error, Debug)]
pub enum ProvideError {
    #[error("provide 工厂执行失败: {component}, 原因: {source}")]
    FactoryFailed { component: String, source: BoxError },
}

/// 本地状态初始化错误类型
#[derive(Error, Debug)]
pub enum StateError {
    #[error("data 工厂执行失败: {component}, 原因: {source}")]
    DataFactoryFailed { component: String, source: BoxError },
}

/// 生命周期错误类型
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("生命周期钩子执行失败: {hook} ({component}), 原因: {source}")]
    HookFailed {
        hook: &'static str,
        component: String,
        source: BoxError,
    },

    #[error("非法的初始化阶段转换: {from:?} -> {to:?}")]
    InvalidTransition { from: InitPhase, to: InitPhase },

    #[error("挂载失败: {target}, 原因: {source}")]
    MountFailed { target: String, source: BoxError },
}

/// 实例构造错误类型
#[derive(Error, Debug)]
pub enum InstanceError {
    #[error("选项错误: {source}")]
    Options {
        #[from]
        source: OptionsError,
    },

    #[error("注入错误: {source}")]
    Inject {
        #[from]
        source: InjectError,
    },

    #[error("provide 错误: {source}")]
    Provide {
        #[from]
        source: ProvideError,
    },

    #[error("状态初始化错误: {source}")]
    State {
        #[from]
        source: StateError,
    },

    #[error("生命周期错误: {source}")]
    Lifecycle {
        #[from]
        source: LifecycleError,
    },

    #[error("组件实例不存在: {id}")]
    InstanceNotFound { id: NodeId },

    #[error("虚拟节点缺少组件元数据: {tag}")]
    MissingComponentOptions { tag: String },

    #[error("父实例尚未完成初始化: {id}")]
    ParentNotCreated { id: NodeId },
}

/// 运行时构建错误类型
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("运行时配置错误: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("运行时构建失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type OptionsResult<T> = Result<T, OptionsError>;
pub type InjectResult<T> = Result<T, InjectError>;
pub type LifecycleResult<T> = Result<T, LifecycleError>;
pub type InstanceResult<T> = Result<T, InstanceError>;
pub type RuntimeResult<T> = Result<T, RuntimeError>;
