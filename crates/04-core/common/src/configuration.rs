//! 运行时配置

use crate::errors::ConfigResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// 环境变量前缀，例如 `TRELLIS_DEVELOPMENT=true`
pub const ENV_PREFIX: &str = "TRELLIS";

/// 运行时配置
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// 开发模式：启用诊断输出、注入值写入告警与渲染代理检查
    pub development: bool,
    /// 静默模式：屏蔽所有诊断输出
    pub silent: bool,
    /// 记录每个实例的初始化耗时
    pub performance: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            development: cfg!(debug_assertions),
            silent: false,
            performance: false,
        }
    }
}

impl RuntimeConfig {
    /// 开发模式配置
    pub fn development() -> Self {
        Self {
            development: true,
            ..Self::default()
        }
    }

    /// 生产模式配置
    pub fn production() -> Self {
        Self {
            development: false,
            ..Self::default()
        }
    }

    /// 设置静默模式
    pub fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// 设置性能度量
    pub fn with_performance(mut self, performance: bool) -> Self {
        self.performance = performance;
        self
    }

    /// 是否需要输出诊断信息
    pub fn diagnostics_enabled(&self) -> bool {
        self.development && !self.silent
    }

    /// 从可选的配置文件和 `TRELLIS_*` 环境变量加载配置
    ///
    /// 文件格式由扩展名决定（json / toml / yaml），环境变量优先级更高。
    pub fn load(path: Option<&Path>) -> ConfigResult<Self> {
        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path).required(false));
        }
        let settings = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;
        Ok(settings.try_deserialize::<RuntimeConfig>()?)
    }
}
