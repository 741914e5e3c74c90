//! 运行时构建器

use crate::hooks::DefaultHookDispatcher;
use crate::mount::DefaultMounter;
use crate::runtime::Runtime;
use crate::state::DefaultStateInitializer;
use component_abstractions::{
    ComponentClass, ComponentTree, HookDispatcher, Mounter, OptionMerger, ReactiveInstaller,
    StateInitializer,
};
use component_common::{
    global_config, DiagnosticSink, RuntimeConfig, RuntimeError, RuntimeResult,
    TracingDiagnostics,
};
use di_impl::{DefaultReactiveInstaller, InjectionResolver, ProvideRegistrar};
use options_impl::{global_root, ConstructorResolver, StrategyMerger};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// 运行时构建器
///
/// 使用建造者模式组装运行时。未指定的协作者使用默认实现，
/// 未指定根组件类时使用进程级全局根类。
pub struct RuntimeBuilder {
    /// 根组件类
    root_class: Option<Arc<ComponentClass>>,
    /// 选项合并器
    merger: Option<Arc<dyn OptionMerger>>,
    /// 响应式安装器
    installer: Option<Arc<dyn ReactiveInstaller>>,
    /// 钩子派发器
    hooks: Option<Arc<dyn HookDispatcher>>,
    /// 状态初始化器
    state: Option<Arc<dyn StateInitializer>>,
    /// 挂载器
    mounter: Option<Arc<dyn Mounter>>,
    /// 诊断输出端
    diagnostics: Option<Arc<dyn DiagnosticSink>>,
    /// 运行时配置
    config: Option<RuntimeConfig>,
    /// 配置文件路径
    config_path: Option<PathBuf>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl RuntimeBuilder {
    /// 创建新的运行时构建器
    pub fn new() -> Self {
        Self {
            root_class: None,
            merger: None,
            installer: None,
            hooks: None,
            state: None,
            mounter: None,
            diagnostics: None,
            config: None,
            config_path: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 使用独立的根组件类，不受全局混入影响
    pub fn with_root_class(mut self, root_class: Arc<ComponentClass>) -> Self {
        self.root_class = Some(root_class);
        self
    }

    /// 自定义选项合并器
    pub fn with_merger(mut self, merger: Arc<dyn OptionMerger>) -> Self {
        self.merger = Some(merger);
        self
    }

    /// 自定义响应式安装器
    pub fn with_reactive_installer(mut self, installer: Arc<dyn ReactiveInstaller>) -> Self {
        self.installer = Some(installer);
        self
    }

    /// 自定义钩子派发器
    pub fn with_hook_dispatcher(mut self, hooks: Arc<dyn HookDispatcher>) -> Self {
        self.hooks = Some(hooks);
        self
    }

    /// 自定义状态初始化器
    pub fn with_state_initializer(mut self, state: Arc<dyn StateInitializer>) -> Self {
        self.state = Some(state);
        self
    }

    /// 自定义挂载器
    pub fn with_mounter(mut self, mounter: Arc<dyn Mounter>) -> Self {
        self.mounter = Some(mounter);
        self
    }

    /// 自定义诊断输出端
    pub fn with_diagnostics(mut self, diagnostics: Arc<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(diagnostics);
        self
    }

    /// 直接指定运行时配置
    pub fn with_config(mut self, config: RuntimeConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// 从配置文件加载运行时配置（叠加 `TRELLIS_*` 环境变量）
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        info!("使用配置文件: {}", path.as_ref().display());
        self.config_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true; // 启用日志初始化
        self
    }

    /// 构建运行时
    pub fn build(self) -> RuntimeResult<Runtime> {
        // 只有在明确配置了日志时才初始化日志
        if self.logging_enabled {
            self.initialize_logging()?;
        }
        info!("开始构建运行时");

        let config = match (self.config, &self.config_path) {
            (Some(config), _) => config,
            (None, Some(path)) => RuntimeConfig::load(Some(path.as_path()))?,
            (None, None) => global_config(),
        };
        debug!(?config, "运行时配置");

        let diagnostics = self
            .diagnostics
            .unwrap_or_else(|| Arc::new(TracingDiagnostics));
        let merger = self.merger.unwrap_or_else(|| {
            Arc::new(StrategyMerger::new(Arc::clone(&diagnostics), config.clone()))
        });
        let state = self.state.unwrap_or_else(|| {
            Arc::new(DefaultStateInitializer::new(
                Arc::clone(&diagnostics),
                config.clone(),
            ))
        });

        let runtime = Runtime {
            root_class: self.root_class.unwrap_or_else(global_root),
            resolver: ConstructorResolver::new(Arc::clone(&merger)),
            merger,
            installer: self
                .installer
                .unwrap_or_else(|| Arc::new(DefaultReactiveInstaller::new())),
            hooks: self
                .hooks
                .unwrap_or_else(|| Arc::new(DefaultHookDispatcher)),
            state,
            mounter: self.mounter.unwrap_or_else(|| Arc::new(DefaultMounter)),
            injector: InjectionResolver::new(Arc::clone(&diagnostics), config.clone()),
            provider: ProvideRegistrar::new(),
            diagnostics,
            config,
            tree: ComponentTree::new(),
        };

        info!(
            root_cid = runtime.root_class.cid(),
            development = runtime.config.development,
            "运行时构建完成"
        );
        Ok(runtime)
    }

    /// 初始化日志系统
    fn initialize_logging(&self) -> RuntimeResult<()> {
        let filter = self.logging_config.env_filter()?;
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(self.logging_config.show_target)
            .with_thread_ids(self.logging_config.show_thread_ids)
            .with_file(self.logging_config.show_file)
            .with_line_number(self.logging_config.show_line_number);

        if self.logging_config.json_format {
            subscriber.json().try_init()
        } else {
            subscriber.try_init()
        }
        .map_err(|e| RuntimeError::BootstrapFailed {
            message: format!("日志初始化失败: {}", e),
        })?;

        info!("日志系统初始化完成");
        Ok(())
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
    /// 过滤指令，例如 `options_impl=debug`；未设置时读取 `RUST_LOG`，再退回到日志级别
    pub filter: Option<String>,
    /// 是否显示目标
    pub show_target: bool,
    /// 是否显示线程ID
    pub show_thread_ids: bool,
    /// 是否显示文件名
    pub show_file: bool,
    /// 是否显示行号
    pub show_line_number: bool,
    /// 是否使用 JSON 格式
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: tracing::Level::INFO,
            filter: None,
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 构造日志过滤器
    pub fn env_filter(&self) -> RuntimeResult<EnvFilter> {
        let filter = match &self.filter {
            Some(directives) => EnvFilter::try_new(directives),
            None => EnvFilter::try_from_default_env()
                .or_else(|_| EnvFilter::try_new(self.level.to_string())),
        };
        filter.map_err(|e| RuntimeError::BootstrapFailed {
            message: format!("日志过滤指令无效: {}", e),
        })
    }

    /// 开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_file: true,
            show_line_number: true,
            ..Self::default()
        }
    }

    /// 生产环境日志配置
    pub fn production() -> Self {
        Self {
            show_target: false,
            json_format: true,
            ..Self::default()
        }
    }
}
