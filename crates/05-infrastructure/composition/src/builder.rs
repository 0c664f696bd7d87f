//! 宿主构建器

use crate::bootstrapper::{BootstrapMethods, StartupLoader};
use crate::entry_locator::find_entry_type;
use crate::options::StartupOptions;
use di_abstractions::{
    EntryInstance, EntryType, ModuleLoader, ServiceCollection, ServiceProviderHandle,
};
use di_impl::{BuildServiceProvider, DefaultServiceProviderFactory};
use infrastructure_common::{InfrastructureError, StartupConventions, StartupResult};
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

static LOGGING: OnceCell<()> = OnceCell::new();

/// 宿主构建器
///
/// 定位入口类型、加载启动方法并构建应用容器
pub struct HostBuilder {
    /// 启动选项
    options: StartupOptions,
    /// 模块加载器
    module_loader: Option<Arc<dyn ModuleLoader>>,
    /// 宿主服务，默认包含默认容器工厂
    hosting_services: ServiceCollection,
    /// 自定义约定规则表
    conventions: Option<StartupConventions>,
    /// 是否启用日志初始化
    logging_enabled: bool,
    /// 日志配置
    logging_config: LoggingConfig,
}

impl HostBuilder {
    /// 使用启动选项创建宿主构建器
    pub fn new(options: StartupOptions) -> Self {
        let mut hosting_services = ServiceCollection::new();
        DefaultServiceProviderFactory::register(&mut hosting_services);

        Self {
            options,
            module_loader: None,
            hosting_services,
            conventions: None,
            logging_enabled: false, // 默认不启用日志初始化
            logging_config: LoggingConfig::default(),
        }
    }

    /// 从配置文件和环境变量加载启动选项并创建宿主构建器
    pub fn from_config() -> Result<Self, InfrastructureError> {
        Ok(Self::new(StartupOptions::load()?))
    }

    /// 设置模块加载器
    pub fn with_module_loader<L: ModuleLoader + 'static>(self, loader: L) -> Self {
        self.with_shared_module_loader(Arc::new(loader))
    }

    /// 设置共享的模块加载器
    pub fn with_shared_module_loader(mut self, loader: Arc<dyn ModuleLoader>) -> Self {
        self.module_loader = Some(loader);
        self
    }

    /// 注册宿主服务，例如入口类型实例或自定义容器工厂
    pub fn configure_hosting_services<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut ServiceCollection),
    {
        configure(&mut self.hosting_services);
        self
    }

    /// 使用自定义约定规则表
    pub fn with_conventions(mut self, conventions: StartupConventions) -> Self {
        self.conventions = Some(conventions);
        self
    }

    /// 覆盖运行环境
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        self.options = self.options.with_environment(environment);
        self
    }

    /// 配置日志
    pub fn with_logging(mut self, config: LoggingConfig) -> Self {
        self.logging_config = config;
        self.logging_enabled = true;
        self
    }

    /// 构建宿主
    pub fn build(self) -> Result<Host, InfrastructureError> {
        if self.logging_enabled {
            self.initialize_logging()?;
        }

        info!(
            "开始构建宿主 {}，入口模块: {}",
            self.options.application_name, self.options.entry_module
        );

        let Some(module_loader) = self.module_loader else {
            error!("未配置模块加载器");
            return Err(InfrastructureError::BootstrapFailed {
                message: "未配置模块加载器".to_string(),
            });
        };

        let environment = self.options.environment().map(str::to_string);
        let entry_type =
            find_entry_type(&*module_loader, &self.options.entry_module, environment.as_deref())
                .map_err(|e| {
                    error!("定位入口类型失败: {}", e);
                    e
                })?;

        let hosting_services = self.hosting_services.build_service_provider();
        let loader = match self.conventions {
            Some(conventions) => StartupLoader::with_conventions(conventions),
            None => StartupLoader::new(),
        };
        let methods = loader
            .load_methods(
                Arc::clone(&hosting_services),
                &entry_type,
                environment.as_deref(),
            )
            .map_err(|e| {
                error!("加载启动方法失败: {}", e);
                e
            })?;

        let mut application_collection = ServiceCollection::new();
        let application_services = methods.build_container(&mut application_collection)?;
        debug!(
            "应用服务注册完成，{} 个服务描述符",
            application_collection.len()
        );

        info!("宿主构建完成");
        Ok(Host {
            application_name: self.options.application_name,
            environment,
            entry_type,
            methods,
            hosting_services,
            application_services,
        })
    }

    /// 初始化日志系统，进程内只初始化一次
    fn initialize_logging(&self) -> Result<(), InfrastructureError> {
        LOGGING.get_or_try_init(|| -> Result<(), InfrastructureError> {
            let subscriber = tracing_subscriber::fmt()
                .with_max_level(self.logging_config.level)
                .with_target(self.logging_config.show_target)
                .with_thread_ids(self.logging_config.show_thread_ids)
                .with_file(self.logging_config.show_file)
                .with_line_number(self.logging_config.show_line_number);

            if self.logging_config.json_format {
                subscriber.json().try_init()
            } else {
                subscriber.try_init()
            }
            .map_err(|e| InfrastructureError::BootstrapFailed {
                message: format!("日志初始化失败: {}", e),
            })?;

            info!("日志系统初始化完成");
            Ok(())
        })?;
        Ok(())
    }
}

impl fmt::Debug for HostBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostBuilder")
            .field("options", &self.options)
            .field("module_loader", &self.module_loader.as_ref().map(|_| "<loader>"))
            .field("hosting_services", &self.hosting_services.len())
            .field("conventions", &self.conventions)
            .field("logging_enabled", &self.logging_enabled)
            .finish()
    }
}

/// 已构建的宿主
pub struct Host {
    application_name: String,
    environment: Option<String>,
    entry_type: Arc<EntryType>,
    methods: BootstrapMethods,
    hosting_services: ServiceProviderHandle,
    application_services: ServiceProviderHandle,
}

impl Host {
    /// 应用名称
    pub fn application_name(&self) -> &str {
        &self.application_name
    }

    /// 运行环境
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// 入口类型
    pub fn entry_type(&self) -> &EntryType {
        &self.entry_type
    }

    /// 入口类型实例
    pub fn entry_instance(&self) -> Option<&EntryInstance> {
        self.methods.instance()
    }

    /// 启动方法
    pub fn methods(&self) -> &BootstrapMethods {
        &self.methods
    }

    /// 宿主容器
    pub fn hosting_services(&self) -> &ServiceProviderHandle {
        &self.hosting_services
    }

    /// 应用容器
    pub fn application_services(&self) -> &ServiceProviderHandle {
        &self.application_services
    }

    /// 对应用构建器执行配置方法
    pub fn configure<A: Any>(&self, app: &mut A) -> StartupResult<()> {
        info!("配置应用: {}", self.application_name);
        self.methods.configure(app)
    }
}

impl fmt::Debug for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Host")
            .field("application_name", &self.application_name)
            .field("environment", &self.environment)
            .field("entry_type", &self.entry_type.full_name())
            .field("methods", &self.methods)
            .finish()
    }
}

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: tracing::Level,
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
            show_target: true,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// 创建开发环境日志配置
    pub fn development() -> Self {
        Self {
            level: tracing::Level::DEBUG,
            show_target: true,
            show_thread_ids: true,
            show_file: true,
            show_line_number: true,
            json_format: false,
        }
    }

    /// 创建生产环境日志配置
    pub fn production() -> Self {
        Self {
            level: tracing::Level::INFO,
            show_target: false,
            show_thread_ids: false,
            show_file: false,
            show_line_number: false,
            json_format: true,
        }
    }
}
