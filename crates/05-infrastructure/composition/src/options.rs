//! 启动选项

use infrastructure_common::{normalize_environment, ConfigError, ConfigResult};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, error};

/// 环境变量前缀
pub const ENV_PREFIX: &str = "ADSP";

/// 默认配置文件（不含扩展名）
pub const DEFAULT_CONFIG_FILE: &str = "config/startup";

/// 启动选项
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StartupOptions {
    /// 应用名称
    pub application_name: String,
    /// 运行环境，为空表示未指定
    pub environment: Option<String>,
    /// 入口模块标识
    pub entry_module: String,
}

impl Default for StartupOptions {
    fn default() -> Self {
        Self {
            application_name: "lorn-adsp".to_string(),
            environment: None,
            entry_module: String::new(),
        }
    }
}

impl StartupOptions {
    /// 指定入口模块创建选项
    pub fn new(entry_module: impl Into<String>) -> Self {
        Self {
            entry_module: entry_module.into(),
            ..Self::default()
        }
    }

    /// 设置运行环境
    pub fn with_environment(mut self, environment: impl Into<String>) -> Self {
        let environment = environment.into();
        self.environment = normalize_environment(Some(&environment)).map(str::to_string);
        self
    }

    /// 设置应用名称
    pub fn with_application_name(mut self, application_name: impl Into<String>) -> Self {
        self.application_name = application_name.into();
        self
    }

    /// 运行环境
    pub fn environment(&self) -> Option<&str> {
        normalize_environment(self.environment.as_deref())
    }

    /// 从默认配置文件和 `ADSP_*` 环境变量加载
    pub fn load() -> ConfigResult<Self> {
        Self::load_from_source(config::File::with_name(DEFAULT_CONFIG_FILE).required(false))
    }

    /// 从指定配置文件和 `ADSP_*` 环境变量加载，文件格式由扩展名决定
    pub fn load_from(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        Self::load_from_source(config::File::from(path))
    }

    fn load_from_source<S>(source: S) -> ConfigResult<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(source)
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .map_err(|e| {
                error!("启动配置构建失败: {}", e);
                ConfigError::ParseError {
                    source: Box::new(e),
                }
            })?;

        let mut options: Self = settings.try_deserialize().map_err(|e| {
            error!("启动配置绑定失败: {}", e);
            ConfigError::ParseError {
                source: Box::new(e),
            }
        })?;
        options.environment =
            normalize_environment(options.environment.as_deref()).map(str::to_string);

        debug!("启动选项: {:?}", options);
        Ok(options)
    }
}
