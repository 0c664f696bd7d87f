//! 错误类型定义

use thiserror::Error;

/// 用户方法调用错误
///
/// 约定方法自身返回的错误，原样向上传播
pub type InvocationError = Box<dyn std::error::Error + Send + Sync>;

/// 配置错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {path}")]
    FileNotFound { path: String },

    #[error("配置解析失败: {source}")]
    ParseError {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// 依赖注入错误类型
#[derive(Error, Debug)]
pub enum DependencyError {
    #[error("组件未注册: {type_name}")]
    ComponentNotRegistered { type_name: String },

    #[error("组件创建失败: {type_name}, 原因: {source}")]
    ComponentCreationFailed {
        type_name: String,
        source: InvocationError,
    },

    #[error("循环依赖检测到: {dependency_chain}")]
    CircularDependency { dependency_chain: String },

    #[error("依赖解析失败: {type_name}, 原因: {message}")]
    DependencyResolutionFailed { type_name: String, message: String },
}

/// 启动错误类型
///
/// 除 [`StartupError::Invocation`] 外，所有变体都在定位入口类型和加载启动方法时
/// 提前检测，此时尚未执行任何用户代码
#[derive(Error, Debug)]
pub enum StartupError {
    #[error("参数无效: {name}, 原因: {message}")]
    InvalidArgument { name: String, message: String },

    #[error("模块 '{module}' 加载失败: {reason}")]
    ModuleLoad { module: String, reason: String },

    #[error("在模块 '{module}' 中找不到名为 '{environment_name}' 或 '{generic_name}' 的类型")]
    TypeNotFound {
        environment_name: String,
        generic_name: String,
        module: String,
    },

    #[error("不支持方法 '{method}' 的多个重载")]
    AmbiguousMethod { method: String },

    #[error("在类型 '{type_name}' 中找不到名为 '{environment_name}' 或 '{generic_name}' 的公开方法")]
    MissingMethod {
        environment_name: String,
        generic_name: String,
        type_name: String,
    },

    #[error("类型 '{type_name}' 中的方法 '{method}' 的返回类型必须为 '{expected}'")]
    ReturnTypeMismatch {
        method: String,
        type_name: String,
        expected: String,
    },

    #[error("方法 '{method}' 是实例方法，但类型 '{type_name}' 没有可用的实例")]
    MissingInstance { method: String, type_name: String },

    #[error("方法 '{method}' 必须只接受一个参数，实际为 {parameter_count} 个")]
    InvalidContainerMethod {
        method: String,
        parameter_count: usize,
    },

    #[error("入口类型 '{type_name}' 实例化失败: {reason}")]
    EntryActivation { type_name: String, reason: String },

    #[error("方法 '{method}' 的参数类型不匹配，期望 '{expected}'")]
    ArgumentMismatch { method: String, expected: String },

    #[error("方法 '{method}' 的接收者类型不匹配，期望 '{expected}'")]
    ReceiverMismatch { method: String, expected: String },

    #[error("依赖注入错误: {source}")]
    Dependency {
        #[from]
        source: DependencyError,
    },

    #[error(transparent)]
    Invocation(InvocationError),
}

impl StartupError {
    /// 创建参数无效错误
    pub fn invalid_argument(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            message: message.into(),
        }
    }

    /// 是否为用户方法自身抛出的错误
    pub fn is_invocation(&self) -> bool {
        matches!(self, Self::Invocation(_))
    }
}

/// 基础设施错误类型
#[derive(Error, Debug)]
pub enum InfrastructureError {
    #[error("配置错误: {source}")]
    ConfigError {
        #[from]
        source: ConfigError,
    },

    #[error("依赖注入错误: {source}")]
    DependencyError {
        #[from]
        source: DependencyError,
    },

    #[error("启动错误: {source}")]
    StartupError {
        #[from]
        source: StartupError,
    },

    #[error("基础设施启动失败: {message}")]
    BootstrapFailed { message: String },
}

/// 结果类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
pub type DependencyResult<T> = Result<T, DependencyError>;
pub type StartupResult<T> = Result<T, StartupError>;
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;
