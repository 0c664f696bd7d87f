//! # Infrastructure Common
//!
//! 这个 crate 提供了 Lorn ADSP 启动基础设施的公共类型和约定。
//!
//! ## 核心组件
//!
//! - [`TypeInfo`] - 运行时类型信息
//! - [`Lifetime`] - 服务生命周期
//! - [`NamingConvention`] - 方法命名约定
//! - [`StartupConventions`] - 启动方法约定规则表
//! - [`StartupError`] - 启动错误分类
//!
//! ## 设计原则
//!
//! - 约定优于配置
//! - 错误尽早暴露，携带足够的上下文信息

pub mod conventions;
pub mod errors;
pub mod lifecycle;
pub mod metadata;

pub use conventions::*;
pub use errors::*;
pub use lifecycle::*;
pub use metadata::*;
