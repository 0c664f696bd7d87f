//! # Dependency Injection Abstractions
//!
//! 依赖注入抽象层，定义启动引导所依赖的外部能力。
//!
//! ## 核心接口
//!
//! - [`EntryType`] / [`MethodDescriptor`] - 类型描述符（运行时反射面）
//! - [`ModuleLoader`] - 模块加载接口
//! - [`ServiceProvider`] - 宿主容器接口
//! - [`ServiceProviderFactory`] - 容器工厂协议
//! - [`ServiceCollection`] - 服务注册集合

pub mod container;
pub mod factory;
pub mod reflection;
pub mod registry;

pub use container::*;
pub use factory::*;
pub use reflection::*;
pub use registry::*;
