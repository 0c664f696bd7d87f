//! # 基础设施组合层
//!
//! 这个 crate 按命名约定把入口类型组合成应用的启动过程。
//!
//! ## 主要功能
//!
//! - **方法查找**: 按 `Configure{Env}` 等约定在入口类型中查找启动方法
//! - **方法绑定**: 把实例方法绑定到入口实例
//! - **入口定位**: 在模块中按 `Entry{Env}` 约定定位入口类型
//! - **启动组合**: 组合服务注册、容器定制和配置三个启动步骤
//! - **宿主构建器**: 从启动选项构建完整的宿主
//!
//! ## 基本使用
//!
//! ```rust,no_run
//! use di_abstractions::{EntryType, MethodDescriptor, Module, ServiceCollection};
//! use di_impl::ModuleCatalog;
//! use infrastructure_composition::{HostBuilder, StartupOptions};
//!
//! #[derive(Default)]
//! struct Entry;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let entry = EntryType::builder("App.Entry")
//!         .default_constructible::<Entry>()
//!         .method(MethodDescriptor::instance(
//!             "ConfigureServices",
//!             |_entry: &Entry, services: &mut ServiceCollection| {
//!                 services.add_singleton(String::from("hello"));
//!             },
//!         ))
//!         .method(MethodDescriptor::instance(
//!             "Configure",
//!             |_entry: &Entry, routes: &mut Vec<String>| routes.push("/".to_string()),
//!         ))
//!         .build();
//!
//!     let host = HostBuilder::new(StartupOptions::new("App").with_environment("Development"))
//!         .with_module_loader(ModuleCatalog::new().with_module(Module::new("App").with_type(entry)))
//!         .build()?;
//!
//!     let mut routes: Vec<String> = Vec::new();
//!     host.configure(&mut routes)?;
//!     Ok(())
//! }
//! ```

pub mod bootstrapper;
pub mod builder;
pub mod callable;
pub mod entry_locator;
pub mod method_matcher;
pub mod options;

#[cfg(test)]
mod tests;

// 重新导出主要类型
pub use bootstrapper::{BootstrapMethods, BuildContainerFn, StartupLoader};
pub use builder::{Host, HostBuilder, LoggingConfig};
pub use callable::BoundCallable;
pub use entry_locator::{find_entry_type, find_entry_type_with};
pub use method_matcher::{find_by_rule, find_method};
pub use options::StartupOptions;

// 重新导出错误类型
pub use infrastructure_common::{InfrastructureError, StartupError};
