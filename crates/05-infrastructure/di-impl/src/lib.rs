//! # 依赖注入具体实现
//!
//! 提供参考容器、默认容器工厂和内存模块目录

mod catalog;
mod factory;
mod provider;

pub use catalog::ModuleCatalog;
pub use factory::{BuildServiceProvider, DefaultServiceProviderFactory};
pub use provider::DefaultServiceProvider;
