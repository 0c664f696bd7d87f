//! 默认容器工厂

use crate::provider::DefaultServiceProvider;
use di_abstractions::{ServiceCollection, ServiceProviderFactory, ServiceProviderHandle};
use std::sync::Arc;
use tracing::debug;

/// 从注册集合直接构建参考容器
pub trait BuildServiceProvider {
    /// 构建容器
    fn build_service_provider(&self) -> ServiceProviderHandle;
}

impl BuildServiceProvider for ServiceCollection {
    fn build_service_provider(&self) -> ServiceProviderHandle {
        Arc::new(DefaultServiceProvider::new(self))
    }
}

/// 默认容器工厂，构建器类型就是注册集合本身
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultServiceProviderFactory;

impl DefaultServiceProviderFactory {
    /// 把默认容器工厂注册到宿主服务集合
    pub fn register(services: &mut ServiceCollection) -> &mut ServiceCollection {
        services.add_provider_factory::<ServiceCollection, _>(Self)
    }
}

impl ServiceProviderFactory<ServiceCollection> for DefaultServiceProviderFactory {
    fn create_builder(&self, services: &ServiceCollection) -> ServiceCollection {
        services.clone()
    }

    fn create_service_provider(&self, builder: ServiceCollection) -> Option<ServiceProviderHandle> {
        debug!("默认容器工厂构建容器，{} 个服务描述符", builder.len());
        Some(builder.build_service_provider())
    }
}
