//! 宿主容器抽象接口
//!
//! 启动加载器只通过这里的窄接口访问依赖注入容器

use crate::factory::ErasedProviderFactory;
use infrastructure_common::{DependencyError, DependencyResult, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 容器中的服务实例
pub type ServiceInstance = Arc<dyn Any + Send + Sync>;

/// 已构建完成的容器句柄
pub type ServiceProviderHandle = Arc<dyn ServiceProvider>;

/// 服务键
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ServiceKey {
    /// 普通服务，按实现类型注册
    Service(TypeInfo),
    /// 指定构建器类型的容器工厂
    ProviderFactory(TypeInfo),
}

impl ServiceKey {
    /// 普通服务键
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self::Service(TypeInfo::of::<T>())
    }

    /// 容器工厂键
    pub fn provider_factory(builder_type: TypeInfo) -> Self {
        Self::ProviderFactory(builder_type)
    }

    /// 容器工厂键（泛型形式）
    pub fn provider_factory_of<B: 'static>() -> Self {
        Self::ProviderFactory(TypeInfo::of::<B>())
    }
}

impl fmt::Display for ServiceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(type_info) => write!(f, "{}", type_info),
            Self::ProviderFactory(builder) => write!(f, "ServiceProviderFactory<{}>", builder),
        }
    }
}

/// 服务提供者（容器）trait
pub trait ServiceProvider: Send + Sync {
    /// 获取服务，未注册时返回 `None`
    fn get_service(&self, key: &ServiceKey) -> DependencyResult<Option<ServiceInstance>>;

    /// 获取必需的服务，未注册时返回错误
    fn get_required_service(&self, key: &ServiceKey) -> DependencyResult<ServiceInstance> {
        self.get_service(key)?
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                type_name: key.to_string(),
            })
    }
}

/// 服务提供者的类型化扩展
pub trait ServiceProviderExt: ServiceProvider {
    /// 解析指定类型的服务，未注册时返回 `None`
    fn try_resolve<T: Any + Send + Sync>(&self) -> DependencyResult<Option<Arc<T>>> {
        match self.get_service(&ServiceKey::of::<T>())? {
            Some(instance) => downcast_service::<T>(instance).map(Some),
            None => Ok(None),
        }
    }

    /// 解析指定类型的服务
    fn resolve<T: Any + Send + Sync>(&self) -> DependencyResult<Arc<T>> {
        let instance = self.get_required_service(&ServiceKey::of::<T>())?;
        downcast_service::<T>(instance)
    }

    /// 获取指定构建器类型的容器工厂
    fn get_provider_factory(
        &self,
        builder_type: &TypeInfo,
    ) -> DependencyResult<Option<Arc<dyn ErasedProviderFactory>>> {
        let key = ServiceKey::provider_factory(builder_type.clone());
        match self.get_service(&key)? {
            Some(instance) => downcast_service::<Arc<dyn ErasedProviderFactory>>(instance)
                .map(|factory| Some(Arc::clone(&*factory))),
            None => Ok(None),
        }
    }

    /// 获取必需的容器工厂
    fn get_required_provider_factory(
        &self,
        builder_type: &TypeInfo,
    ) -> DependencyResult<Arc<dyn ErasedProviderFactory>> {
        self.get_provider_factory(builder_type)?
            .ok_or_else(|| DependencyError::ComponentNotRegistered {
                type_name: ServiceKey::provider_factory(builder_type.clone()).to_string(),
            })
    }
}

impl<P: ServiceProvider + ?Sized> ServiceProviderExt for P {}

fn downcast_service<T: Any + Send + Sync>(instance: ServiceInstance) -> DependencyResult<Arc<T>> {
    instance
        .downcast::<T>()
        .map_err(|_| DependencyError::DependencyResolutionFailed {
            type_name: std::any::type_name::<T>().to_string(),
            message: "类型转换失败".to_string(),
        })
}
