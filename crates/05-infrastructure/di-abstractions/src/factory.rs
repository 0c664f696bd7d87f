//! 容器工厂抽象接口
//!
//! 以构建器类型 `B` 为参数的容器工厂协议，以及供运行时按类型驱动的擦除版本

use crate::container::ServiceProviderHandle;
use crate::registry::ServiceCollection;
use infrastructure_common::{DependencyError, DependencyResult, TypeInfo};
use std::any::Any;
use std::marker::PhantomData;

/// 容器工厂 trait
///
/// 先从注册集合创建可变的中间构建器，再由构建器产出容器
pub trait ServiceProviderFactory<B>: Send + Sync {
    /// 从注册集合创建构建器
    fn create_builder(&self, services: &ServiceCollection) -> B;

    /// 从构建器创建容器，返回 `None` 时由调用方回退到默认构建
    fn create_service_provider(&self, builder: B) -> Option<ServiceProviderHandle>;
}

/// 类型擦除的容器工厂
pub trait ErasedProviderFactory: Send + Sync {
    /// 构建器类型
    fn builder_type(&self) -> TypeInfo;

    /// 创建构建器
    fn create_builder(&self, services: &ServiceCollection) -> Box<dyn Any>;

    /// 从构建器创建容器
    fn create_service_provider(
        &self,
        builder: Box<dyn Any>,
    ) -> DependencyResult<Option<ServiceProviderHandle>>;
}

/// 把类型化的容器工厂适配为擦除版本
pub struct ProviderFactoryAdapter<B, F> {
    factory: F,
    _builder: PhantomData<fn() -> B>,
}

impl<B, F> ProviderFactoryAdapter<B, F>
where
    B: Any,
    F: ServiceProviderFactory<B>,
{
    /// 包装容器工厂
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            _builder: PhantomData,
        }
    }
}

impl<B, F> ErasedProviderFactory for ProviderFactoryAdapter<B, F>
where
    B: Any,
    F: ServiceProviderFactory<B>,
{
    fn builder_type(&self) -> TypeInfo {
        TypeInfo::of::<B>()
    }

    fn create_builder(&self, services: &ServiceCollection) -> Box<dyn Any> {
        Box::new(self.factory.create_builder(services))
    }

    fn create_service_provider(
        &self,
        builder: Box<dyn Any>,
    ) -> DependencyResult<Option<ServiceProviderHandle>> {
        let builder = builder
            .downcast::<B>()
            .map_err(|_| DependencyError::DependencyResolutionFailed {
                type_name: std::any::type_name::<B>().to_string(),
                message: "构建器类型与容器工厂不匹配".to_string(),
            })?;

        Ok(self.factory.create_service_provider(*builder))
    }
}
