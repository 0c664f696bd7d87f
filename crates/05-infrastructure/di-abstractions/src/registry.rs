//! 服务注册集合

use crate::container::{ServiceInstance, ServiceKey, ServiceProvider};
use crate::factory::{ErasedProviderFactory, ProviderFactoryAdapter, ServiceProviderFactory};
use infrastructure_common::{InvocationError, Lifetime};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 服务工厂函数类型
pub type ServiceFactoryFn =
    Arc<dyn Fn(&dyn ServiceProvider) -> Result<ServiceInstance, InvocationError> + Send + Sync>;

/// 服务实现方式
#[derive(Clone)]
pub enum ServiceImplementation {
    /// 预先创建好的实例
    Instance(ServiceInstance),
    /// 工厂函数，可以从容器解析依赖
    Factory(ServiceFactoryFn),
}

impl fmt::Debug for ServiceImplementation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Instance(_) => f.write_str("Instance(<instance>)"),
            Self::Factory(_) => f.write_str("Factory(<function>)"),
        }
    }
}

/// 服务描述符
#[derive(Debug, Clone)]
pub struct ServiceDescriptor {
    /// 服务键
    pub key: ServiceKey,
    /// 生命周期
    pub lifetime: Lifetime,
    /// 实现方式
    pub implementation: ServiceImplementation,
}

impl ServiceDescriptor {
    /// 实例描述符，实例总是单例
    pub fn instance(key: ServiceKey, instance: ServiceInstance) -> Self {
        Self {
            key,
            lifetime: Lifetime::Singleton,
            implementation: ServiceImplementation::Instance(instance),
        }
    }

    /// 工厂描述符
    pub fn factory(key: ServiceKey, lifetime: Lifetime, factory: ServiceFactoryFn) -> Self {
        Self {
            key,
            lifetime,
            implementation: ServiceImplementation::Factory(factory),
        }
    }
}

/// 服务注册集合
///
/// 只追加的描述符列表，同一个键多次注册时后注册的生效
#[derive(Debug, Clone, Default)]
pub struct ServiceCollection {
    descriptors: Vec<ServiceDescriptor>,
}

impl ServiceCollection {
    /// 创建空集合
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加描述符
    pub fn add(&mut self, descriptor: ServiceDescriptor) -> &mut Self {
        tracing::debug!("注册服务: {} ({:?})", descriptor.key, descriptor.lifetime);
        self.descriptors.push(descriptor);
        self
    }

    /// 注册单例实例
    pub fn add_singleton<T: Any + Send + Sync>(&mut self, instance: T) -> &mut Self {
        self.add_instance(Arc::new(instance))
    }

    /// 注册共享实例
    pub fn add_instance<T: Any + Send + Sync>(&mut self, instance: Arc<T>) -> &mut Self {
        self.add(ServiceDescriptor::instance(ServiceKey::of::<T>(), instance))
    }

    /// 注册单例工厂
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&dyn ServiceProvider) -> Result<T, InvocationError> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Singleton, factory)
    }

    /// 注册作用域工厂
    pub fn add_scoped<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&dyn ServiceProvider) -> Result<T, InvocationError> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Scoped, factory)
    }

    /// 注册瞬时工厂
    pub fn add_transient<T, F>(&mut self, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&dyn ServiceProvider) -> Result<T, InvocationError> + Send + Sync + 'static,
    {
        self.add_factory(Lifetime::Transient, factory)
    }

    /// 注册构建器类型为 `B` 的容器工厂
    pub fn add_provider_factory<B, F>(&mut self, factory: F) -> &mut Self
    where
        B: Any,
        F: ServiceProviderFactory<B> + 'static,
    {
        let erased: Arc<dyn ErasedProviderFactory> = Arc::new(ProviderFactoryAdapter::new(factory));
        self.add(ServiceDescriptor::instance(
            ServiceKey::provider_factory_of::<B>(),
            Arc::new(erased),
        ))
    }

    /// 是否注册了指定键
    pub fn contains(&self, key: &ServiceKey) -> bool {
        self.descriptors.iter().any(|descriptor| &descriptor.key == key)
    }

    /// 所有描述符，保持注册顺序
    pub fn descriptors(&self) -> &[ServiceDescriptor] {
        &self.descriptors
    }

    /// 描述符数量
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    fn add_factory<T, F>(&mut self, lifetime: Lifetime, factory: F) -> &mut Self
    where
        T: Any + Send + Sync,
        F: Fn(&dyn ServiceProvider) -> Result<T, InvocationError> + Send + Sync + 'static,
    {
        let factory: ServiceFactoryFn = Arc::new(move |services: &dyn ServiceProvider| {
            factory(services).map(|instance| Arc::new(instance) as ServiceInstance)
        });
        self.add(ServiceDescriptor::factory(ServiceKey::of::<T>(), lifetime, factory))
    }
}
