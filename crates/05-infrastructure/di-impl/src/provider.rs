//! 参考容器实现

use di_abstractions::{
    ServiceCollection, ServiceDescriptor, ServiceImplementation, ServiceInstance, ServiceKey,
    ServiceProvider,
};
use infrastructure_common::{DependencyError, DependencyResult};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fmt;
use std::thread::{self, ThreadId};
use tracing::debug;

/// 默认服务提供者
///
/// 单例和作用域服务在根容器中只创建一次，瞬时服务每次解析都创建新实例
pub struct DefaultServiceProvider {
    /// 服务注册信息，同一个键后注册的覆盖先注册的
    registrations: HashMap<ServiceKey, ServiceDescriptor>,
    /// 已创建的缓存实例
    instances: Mutex<HashMap<ServiceKey, ServiceInstance>>,
    /// 当前正在解析的服务链，用于检测循环依赖
    resolving: Mutex<Vec<(ThreadId, ServiceKey)>>,
}

impl DefaultServiceProvider {
    /// 从注册集合创建容器
    pub fn new(services: &ServiceCollection) -> Self {
        let registrations: HashMap<_, _> = services
            .descriptors()
            .iter()
            .map(|descriptor| (descriptor.key.clone(), descriptor.clone()))
            .collect();

        debug!("构建容器完成，注册了 {} 个服务", registrations.len());

        Self {
            registrations,
            instances: Mutex::new(HashMap::new()),
            resolving: Mutex::new(Vec::new()),
        }
    }

    /// 是否注册了指定键
    pub fn is_registered(&self, key: &ServiceKey) -> bool {
        self.registrations.contains_key(key)
    }

    /// 注册的服务数量
    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    /// 是否没有任何注册
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    fn enter(&self, key: &ServiceKey) -> DependencyResult<()> {
        let current = thread::current().id();
        let mut resolving = self.resolving.lock();

        if resolving
            .iter()
            .any(|(thread, pending)| *thread == current && pending == key)
        {
            let chain = resolving
                .iter()
                .filter(|(thread, _)| *thread == current)
                .map(|(_, pending)| pending.to_string())
                .collect::<Vec<_>>()
                .join(" -> ");

            return Err(DependencyError::CircularDependency {
                dependency_chain: format!("{} -> {}", chain, key),
            });
        }

        resolving.push((current, key.clone()));
        Ok(())
    }

    fn leave(&self, key: &ServiceKey) {
        let current = thread::current().id();
        let mut resolving = self.resolving.lock();
        if let Some(position) = resolving
            .iter()
            .rposition(|(thread, pending)| *thread == current && pending == key)
        {
            resolving.remove(position);
        }
    }

    fn create(
        &self,
        key: &ServiceKey,
        descriptor: &ServiceDescriptor,
    ) -> DependencyResult<ServiceInstance> {
        let factory = match &descriptor.implementation {
            ServiceImplementation::Instance(instance) => return Ok(instance.clone()),
            ServiceImplementation::Factory(factory) => factory,
        };

        self.enter(key)?;
        let created = factory(self).map_err(|source| DependencyError::ComponentCreationFailed {
            type_name: key.to_string(),
            source,
        });
        self.leave(key);

        created
    }
}

impl ServiceProvider for DefaultServiceProvider {
    fn get_service(&self, key: &ServiceKey) -> DependencyResult<Option<ServiceInstance>> {
        let Some(descriptor) = self.registrations.get(key) else {
            return Ok(None);
        };

        if !descriptor.lifetime.is_cached() {
            return self.create(key, descriptor).map(Some);
        }

        if let Some(instance) = self.instances.lock().get(key) {
            return Ok(Some(instance.clone()));
        }

        // 创建时不持有锁，工厂可能回调容器解析其他服务
        let instance = self.create(key, descriptor)?;
        let instance = self
            .instances
            .lock()
            .entry(key.clone())
            .or_insert(instance)
            .clone();

        Ok(Some(instance))
    }
}

impl fmt::Debug for DefaultServiceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultServiceProvider")
            .field("registrations", &self.registrations.len())
            .field("cached_instances", &self.instances.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::ServiceProviderExt;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug)]
    struct Counter(usize);

    #[test]
    fn unknown_service_is_none() {
        let provider = DefaultServiceProvider::new(&ServiceCollection::new());
        assert!(provider.get_service(&ServiceKey::of::<String>()).unwrap().is_none());
        assert!(provider.is_empty());
    }

    #[test]
    fn singleton_factory_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut services = ServiceCollection::new();
        services.add_singleton_factory(move |_services: &dyn ServiceProvider| {
            Ok(Counter(counter.fetch_add(1, Ordering::SeqCst)))
        });

        let provider = DefaultServiceProvider::new(&services);
        let first = provider.resolve::<Counter>().unwrap();
        let second = provider.resolve::<Counter>().unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transient_factory_runs_every_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);

        let mut services = ServiceCollection::new();
        services.add_transient(move |_services: &dyn ServiceProvider| {
            Ok(Counter(counter.fetch_add(1, Ordering::SeqCst)))
        });

        let provider = DefaultServiceProvider::new(&services);
        assert_eq!(provider.resolve::<Counter>().unwrap().0, 0);
        assert_eq!(provider.resolve::<Counter>().unwrap().0, 1);
    }

    #[test]
    fn factories_resolve_dependencies() {
        let mut services = ServiceCollection::new();
        services
            .add_singleton(String::from("db://local"))
            .add_transient(|services: &dyn ServiceProvider| {
                let url = services.resolve::<String>()?;
                Ok(Counter(url.len()))
            });

        let provider = DefaultServiceProvider::new(&services);
        assert_eq!(provider.resolve::<Counter>().unwrap().0, "db://local".len());
    }

    #[test]
    fn later_registration_wins() {
        let mut services = ServiceCollection::new();
        services.add_singleton(1_u32).add_singleton(2_u32);

        let provider = DefaultServiceProvider::new(&services);
        assert_eq!(*provider.resolve::<u32>().unwrap(), 2);
        assert_eq!(provider.len(), 1);
    }

    #[test]
    fn circular_dependency_is_detected() {
        let mut services = ServiceCollection::new();
        services.add_transient(|services: &dyn ServiceProvider| {
            let inner = services.resolve::<Counter>()?;
            Ok(Counter(inner.0))
        });

        let provider = DefaultServiceProvider::new(&services);
        let err = provider.resolve::<Counter>().unwrap_err();

        // 最外层是创建失败，内层才是循环依赖
        assert!(matches!(err, DependencyError::ComponentCreationFailed { .. }));
        assert!(format!("{:?}", err).contains("CircularDependency"));
    }

    #[test]
    fn factory_failure_is_wrapped() {
        let mut services = ServiceCollection::new();
        services.add_transient(|_services: &dyn ServiceProvider| -> Result<Counter, _> {
            Err("connection refused".into())
        });

        let provider = DefaultServiceProvider::new(&services);
        let err = provider.resolve::<Counter>().unwrap_err();
        assert!(err.to_string().contains("connection refused"));
    }
}
