//! Centralized integration tests for di-impl and the startup composition
use di_abstractions::{
    EntryType, MethodDescriptor, Module, ServiceCollection, ServiceProvider, ServiceProviderExt,
    ServiceProviderFactory, ServiceProviderHandle,
};
use di_impl::{BuildServiceProvider, DefaultServiceProviderFactory, ModuleCatalog};
use infrastructure_common::{DependencyError, Lifetime, TypeInfo};
use infrastructure_composition::{find_entry_type, StartupLoader};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 测试组件
#[derive(Debug)]
struct TestService {
    name: String,
}

/// 带编号的瞬时组件
#[derive(Debug)]
struct Ticket(usize);

/// 第三方容器的构建器替身
#[derive(Debug, Default)]
struct ModuleRegistry {
    modules: Vec<&'static str>,
    services: ServiceCollection,
}

/// 第三方容器工厂
struct ModuleRegistryFactory;

impl ServiceProviderFactory<ModuleRegistry> for ModuleRegistryFactory {
    fn create_builder(&self, services: &ServiceCollection) -> ModuleRegistry {
        ModuleRegistry {
            modules: Vec::new(),
            services: services.clone(),
        }
    }

    fn create_service_provider(&self, builder: ModuleRegistry) -> Option<ServiceProviderHandle> {
        let mut services = builder.services;
        services.add_singleton(builder.modules);
        Some(services.build_service_provider())
    }
}

#[test]
fn test_lifetimes() -> anyhow::Result<()> {
    let issued = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&issued);

    let mut services = ServiceCollection::new();
    services
        .add_singleton(TestService {
            name: "test".to_string(),
        })
        .add_transient(move |_services: &dyn ServiceProvider| {
            Ok(Ticket(counter.fetch_add(1, Ordering::SeqCst)))
        });
    assert_eq!(services.descriptors()[1].lifetime, Lifetime::Transient);

    let provider = services.build_service_provider();
    assert_eq!(provider.resolve::<TestService>()?.name, "test");
    assert_eq!(provider.resolve::<Ticket>()?.0, 0);
    assert_eq!(provider.resolve::<Ticket>()?.0, 1);
    assert_eq!(issued.load(Ordering::SeqCst), 2);
    Ok(())
}

#[test]
fn test_scoped_service_is_cached_in_root() -> anyhow::Result<()> {
    let mut services = ServiceCollection::new();
    services.add_scoped(|_services: &dyn ServiceProvider| {
        Ok(TestService {
            name: "scoped".to_string(),
        })
    });

    let provider = services.build_service_provider();
    let first = provider.resolve::<TestService>()?;
    let second = provider.resolve::<TestService>()?;
    assert!(Arc::ptr_eq(&first, &second));
    Ok(())
}

#[test]
fn test_missing_provider_factory() {
    let hosting = ServiceCollection::new().build_service_provider();
    let result = hosting.get_required_provider_factory(&TypeInfo::of::<ModuleRegistry>());
    assert!(matches!(
        result,
        Err(DependencyError::ComponentNotRegistered { .. })
    ));
}

#[test]
fn test_end_to_end_with_third_party_container() -> anyhow::Result<()> {
    let entry = EntryType::builder("Shop.EntryStaging")
        .method(MethodDescriptor::static_method(
            "ConfigureStagingServices",
            |services: &mut ServiceCollection| {
                services.add_singleton(TestService {
                    name: "staging".to_string(),
                });
            },
        ))
        .method(MethodDescriptor::static_method(
            "ConfigureContainer",
            |registry: &mut ModuleRegistry| registry.modules.push("orders"),
        ))
        .method(MethodDescriptor::static_no_args("Configure", || ()))
        .build();
    let catalog = ModuleCatalog::new().with_module(Module::new("Shop").with_type(entry));

    let mut hosting = ServiceCollection::new();
    DefaultServiceProviderFactory::register(&mut hosting);
    hosting.add_provider_factory::<ModuleRegistry, _>(ModuleRegistryFactory);
    let hosting = hosting.build_service_provider();

    let entry_type = find_entry_type(&catalog, "Shop", Some("staging"))?;
    assert_eq!(entry_type.full_name(), "Shop.EntryStaging");

    let methods = StartupLoader::new().load_methods(hosting, &entry_type, Some("staging"))?;
    assert!(methods.instance().is_none());

    let provider = methods.build_container(&mut ServiceCollection::new())?;
    assert_eq!(provider.resolve::<TestService>()?.name, "staging");
    assert_eq!(*provider.resolve::<Vec<&'static str>>()?, vec!["orders"]);
    Ok(())
}
