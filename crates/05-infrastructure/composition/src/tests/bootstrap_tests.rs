//! 启动方法加载测试

use super::{hosting_container, hosting_container_with, init_test_logger};
use crate::bootstrapper::StartupLoader;
use crate::callable::BoundCallable;
use di_abstractions::{
    EntryType, MethodDescriptor, ServiceCollection, ServiceProvider, ServiceProviderHandle,
};
use di_impl::BuildServiceProvider;
use infrastructure_common::{
    MethodConvention, MethodRole, StartupConventions, StartupError, TypeInfo,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 应用构建器替身，记录被调用的配置方法
#[derive(Debug, Default)]
struct AppBuilder {
    calls: Vec<String>,
}

#[derive(Debug, Default)]
struct Entry {
    label: String,
}

fn static_configure(name: &'static str) -> MethodDescriptor {
    MethodDescriptor::static_method(name, move |app: &mut AppBuilder| {
        app.calls.push(name.to_string());
    })
}

#[test]
fn single_static_configure_needs_no_instance() {
    init_test_logger();
    let entry = EntryType::builder("App.Entry")
        .method(static_configure("Configure"))
        .build();

    let methods = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap();

    assert!(methods.instance().is_none());
    assert!(methods.services_callable().is_absent());

    let mut app = AppBuilder::default();
    methods.configure(&mut app).unwrap();
    assert_eq!(app.calls, vec!["Configure"]);
}

#[test]
fn single_instance_configure_creates_instance() {
    let entry = EntryType::builder("App.Entry")
        .constructed_with(|_services: &dyn ServiceProvider| {
            Ok(Entry {
                label: "constructed".to_string(),
            })
        })
        .method(MethodDescriptor::instance(
            "Configure",
            |entry: &Entry, app: &mut AppBuilder| app.calls.push(entry.label.clone()),
        ))
        .build();

    let methods = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap();

    assert!(methods.instance().is_some());
    let mut app = AppBuilder::default();
    methods.configure(&mut app).unwrap();
    assert_eq!(app.calls, vec!["constructed"]);
}

#[test]
fn instance_is_resolved_from_hosting_container_first() {
    let entry = EntryType::builder("App.Entry")
        .default_constructible::<Entry>()
        .method(MethodDescriptor::instance(
            "Configure",
            |entry: &Entry, app: &mut AppBuilder| app.calls.push(entry.label.clone()),
        ))
        .build();
    let hosting = hosting_container_with(|services| {
        services.add_singleton(Entry {
            label: "from hosting".to_string(),
        });
    });

    let methods = StartupLoader::new().load_methods(hosting, &entry, None).unwrap();

    let mut app = AppBuilder::default();
    methods.configure(&mut app).unwrap();
    assert_eq!(app.calls, vec!["from hosting"]);
}

#[test]
fn entry_without_constructor_fails_activation() {
    let entry = EntryType::builder("App.Entry")
        .method(MethodDescriptor::instance_no_args("Configure", |_entry: &Entry| ()))
        .build();

    let err = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap_err();
    assert!(matches!(err, StartupError::EntryActivation { .. }));
}

#[test]
fn environment_configure_is_preferred() {
    let entry = EntryType::builder("App.Entry")
        .method(static_configure("Configure"))
        .method(static_configure("ConfigureDevelopment"))
        .build();

    let methods = StartupLoader::new()
        .load_methods(hosting_container(), &entry, Some("Development"))
        .unwrap();

    let mut app = AppBuilder::default();
    methods.configure(&mut app).unwrap();
    assert_eq!(app.calls, vec!["ConfigureDevelopment"]);
}

#[test]
fn generic_configure_is_used_when_environment_one_is_missing() {
    let entry = EntryType::builder("App.Entry")
        .method(static_configure("Configure"))
        .build();

    let methods = StartupLoader::new()
        .load_methods(hosting_container(), &entry, Some("Development"))
        .unwrap();

    let mut app = AppBuilder::default();
    methods.configure(&mut app).unwrap();
    assert_eq!(app.calls, vec!["Configure"]);
}

#[test]
fn overloaded_configure_is_ambiguous() {
    let entry = EntryType::builder("App.Entry")
        .method(static_configure("Configure"))
        .method(MethodDescriptor::static_no_args("Configure", || ()))
        .build();

    let err = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap_err();
    assert!(matches!(err, StartupError::AmbiguousMethod { ref method } if method == "Configure"));
}

#[test]
fn missing_configure_names_both_candidates() {
    let entry = EntryType::builder("App.Entry")
        .method(MethodDescriptor::static_method(
            "ConfigureServices",
            |_services: &mut ServiceCollection| (),
        ))
        .build();

    let err = StartupLoader::new()
        .load_methods(hosting_container(), &entry, Some("Production"))
        .unwrap_err();

    let message = err.to_string();
    assert!(matches!(err, StartupError::MissingMethod { .. }));
    assert!(message.contains("ConfigureProduction"));
    assert!(message.contains("'Configure'"));
    assert!(message.contains("App.Entry"));
}

#[test]
fn configure_with_return_value_is_rejected() {
    let entry = EntryType::builder("App.Entry")
        .method(MethodDescriptor::static_method("Configure", |_app: &mut AppBuilder| {
            Some(1_u32)
        }))
        .build();

    let err = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap_err();
    assert!(matches!(err, StartupError::ReturnTypeMismatch { .. }));
}

#[test]
fn instance_is_created_once_for_configure_and_services() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&created);

    let entry = EntryType::builder("App.Entry")
        .constructed_with(move |_services: &dyn ServiceProvider| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(Entry::default())
        })
        .method(MethodDescriptor::instance_no_args("Configure", |_entry: &Entry| ()))
        .method(MethodDescriptor::instance(
            "ConfigureServices",
            |_entry: &Entry, _services: &mut ServiceCollection| (),
        ))
        .build();

    let methods = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap();

    assert_eq!(created.load(Ordering::SeqCst), 1);
    assert!(matches!(methods.configure_callable(), BoundCallable::Instance(..)));
    assert!(matches!(methods.services_callable(), BoundCallable::Instance(..)));
}

#[test]
fn instance_container_method_without_instance_fails_at_load() {
    let entry = EntryType::builder("App.Entry")
        .default_constructible::<Entry>()
        .method(static_configure("Configure"))
        .method(MethodDescriptor::instance(
            "ConfigureContainer",
            |_entry: &Entry, _builder: &mut ServiceCollection| (),
        ))
        .build();

    let err = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap_err();
    assert!(matches!(
        err,
        StartupError::MissingInstance { ref method, .. } if method == "ConfigureContainer"
    ));
}

#[test]
fn container_method_without_parameter_is_rejected() {
    let entry = EntryType::builder("App.Entry")
        .method(static_configure("Configure"))
        .method(MethodDescriptor::static_no_args("ConfigureContainer", || ()))
        .build();

    let err = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap_err();
    assert!(matches!(
        err,
        StartupError::InvalidContainerMethod {
            parameter_count: 0,
            ..
        }
    ));
}

#[test]
fn user_errors_propagate_unchanged() {
    let entry = EntryType::builder("App.Entry")
        .method(MethodDescriptor::static_method(
            "Configure",
            |_app: &mut AppBuilder| -> Result<(), String> { Err("pipeline broken".to_string()) },
        ))
        .build();

    let methods = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap();

    let err = methods.configure(&mut AppBuilder::default()).unwrap_err();
    assert!(err.is_invocation());
    assert_eq!(err.to_string(), "pipeline broken");
}

#[test]
fn wrong_application_builder_is_reported() {
    let entry = EntryType::builder("App.Entry")
        .method(static_configure("Configure"))
        .build();

    let methods = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap();

    let err = methods.configure(&mut String::new()).unwrap_err();
    assert!(matches!(err, StartupError::ArgumentMismatch { .. }));
}

#[test]
fn custom_conventions() {
    let conventions = StartupConventions::standard(TypeInfo::of::<ServiceProviderHandle>()).with_rule(
        MethodConvention::new(MethodRole::Configure, "Setup", "")
            .required()
            .returning(TypeInfo::void()),
    );
    let entry = EntryType::builder("App.Entry")
        .method(static_configure("SetupTesting"))
        .build();

    let methods = StartupLoader::with_conventions(conventions)
        .load_methods(hosting_container(), &entry, Some("testing"))
        .unwrap();

    let mut app = AppBuilder::default();
    methods.configure(&mut app).unwrap();
    assert_eq!(app.calls, vec!["SetupTesting"]);
}

#[test]
fn overloaded_services_are_ambiguous() {
    let entry = EntryType::builder("App.Entry")
        .method(static_configure("Configure"))
        .method(MethodDescriptor::static_method(
            "ConfigureServices",
            |services: &mut ServiceCollection| -> ServiceProviderHandle {
                services.build_service_provider()
            },
        ))
        .method(MethodDescriptor::static_method(
            "ConfigureServices",
            |_services: &mut ServiceCollection| (),
        ))
        .build();

    let err = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap_err();
    assert!(matches!(
        err,
        StartupError::AmbiguousMethod { ref method } if method == "ConfigureServices"
    ));
}

#[test]
fn services_with_wrong_parameter_fails_at_load() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let entry = EntryType::builder("App.Entry")
        .method(static_configure("Configure"))
        .method(MethodDescriptor::static_method(
            "ConfigureServices",
            move |_services: &mut String| {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        ))
        .build();

    let err = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap_err();
    assert!(matches!(
        err,
        StartupError::ArgumentMismatch { ref method, .. } if method == "ConfigureServices"
    ));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn services_without_parameter_is_accepted() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let entry = EntryType::builder("App.Entry")
        .method(static_configure("Configure"))
        .method(MethodDescriptor::static_no_args("ConfigureServices", move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }))
        .build();

    let methods = StartupLoader::new()
        .load_methods(hosting_container(), &entry, None)
        .unwrap();
    methods
        .build_container(&mut ServiceCollection::new())
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
