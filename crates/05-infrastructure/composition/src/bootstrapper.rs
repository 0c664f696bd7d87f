//! 启动方法加载器
//!
//! 把入口类型上按约定命名的方法组合成三个启动步骤:
//! 服务注册、容器构建和应用配置

use crate::callable::{container_builder_type, BoundCallable};
use crate::method_matcher::find_by_rule;
use di_abstractions::{
    EntryInstance, EntryType, MethodDescriptor, ServiceCollection, ServiceKey, ServiceProvider,
    ServiceProviderExt, ServiceProviderHandle,
};
use di_impl::BuildServiceProvider;
use infrastructure_common::{
    normalize_environment, MethodRole, StartupConventions, StartupError, StartupResult,
    TypeInfo,
};
use std::any::Any;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// 容器构建函数
pub type BuildContainerFn =
    Arc<dyn Fn(&mut ServiceCollection) -> StartupResult<ServiceProviderHandle> + Send + Sync>;

/// 加载完成的启动方法
#[derive(Clone)]
pub struct BootstrapMethods {
    instance: Option<EntryInstance>,
    configure: BoundCallable,
    services: BoundCallable,
    build_container: BuildContainerFn,
}

impl BootstrapMethods {
    /// 入口类型实例，所有启动方法都是静态方法时为 `None`
    pub fn instance(&self) -> Option<&EntryInstance> {
        self.instance.as_ref()
    }

    /// 绑定的配置方法
    pub fn configure_callable(&self) -> &BoundCallable {
        &self.configure
    }

    /// 绑定的服务注册方法
    pub fn services_callable(&self) -> &BoundCallable {
        &self.services
    }

    /// 调用配置方法
    pub fn configure(&self, app: &mut dyn Any) -> StartupResult<()> {
        self.configure.invoke(app).map(|_| ())
    }

    /// 注册服务并构建应用容器，每次调用都会重新执行整个过程
    pub fn build_container(
        &self,
        services: &mut ServiceCollection,
    ) -> StartupResult<ServiceProviderHandle> {
        (self.build_container)(services)
    }

    /// 容器构建函数
    pub fn build_container_fn(&self) -> BuildContainerFn {
        Arc::clone(&self.build_container)
    }
}

impl fmt::Debug for BootstrapMethods {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BootstrapMethods")
            .field("instance", &self.instance.as_ref().map(|_| "<instance>"))
            .field("configure", &self.configure)
            .field("services", &self.services)
            .field("build_container", &"<function>")
            .finish()
    }
}

/// 启动方法加载器
#[derive(Debug, Clone)]
pub struct StartupLoader {
    conventions: StartupConventions,
}

impl StartupLoader {
    /// 使用标准约定创建加载器
    pub fn new() -> Self {
        Self::with_conventions(StartupConventions::standard(TypeInfo::of::<
            ServiceProviderHandle,
        >()))
    }

    /// 使用自定义约定规则表创建加载器
    pub fn with_conventions(conventions: StartupConventions) -> Self {
        Self { conventions }
    }

    /// 约定规则表
    pub fn conventions(&self) -> &StartupConventions {
        &self.conventions
    }

    /// 加载入口类型的启动方法
    ///
    /// 所有方法查找、入口实例化和签名校验都在这里完成，返回前不执行任何用户方法
    /// （入口类型的构造函数除外）
    pub fn load_methods(
        &self,
        hosting: ServiceProviderHandle,
        entry_type: &EntryType,
        environment: Option<&str>,
    ) -> StartupResult<BootstrapMethods> {
        let environment = normalize_environment(environment);
        info!(
            "加载入口类型 {} 的启动方法，环境: {}",
            entry_type.full_name(),
            environment.unwrap_or("<none>")
        );

        let configure = self.find(entry_type, MethodRole::Configure, environment)?;
        let services = self.find(entry_type, MethodRole::ConfigureServices, environment)?;
        let container = self.find(entry_type, MethodRole::ConfigureContainer, environment)?;

        if let Some(method) = &services {
            check_services_parameters(method)?;
        }
        let container_type = container.as_ref().map(container_builder_type).transpose()?;

        let needs_instance = [&configure, &services]
            .into_iter()
            .flatten()
            .any(|method| !method.is_static());
        let instance = if needs_instance {
            Some(activate(&*hosting, entry_type)?)
        } else {
            None
        };

        let configure = BoundCallable::bind(configure, instance.as_ref())?;
        let services = BoundCallable::bind(services, instance.as_ref())?;
        let container = BoundCallable::bind(container, instance.as_ref())?;

        debug!(
            "启动方法: configure={:?}, services={:?}, container={:?}",
            configure, services, container
        );

        let services_callable = services.clone();
        let build_container: BuildContainerFn =
            Arc::new(move |collection: &mut ServiceCollection| {
                build_application_container(
                    &*hosting,
                    &services_callable,
                    &container,
                    container_type.as_ref(),
                    collection,
                )
            });

        info!("入口类型 {} 的启动方法加载完成", entry_type.full_name());
        Ok(BootstrapMethods {
            instance,
            configure,
            services,
            build_container,
        })
    }

    fn find(
        &self,
        entry_type: &EntryType,
        role: MethodRole,
        environment: Option<&str>,
    ) -> StartupResult<Option<MethodDescriptor>> {
        match self.conventions.rule(role) {
            Some(rule) => find_by_rule(entry_type, rule, environment),
            None => Ok(None),
        }
    }
}

impl Default for StartupLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// 服务注册方法只能不接受参数或接受服务注册集合
fn check_services_parameters(method: &MethodDescriptor) -> StartupResult<()> {
    let expected = TypeInfo::of::<ServiceCollection>();
    match method.parameters() {
        [] => Ok(()),
        [parameter] if *parameter == expected => Ok(()),
        _ => Err(StartupError::ArgumentMismatch {
            method: method.name().to_string(),
            expected: expected.to_string(),
        }),
    }
}

/// 获取入口类型实例，优先从宿主容器解析，否则直接构造
fn activate(hosting: &dyn ServiceProvider, entry_type: &EntryType) -> StartupResult<EntryInstance> {
    if let Some(instance_type) = entry_type.instance_type() {
        let key = ServiceKey::Service(instance_type.clone());
        if let Some(instance) = hosting.get_service(&key)? {
            debug!("从宿主容器解析入口实例: {}", entry_type.full_name());
            return Ok(instance);
        }
    }

    debug!("构造入口实例: {}", entry_type.full_name());
    entry_type.construct(hosting)
}

fn build_application_container(
    hosting: &dyn ServiceProvider,
    services_callable: &BoundCallable,
    container_callable: &BoundCallable,
    container_type: Option<&TypeInfo>,
    services: &mut ServiceCollection,
) -> StartupResult<ServiceProviderHandle> {
    if let Some(provider) = services_callable.invoke_services(services)? {
        debug!("服务注册方法直接返回了容器，跳过容器定制");
        return Ok(provider);
    }

    let provider = match container_type {
        Some(builder_type) => {
            debug!("使用构建器类型 {} 的容器工厂", builder_type);
            let factory = hosting.get_required_provider_factory(builder_type)?;
            let mut builder = factory.create_builder(services);
            container_callable.invoke(&mut *builder)?;
            factory.create_service_provider(builder)?
        }
        None => {
            debug!("使用默认容器工厂");
            let factory =
                hosting.get_required_provider_factory(&TypeInfo::of::<ServiceCollection>())?;
            let builder = factory.create_builder(services);
            factory.create_service_provider(builder)?
        }
    };

    match provider {
        Some(provider) => {
            info!("应用容器构建完成");
            Ok(provider)
        }
        None => {
            warn!("容器工厂没有返回容器，直接从服务集合构建");
            Ok(services.build_service_provider())
        }
    }
}
