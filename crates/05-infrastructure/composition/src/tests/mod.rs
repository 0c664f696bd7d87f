//! 启动组合的测试

mod bootstrap_tests;

use di_abstractions::{ServiceCollection, ServiceProviderHandle};
use di_impl::{BuildServiceProvider, DefaultServiceProviderFactory};
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// 初始化测试日志系统（只初始化一次）
pub(crate) fn init_test_logger() {
    INIT_LOGGER.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("debug")
            .with_test_writer()
            .try_init()
            .ok(); // 忽略初始化失败的错误
    });
}

/// 只包含默认容器工厂的宿主容器
pub(crate) fn hosting_container() -> ServiceProviderHandle {
    hosting_container_with(|_services| {})
}

/// 在默认容器工厂之外追加宿主服务
pub(crate) fn hosting_container_with(
    configure: impl FnOnce(&mut ServiceCollection),
) -> ServiceProviderHandle {
    let mut services = ServiceCollection::new();
    DefaultServiceProviderFactory::register(&mut services);
    configure(&mut services);
    services.build_service_provider()
}
