//! 方法绑定

use di_abstractions::{
    EntryInstance, MethodDescriptor, ReturnValue, ServiceCollection, ServiceProviderHandle,
};
use infrastructure_common::{StartupError, StartupResult, TypeInfo};
use std::any::Any;
use std::fmt;

/// 绑定了接收者的可调用方法
///
/// 实例方法总是带着接收者，静态方法不需要接收者，`Absent` 调用时什么都不做
#[derive(Clone)]
pub enum BoundCallable {
    /// 静态方法
    Static(MethodDescriptor),
    /// 实例方法及其接收者
    Instance(EntryInstance, MethodDescriptor),
    /// 方法不存在
    Absent,
}

impl BoundCallable {
    /// 把方法绑定到接收者，实例方法缺少接收者时失败
    pub fn bind(
        method: Option<MethodDescriptor>,
        receiver: Option<&EntryInstance>,
    ) -> StartupResult<Self> {
        let Some(method) = method else {
            return Ok(Self::Absent);
        };

        if method.is_static() {
            return Ok(Self::Static(method));
        }

        match receiver {
            Some(receiver) => Ok(Self::Instance(receiver.clone(), method)),
            None => Err(StartupError::MissingInstance {
                method: method.name().to_string(),
                type_name: method.declaring_type().to_string(),
            }),
        }
    }

    /// 绑定的方法
    pub fn method(&self) -> Option<&MethodDescriptor> {
        match self {
            Self::Static(method) | Self::Instance(_, method) => Some(method),
            Self::Absent => None,
        }
    }

    /// 是否没有绑定方法
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// 调用方法，没有参数的方法忽略 `arg`
    pub fn invoke(&self, arg: &mut dyn Any) -> StartupResult<ReturnValue> {
        match self {
            Self::Static(method) => method.invoke(None, arg),
            Self::Instance(receiver, method) => method.invoke(Some(receiver), arg),
            Self::Absent => Ok(None),
        }
    }

    /// 调用服务注册方法
    ///
    /// 空返回和返回空值都视为没有提供容器
    pub fn invoke_services(
        &self,
        services: &mut ServiceCollection,
    ) -> StartupResult<Option<ServiceProviderHandle>> {
        let Some(value) = self.invoke(services)? else {
            return Ok(None);
        };

        value
            .downcast::<ServiceProviderHandle>()
            .map(|provider| Some(*provider))
            .map_err(|_| StartupError::ReturnTypeMismatch {
                method: self.method().map(|m| m.name().to_string()).unwrap_or_default(),
                type_name: self
                    .method()
                    .map(|m| m.declaring_type().to_string())
                    .unwrap_or_default(),
                expected: TypeInfo::of::<ServiceProviderHandle>().to_string(),
            })
    }

    /// 容器定制方法的构建器类型
    ///
    /// 定制方法必须只接受一个参数，即构建器
    pub fn container_type(&self) -> StartupResult<Option<TypeInfo>> {
        let Some(method) = self.method() else {
            return Ok(None);
        };

        container_builder_type(method).map(Some)
    }
}

/// 容器定制方法唯一参数的类型
pub(crate) fn container_builder_type(method: &MethodDescriptor) -> StartupResult<TypeInfo> {
    match method.parameters() {
        [builder] => Ok(builder.clone()),
        parameters => Err(StartupError::InvalidContainerMethod {
            method: method.name().to_string(),
            parameter_count: parameters.len(),
        }),
    }
}

impl fmt::Debug for BoundCallable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static(method) => f.debug_tuple("Static").field(&method.name()).finish(),
            Self::Instance(_, method) => f
                .debug_tuple("Instance")
                .field(&"<instance>")
                .field(&method.name())
                .finish(),
            Self::Absent => f.write_str("Absent"),
        }
    }
}
