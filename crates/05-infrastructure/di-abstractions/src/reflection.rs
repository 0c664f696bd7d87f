//! 类型描述符
//!
//! Rust 没有运行时反射，宿主通过 [`EntryType`] 发布入口类型的公开方法，
//! 启动加载器只读取这些描述符

use crate::container::{ServiceProvider, ServiceProviderHandle};
use infrastructure_common::{InvocationError, StartupError, StartupResult, TypeInfo};
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// 入口类型实例
pub type EntryInstance = Arc<dyn Any + Send + Sync>;

/// 方法返回值，`None` 表示空返回或返回了空值
pub type ReturnValue = Option<Box<dyn Any>>;

/// 类型擦除后的方法调用函数
pub type MethodInvoker =
    Arc<dyn Fn(Option<&EntryInstance>, &mut dyn Any) -> StartupResult<ReturnValue> + Send + Sync>;

/// 入口类型构造函数，可以从宿主容器解析依赖
pub type EntryConstructor =
    Arc<dyn Fn(&dyn ServiceProvider) -> Result<EntryInstance, InvocationError> + Send + Sync>;

/// 方法种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodKind {
    /// 静态方法，不需要接收者
    Static,
    /// 实例方法，需要入口类型实例
    Instance,
}

/// 约定方法可用的返回类型
pub trait MethodReturn: 'static {
    /// 声明的返回类型
    fn return_type() -> TypeInfo;

    /// 转换为类型擦除的返回值
    fn into_return_value(self) -> Result<ReturnValue, InvocationError>;
}

impl MethodReturn for () {
    fn return_type() -> TypeInfo {
        TypeInfo::void()
    }

    fn into_return_value(self) -> Result<ReturnValue, InvocationError> {
        Ok(None)
    }
}

impl<T: Any> MethodReturn for Option<T> {
    fn return_type() -> TypeInfo {
        TypeInfo::of::<T>()
    }

    fn into_return_value(self) -> Result<ReturnValue, InvocationError> {
        Ok(self.map(|value| Box::new(value) as Box<dyn Any>))
    }
}

impl MethodReturn for ServiceProviderHandle {
    fn return_type() -> TypeInfo {
        TypeInfo::of::<ServiceProviderHandle>()
    }

    fn into_return_value(self) -> Result<ReturnValue, InvocationError> {
        Ok(Some(Box::new(self)))
    }
}

impl<R, E> MethodReturn for Result<R, E>
where
    R: MethodReturn,
    E: Into<InvocationError> + 'static,
{
    fn return_type() -> TypeInfo {
        R::return_type()
    }

    fn into_return_value(self) -> Result<ReturnValue, InvocationError> {
        self.map_err(Into::into)?.into_return_value()
    }
}

/// 方法描述符
#[derive(Clone)]
pub struct MethodDescriptor {
    name: String,
    declaring_type: String,
    kind: MethodKind,
    parameters: Vec<TypeInfo>,
    return_type: TypeInfo,
    invoker: MethodInvoker,
}

impl MethodDescriptor {
    /// 实例方法 `fn(&self, &mut A) -> R`
    pub fn instance<E, A, R, F>(name: impl Into<String>, method: F) -> Self
    where
        E: Any + Send + Sync,
        A: Any,
        R: MethodReturn,
        F: Fn(&E, &mut A) -> R + Send + Sync + 'static,
    {
        let name = name.into();
        let method_name = name.clone();
        let invoker: MethodInvoker = Arc::new(
            move |receiver: Option<&EntryInstance>, arg: &mut dyn Any| {
                let entry = downcast_receiver::<E>(&method_name, receiver)?;
                let arg = downcast_argument::<A>(&method_name, arg)?;
                method(entry, arg)
                    .into_return_value()
                    .map_err(StartupError::Invocation)
            },
        );

        Self {
            name,
            declaring_type: TypeInfo::of::<E>().full_name().to_string(),
            kind: MethodKind::Instance,
            parameters: vec![TypeInfo::of::<A>()],
            return_type: R::return_type(),
            invoker,
        }
    }

    /// 无参数实例方法 `fn(&self) -> R`
    pub fn instance_no_args<E, R, F>(name: impl Into<String>, method: F) -> Self
    where
        E: Any + Send + Sync,
        R: MethodReturn,
        F: Fn(&E) -> R + Send + Sync + 'static,
    {
        let name = name.into();
        let method_name = name.clone();
        let invoker: MethodInvoker = Arc::new(
            move |receiver: Option<&EntryInstance>, _arg: &mut dyn Any| {
                let entry = downcast_receiver::<E>(&method_name, receiver)?;
                method(entry)
                    .into_return_value()
                    .map_err(StartupError::Invocation)
            },
        );

        Self {
            name,
            declaring_type: TypeInfo::of::<E>().full_name().to_string(),
            kind: MethodKind::Instance,
            parameters: Vec::new(),
            return_type: R::return_type(),
            invoker,
        }
    }

    /// 静态方法 `fn(&mut A) -> R`
    pub fn static_method<A, R, F>(name: impl Into<String>, method: F) -> Self
    where
        A: Any,
        R: MethodReturn,
        F: Fn(&mut A) -> R + Send + Sync + 'static,
    {
        let name = name.into();
        let method_name = name.clone();
        let invoker: MethodInvoker = Arc::new(
            move |_receiver: Option<&EntryInstance>, arg: &mut dyn Any| {
                let arg = downcast_argument::<A>(&method_name, arg)?;
                method(arg)
                    .into_return_value()
                    .map_err(StartupError::Invocation)
            },
        );

        Self {
            name,
            declaring_type: String::new(),
            kind: MethodKind::Static,
            parameters: vec![TypeInfo::of::<A>()],
            return_type: R::return_type(),
            invoker,
        }
    }

    /// 无参数静态方法 `fn() -> R`
    pub fn static_no_args<R, F>(name: impl Into<String>, method: F) -> Self
    where
        R: MethodReturn,
        F: Fn() -> R + Send + Sync + 'static,
    {
        let invoker: MethodInvoker = Arc::new(
            move |_receiver: Option<&EntryInstance>, _arg: &mut dyn Any| {
                method()
                    .into_return_value()
                    .map_err(StartupError::Invocation)
            },
        );

        Self {
            name: name.into(),
            declaring_type: String::new(),
            kind: MethodKind::Static,
            parameters: Vec::new(),
            return_type: R::return_type(),
            invoker,
        }
    }

    /// 方法名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 声明该方法的类型完整名称
    pub fn declaring_type(&self) -> &str {
        &self.declaring_type
    }

    /// 方法种类
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// 是否为静态方法
    pub fn is_static(&self) -> bool {
        self.kind == MethodKind::Static
    }

    /// 参数类型列表
    pub fn parameters(&self) -> &[TypeInfo] {
        &self.parameters
    }

    /// 返回类型
    pub fn return_type(&self) -> &TypeInfo {
        &self.return_type
    }

    /// 调用方法，静态方法忽略接收者
    pub fn invoke(
        &self,
        receiver: Option<&EntryInstance>,
        arg: &mut dyn Any,
    ) -> StartupResult<ReturnValue> {
        (self.invoker)(receiver, arg)
    }
}

impl fmt::Debug for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDescriptor")
            .field("name", &self.name)
            .field("declaring_type", &self.declaring_type)
            .field("kind", &self.kind)
            .field("parameters", &self.parameters)
            .field("return_type", &self.return_type)
            .field("invoker", &"<function>")
            .finish()
    }
}

fn downcast_receiver<'a, E: Any>(
    method: &str,
    receiver: Option<&'a EntryInstance>,
) -> StartupResult<&'a E> {
    let receiver = receiver.ok_or_else(|| StartupError::MissingInstance {
        method: method.to_string(),
        type_name: std::any::type_name::<E>().to_string(),
    })?;

    receiver
        .downcast_ref::<E>()
        .ok_or_else(|| StartupError::ReceiverMismatch {
            method: method.to_string(),
            expected: std::any::type_name::<E>().to_string(),
        })
}

fn downcast_argument<'a, A: Any>(method: &str, arg: &'a mut dyn Any) -> StartupResult<&'a mut A> {
    arg.downcast_mut::<A>()
        .ok_or_else(|| StartupError::ArgumentMismatch {
            method: method.to_string(),
            expected: std::any::type_name::<A>().to_string(),
        })
}

/// 入口类型描述符
#[derive(Clone)]
pub struct EntryType {
    name: String,
    full_name: String,
    instance_type: Option<TypeInfo>,
    methods: Vec<MethodDescriptor>,
    constructor: Option<EntryConstructor>,
}

impl EntryType {
    /// 创建入口类型构建器，`full_name` 形如 `App.Entry`
    pub fn builder(full_name: impl Into<String>) -> EntryTypeBuilder {
        EntryTypeBuilder::new(full_name)
    }

    /// 简单名称（不包含命名空间）
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 完整名称
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// 实例对应的 Rust 类型，用于从宿主容器解析
    pub fn instance_type(&self) -> Option<&TypeInfo> {
        self.instance_type.as_ref()
    }

    /// 所有公开方法（静态和实例）
    pub fn methods(&self) -> &[MethodDescriptor] {
        &self.methods
    }

    /// 直接构造实例
    pub fn construct(&self, services: &dyn ServiceProvider) -> StartupResult<EntryInstance> {
        let constructor =
            self.constructor
                .as_ref()
                .ok_or_else(|| StartupError::EntryActivation {
                    type_name: self.full_name.clone(),
                    reason: "类型没有可用的构造函数".to_string(),
                })?;

        constructor(services).map_err(|e| StartupError::EntryActivation {
            type_name: self.full_name.clone(),
            reason: e.to_string(),
        })
    }
}

impl fmt::Debug for EntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntryType")
            .field("full_name", &self.full_name)
            .field("instance_type", &self.instance_type)
            .field("methods", &self.methods)
            .field("constructor", &self.constructor.as_ref().map(|_| "<function>"))
            .finish()
    }
}

/// 入口类型构建器
pub struct EntryTypeBuilder {
    full_name: String,
    instance_type: Option<TypeInfo>,
    methods: Vec<MethodDescriptor>,
    constructor: Option<EntryConstructor>,
}

impl EntryTypeBuilder {
    /// 创建新的构建器
    pub fn new(full_name: impl Into<String>) -> Self {
        Self {
            full_name: full_name.into(),
            instance_type: None,
            methods: Vec::new(),
            constructor: None,
        }
    }

    /// 添加公开方法，同名方法视为重载
    pub fn method(mut self, mut method: MethodDescriptor) -> Self {
        method.declaring_type = self.full_name.clone();
        self.methods.push(method);
        self
    }

    /// 使用构造函数创建实例，构造函数可以从宿主容器解析依赖
    pub fn constructed_with<E, F>(mut self, constructor: F) -> Self
    where
        E: Any + Send + Sync,
        F: Fn(&dyn ServiceProvider) -> Result<E, InvocationError> + Send + Sync + 'static,
    {
        self.instance_type = Some(TypeInfo::of::<E>());
        self.constructor = Some(Arc::new(move |services: &dyn ServiceProvider| {
            constructor(services).map(|entry| Arc::new(entry) as EntryInstance)
        }));
        self
    }

    /// 使用 `Default` 创建实例
    pub fn default_constructible<E>(self) -> Self
    where
        E: Any + Send + Sync + Default,
    {
        self.constructed_with(|_services: &dyn ServiceProvider| Ok(E::default()))
    }

    /// 构建入口类型描述符
    pub fn build(self) -> EntryType {
        let name = self
            .full_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.full_name)
            .to_string();

        EntryType {
            name,
            full_name: self.full_name,
            instance_type: self.instance_type,
            methods: self.methods,
            constructor: self.constructor,
        }
    }
}

/// 模块，即一组已定义的入口类型
#[derive(Debug, Clone)]
pub struct Module {
    identifier: String,
    types: Vec<Arc<EntryType>>,
}

impl Module {
    /// 创建新的模块
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            types: Vec::new(),
        }
    }

    /// 添加类型定义
    pub fn with_type(mut self, entry_type: EntryType) -> Self {
        self.types.push(Arc::new(entry_type));
        self
    }

    /// 模块标识
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// 按完整名称精确查找类型
    pub fn get_type(&self, full_name: &str) -> Option<Arc<EntryType>> {
        self.types
            .iter()
            .find(|entry_type| entry_type.full_name() == full_name)
            .cloned()
    }

    /// 模块中定义的所有类型，保持定义顺序
    pub fn defined_types(&self) -> &[Arc<EntryType>] {
        &self.types
    }
}

/// 模块加载器
pub trait ModuleLoader: Send + Sync {
    /// 按标识加载模块
    fn load(
        &self,
        identifier: &str,
    ) -> Result<Arc<Module>, Box<dyn std::error::Error + Send + Sync>>;
}
