//! 约定规范定义
//!
//! 启动方法和入口类型按名称约定查找，而不是通过固定的 trait

use crate::metadata::TypeInfo;
use std::fmt;

/// 方法命名约定
///
/// 由 `(prefix, suffix, environment)` 组成，计算两个候选名称:
/// `prefix + environment + suffix` 和 `prefix + suffix`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    prefix: String,
    suffix: String,
    environment: Option<String>,
}

impl NamingConvention {
    /// 创建新的命名约定，空环境名视为未指定
    pub fn new(
        prefix: impl Into<String>,
        suffix: impl Into<String>,
        environment: Option<&str>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
            environment: normalize_environment(environment).map(str::to_string),
        }
    }

    /// 名称前缀
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// 名称后缀
    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// 环境名称
    pub fn environment(&self) -> Option<&str> {
        self.environment.as_deref()
    }

    /// 带环境的名称，未指定环境时与通用名称相同
    pub fn environment_name(&self) -> String {
        match &self.environment {
            Some(env) => format!("{}{}{}", self.prefix, env, self.suffix),
            None => self.generic_name(),
        }
    }

    /// 通用名称
    pub fn generic_name(&self) -> String {
        format!("{}{}", self.prefix, self.suffix)
    }

    /// 检查名称是否匹配带环境的形式
    ///
    /// 前缀和后缀区分大小写，环境部分不区分大小写，不允许多余字符
    pub fn matches_environment(&self, name: &str) -> bool {
        let Some(env) = &self.environment else {
            return false;
        };

        name.strip_prefix(self.prefix.as_str())
            .and_then(|rest| rest.strip_suffix(self.suffix.as_str()))
            .map_or(false, |token| token.eq_ignore_ascii_case(env))
    }

    /// 检查名称是否与通用名称完全一致
    pub fn matches_generic(&self, name: &str) -> bool {
        name.len() == self.prefix.len() + self.suffix.len()
            && name.starts_with(self.prefix.as_str())
            && name.ends_with(self.suffix.as_str())
    }
}

/// 把空白环境名归一化为 `None`
pub fn normalize_environment(environment: Option<&str>) -> Option<&str> {
    environment.map(str::trim).filter(|env| !env.is_empty())
}

/// 启动方法角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MethodRole {
    /// 配置方法（必需）
    Configure,
    /// 服务注册方法（可选）
    ConfigureServices,
    /// 容器定制方法（可选）
    ConfigureContainer,
}

impl fmt::Display for MethodRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Configure => "Configure",
            Self::ConfigureServices => "ConfigureServices",
            Self::ConfigureContainer => "ConfigureContainer",
        };
        f.write_str(name)
    }
}

/// 方法约定规则
#[derive(Debug, Clone)]
pub struct MethodConvention {
    /// 方法角色
    pub role: MethodRole,
    /// 名称前缀
    pub prefix: String,
    /// 名称后缀
    pub suffix: String,
    /// 是否必需
    pub required: bool,
    /// 可接受的返回类型，按顺序尝试；为空时不限制
    pub return_types: Vec<TypeInfo>,
}

impl MethodConvention {
    /// 创建新的方法约定规则
    pub fn new(role: MethodRole, prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            role,
            prefix: prefix.into(),
            suffix: suffix.into(),
            required: false,
            return_types: Vec::new(),
        }
    }

    /// 设置为必需
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// 追加一个可接受的返回类型
    pub fn returning(mut self, return_type: TypeInfo) -> Self {
        self.return_types.push(return_type);
        self
    }

    /// 针对指定环境生成命名约定
    pub fn naming(&self, environment: Option<&str>) -> NamingConvention {
        NamingConvention::new(self.prefix.clone(), self.suffix.clone(), environment)
    }
}

/// 启动方法约定规则表
#[derive(Debug, Clone)]
pub struct StartupConventions {
    rules: Vec<MethodConvention>,
}

impl StartupConventions {
    /// 从规则列表创建
    pub fn new(rules: Vec<MethodConvention>) -> Self {
        Self { rules }
    }

    /// 标准约定: `Configure{env}`、`Configure{env}Services`、`Configure{env}Container`
    ///
    /// `service_provider_type` 是服务注册方法可以直接返回的容器句柄类型
    pub fn standard(service_provider_type: TypeInfo) -> Self {
        Self::new(vec![
            MethodConvention::new(MethodRole::Configure, "Configure", "")
                .required()
                .returning(TypeInfo::void()),
            MethodConvention::new(MethodRole::ConfigureServices, "Configure", "Services")
                .returning(service_provider_type)
                .returning(TypeInfo::void()),
            MethodConvention::new(MethodRole::ConfigureContainer, "Configure", "Container")
                .returning(TypeInfo::void()),
        ])
    }

    /// 替换指定角色的规则
    pub fn with_rule(mut self, rule: MethodConvention) -> Self {
        self.rules.retain(|existing| existing.role != rule.role);
        self.rules.push(rule);
        self
    }

    /// 获取指定角色的规则
    pub fn rule(&self, role: MethodRole) -> Option<&MethodConvention> {
        self.rules.iter().find(|rule| rule.role == role)
    }

    /// 获取所有规则
    pub fn rules(&self) -> &[MethodConvention] {
        &self.rules
    }
}

/// 入口类型命名约定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryTypeConvention {
    /// 入口类型基础名称
    pub base_name: String,
}

impl EntryTypeConvention {
    /// 创建新的入口类型约定
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
        }
    }

    /// 带环境的简单名称
    pub fn environment_name(&self, environment: Option<&str>) -> Option<String> {
        normalize_environment(environment).map(|env| format!("{}{}", self.base_name, env))
    }

    /// 按优先级排列的完整名称候选:
    /// `Entry{env}`、`{module}.Entry{env}`、`Entry`、`{module}.Entry`
    pub fn qualified_candidates(&self, module: &str, environment: Option<&str>) -> Vec<String> {
        let mut candidates = Vec::with_capacity(4);
        if let Some(name) = self.environment_name(environment) {
            candidates.push(name.clone());
            candidates.push(format!("{}.{}", module, name));
        }
        candidates.push(self.base_name.clone());
        candidates.push(format!("{}.{}", module, self.base_name));
        candidates
    }

    /// 按优先级排列的简单名称候选
    pub fn simple_candidates(&self, environment: Option<&str>) -> Vec<String> {
        let mut candidates = Vec::with_capacity(2);
        candidates.extend(self.environment_name(environment));
        candidates.push(self.base_name.clone());
        candidates
    }
}

impl Default for EntryTypeConvention {
    fn default() -> Self {
        Self::new("Entry")
    }
}
