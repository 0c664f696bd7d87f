//! 约定方法查找

use di_abstractions::{EntryType, MethodDescriptor};
use infrastructure_common::{
    MethodConvention, NamingConvention, StartupError, StartupResult, TypeInfo,
};
use tracing::debug;

/// 按命名约定在入口类型中查找方法
///
/// 先查找带环境的名称，找不到时再查找通用名称。任一阶段有多个候选时报错，
/// 不做重载选择。找到的方法返回类型与 `required_return_type` 不一致时，
/// 必需方法报错，可选方法视为不存在。
pub fn find_method(
    entry_type: &EntryType,
    convention: &NamingConvention,
    required_return_type: Option<&TypeInfo>,
    required: bool,
) -> StartupResult<Option<MethodDescriptor>> {
    let methods = entry_type.methods();

    let mut selected = None;
    if convention.environment().is_some() {
        selected = single_match(methods, convention.environment_name(), |name| {
            convention.matches_environment(name)
        })?;
    }
    if selected.is_none() {
        selected = single_match(methods, convention.generic_name(), |name| {
            convention.matches_generic(name)
        })?;
    }

    let Some(method) = selected else {
        if required {
            return Err(StartupError::MissingMethod {
                environment_name: convention.environment_name(),
                generic_name: convention.generic_name(),
                type_name: entry_type.full_name().to_string(),
            });
        }
        debug!(
            "类型 {} 中没有 {} 或 {}",
            entry_type.full_name(),
            convention.environment_name(),
            convention.generic_name()
        );
        return Ok(None);
    };

    if let Some(expected) = required_return_type {
        if method.return_type() != expected {
            if required {
                return Err(StartupError::ReturnTypeMismatch {
                    method: method.name().to_string(),
                    type_name: entry_type.full_name().to_string(),
                    expected: expected.to_string(),
                });
            }
            debug!(
                "方法 {}.{} 返回 {}，不是 {}，忽略",
                entry_type.full_name(),
                method.name(),
                method.return_type(),
                expected
            );
            return Ok(None);
        }
    }

    debug!("选中方法 {}.{}", entry_type.full_name(), method.name());
    Ok(Some(method.clone()))
}

/// 按约定规则查找方法，依次尝试规则中的每种返回类型
pub fn find_by_rule(
    entry_type: &EntryType,
    rule: &MethodConvention,
    environment: Option<&str>,
) -> StartupResult<Option<MethodDescriptor>> {
    let naming = rule.naming(environment);

    let Some((last, preferred)) = rule.return_types.split_last() else {
        return find_method(entry_type, &naming, None, rule.required);
    };

    for return_type in preferred {
        if let Some(method) = find_method(entry_type, &naming, Some(return_type), false)? {
            return Ok(Some(method));
        }
    }
    find_method(entry_type, &naming, Some(last), rule.required)
}

fn single_match<'a>(
    methods: &'a [MethodDescriptor],
    composed_name: String,
    matches: impl Fn(&str) -> bool,
) -> StartupResult<Option<&'a MethodDescriptor>> {
    let mut candidates = methods.iter().filter(|method| matches(method.name()));
    let first = candidates.next();
    if candidates.next().is_some() {
        return Err(StartupError::AmbiguousMethod {
            method: composed_name,
        });
    }
    Ok(first)
}
