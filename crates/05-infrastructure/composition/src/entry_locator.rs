//! 入口类型定位

use di_abstractions::{EntryType, ModuleLoader};
use infrastructure_common::{
    normalize_environment, EntryTypeConvention, StartupError, StartupResult,
};
use std::sync::Arc;
use tracing::{debug, info};

/// 按默认约定在模块中定位入口类型
pub fn find_entry_type(
    loader: &dyn ModuleLoader,
    module_identifier: &str,
    environment: Option<&str>,
) -> StartupResult<Arc<EntryType>> {
    find_entry_type_with(
        loader,
        &EntryTypeConvention::default(),
        module_identifier,
        environment,
    )
}

/// 按指定约定在模块中定位入口类型
///
/// 先按完整名称精确查找，再按简单名称（忽略 ASCII 大小写）扫描模块中的所有类型
pub fn find_entry_type_with(
    loader: &dyn ModuleLoader,
    convention: &EntryTypeConvention,
    module_identifier: &str,
    environment: Option<&str>,
) -> StartupResult<Arc<EntryType>> {
    if module_identifier.trim().is_empty() {
        return Err(StartupError::invalid_argument(
            "module_identifier",
            "模块标识不能为空",
        ));
    }

    let environment = normalize_environment(environment);
    let module = loader
        .load(module_identifier)
        .map_err(|e| StartupError::ModuleLoad {
            module: module_identifier.to_string(),
            reason: e.to_string(),
        })?;

    for candidate in convention.qualified_candidates(module_identifier, environment) {
        debug!("查找入口类型: {}", candidate);
        if let Some(entry_type) = module.get_type(&candidate) {
            info!("定位到入口类型: {}", entry_type.full_name());
            return Ok(entry_type);
        }
    }

    for candidate in convention.simple_candidates(environment) {
        if let Some(entry_type) = module
            .defined_types()
            .iter()
            .find(|entry_type| entry_type.name().eq_ignore_ascii_case(&candidate))
        {
            info!(
                "按简单名称 {} 定位到入口类型: {}",
                candidate,
                entry_type.full_name()
            );
            return Ok(Arc::clone(entry_type));
        }
    }

    Err(StartupError::TypeNotFound {
        environment_name: convention
            .environment_name(environment)
            .unwrap_or_else(|| convention.base_name.clone()),
        generic_name: convention.base_name.clone(),
        module: module_identifier.to_string(),
    })
}
