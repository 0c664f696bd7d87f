//! 内存模块目录

use anyhow::anyhow;
use di_abstractions::{Module, ModuleLoader};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// 模块目录
///
/// 宿主在启动前把模块（及其入口类型描述符）发布到目录中
#[derive(Debug, Default)]
pub struct ModuleCatalog {
    modules: RwLock<HashMap<String, Arc<Module>>>,
}

impl ModuleCatalog {
    /// 创建空目录
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册模块，同名模块会被替换
    pub fn register(&self, module: Module) {
        debug!("注册模块: {}", module.identifier());
        self.modules
            .write()
            .insert(module.identifier().to_string(), Arc::new(module));
    }

    /// 注册模块（构建者形式）
    pub fn with_module(self, module: Module) -> Self {
        self.register(module);
        self
    }

    /// 是否注册了指定模块
    pub fn contains(&self, identifier: &str) -> bool {
        self.modules.read().contains_key(identifier)
    }
}

impl ModuleLoader for ModuleCatalog {
    fn load(
        &self,
        identifier: &str,
    ) -> Result<Arc<Module>, Box<dyn std::error::Error + Send + Sync>> {
        self.modules
            .read()
            .get(identifier)
            .cloned()
            .ok_or_else(|| anyhow!("模块 '{}' 未在目录中注册", identifier).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use di_abstractions::EntryType;

    #[test]
    fn load_registered_module() {
        let catalog = ModuleCatalog::new()
            .with_module(Module::new("App").with_type(EntryType::builder("App.Entry").build()));

        assert!(catalog.contains("App"));
        let module = catalog.load("App").unwrap();
        assert_eq!(module.identifier(), "App");
        assert!(module.get_type("App.Entry").is_some());
    }

    #[test]
    fn unknown_module_fails() {
        let catalog = ModuleCatalog::new();
        let err = catalog.load("Missing").unwrap_err();
        assert!(err.to_string().contains("Missing"));
    }
}
