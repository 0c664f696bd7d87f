//! 示例模块 `Shop`
//!
//! `Shop.Entry` 用于开发和默认环境，`Shop.EntryProduction` 用于生产环境

use di_abstractions::{EntryType, MethodDescriptor, Module, ServiceCollection};

/// 模块标识
pub const MODULE: &str = "Shop";

/// 应用管道
#[derive(Debug, Default)]
pub struct Pipeline {
    pub steps: Vec<&'static str>,
}

/// 商品目录服务
#[derive(Debug)]
pub struct Catalog {
    pub products: Vec<String>,
}

/// 审计服务，只在生产环境注册
#[derive(Debug)]
pub struct AuditLog;

/// 默认入口
#[derive(Debug)]
pub struct ShopEntry {
    products: Vec<&'static str>,
}

impl Default for ShopEntry {
    fn default() -> Self {
        Self {
            products: vec!["keyboard", "mouse"],
        }
    }
}

impl ShopEntry {
    fn configure_services(&self, services: &mut ServiceCollection) {
        services.add_singleton(Catalog {
            products: self.products.iter().map(|p| p.to_string()).collect(),
        });
    }

    fn configure(&self, pipeline: &mut Pipeline) {
        pipeline.steps.extend(["static-files", "catalog"]);
    }
}

fn configure_development(pipeline: &mut Pipeline) {
    pipeline
        .steps
        .extend(["developer-exception-page", "static-files", "catalog"]);
}

fn configure_production_services(services: &mut ServiceCollection) {
    services.add_singleton(Catalog {
        products: vec!["keyboard".to_string()],
    });
}

fn configure_production_container(services: &mut ServiceCollection) {
    services.add_singleton(AuditLog);
}

fn configure_production(pipeline: &mut Pipeline) {
    pipeline.steps.extend(["audit", "catalog"]);
}

/// 构建示例模块
pub fn module() -> Module {
    let entry = EntryType::builder("Shop.Entry")
        .default_constructible::<ShopEntry>()
        .method(MethodDescriptor::instance(
            "ConfigureServices",
            ShopEntry::configure_services,
        ))
        .method(MethodDescriptor::instance("Configure", ShopEntry::configure))
        .method(MethodDescriptor::static_method(
            "ConfigureDevelopment",
            configure_development,
        ))
        .build();

    let production = EntryType::builder("Shop.EntryProduction")
        .method(MethodDescriptor::static_method(
            "ConfigureServices",
            configure_production_services,
        ))
        .method(MethodDescriptor::static_method(
            "ConfigureContainer",
            configure_production_container,
        ))
        .method(MethodDescriptor::static_method(
            "Configure",
            configure_production,
        ))
        .build();

    Module::new(MODULE).with_type(entry).with_type(production)
}
