//! # 示例应用程序
//!
//! 演示如何按约定定位入口类型、注册服务并配置应用管道

mod shop;

use anyhow::Context;
use clap::Parser;
use di_abstractions::ServiceProviderExt;
use di_impl::ModuleCatalog;
use infrastructure_composition::{HostBuilder, LoggingConfig, StartupOptions};
use std::path::PathBuf;
use tracing::info;

use crate::shop::{Catalog, Pipeline};

/// 命令行参数
#[derive(Parser, Debug)]
#[command(name = "example-app")]
#[command(about = "Lorn ADSP 约定式启动示例")]
struct Args {
    /// 入口模块
    #[arg(short, long)]
    module: Option<String>,

    /// 运行环境，例如 Development 或 Production
    #[arg(short, long)]
    environment: Option<String>,

    /// 启动配置文件路径
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// 日志级别，缺省时按运行环境选择
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let options = load_options(&args)?;
    let logging = logging_config(&args, &options);
    let catalog = ModuleCatalog::new().with_module(shop::module());

    let host = HostBuilder::new(options)
        .with_logging(logging)
        .with_module_loader(catalog)
        .build()
        .context("构建宿主失败")?;

    info!(
        "入口类型: {}，环境: {}",
        host.entry_type().full_name(),
        host.environment().unwrap_or("<none>")
    );

    let catalog = host.application_services().resolve::<Catalog>()?;
    info!("商品目录: {:?}", catalog.products);

    let mut pipeline = Pipeline::default();
    host.configure(&mut pipeline)?;
    info!("应用管道: {}", pipeline.steps.join(" -> "));

    Ok(())
}

/// 加载启动选项，命令行参数覆盖配置文件
fn load_options(args: &Args) -> anyhow::Result<StartupOptions> {
    let mut options = match &args.config {
        Some(path) => StartupOptions::load_from(path)
            .with_context(|| format!("读取启动配置失败: {}", path.display()))?,
        None => StartupOptions::load()?,
    };

    if let Some(module) = &args.module {
        options.entry_module = module.clone();
    }
    if options.entry_module.is_empty() {
        options.entry_module = shop::MODULE.to_string();
    }
    if let Some(environment) = &args.environment {
        options = options.with_environment(environment.as_str());
    }

    Ok(options)
}

/// 开发环境输出详细日志，生产环境输出 JSON 日志
fn logging_config(args: &Args, options: &StartupOptions) -> LoggingConfig {
    let mut config = match options.environment() {
        Some(env) if env.eq_ignore_ascii_case("development") => LoggingConfig::development(),
        Some(env) if env.eq_ignore_ascii_case("production") => LoggingConfig::production(),
        _ => LoggingConfig::default(),
    };
    if let Some(level) = &args.log_level {
        config.level = parse_log_level(level);
    }
    config
}

/// 解析日志级别
fn parse_log_level(level: &str) -> tracing::Level {
    match level.to_lowercase().as_str() {
        "trace" => tracing::Level::TRACE,
        "debug" => tracing::Level::DEBUG,
        "warn" => tracing::Level::WARN,
        "error" => tracing::Level::ERROR,
        _ => tracing::Level::INFO,
    }
}
