//! 服务生命周期

/// 服务生命周期类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
    /// 单例模式 - 整个容器生命周期内只创建一个实例
    Singleton,
    /// 作用域模式 - 在同一作用域内共享实例，根容器中等同于单例
    Scoped,
    /// 瞬时模式 - 每次请求都创建新实例
    #[default]
    Transient,
}

impl Lifetime {
    /// 解析出的实例是否需要被容器缓存
    pub fn is_cached(self) -> bool {
        matches!(self, Self::Singleton | Self::Scoped)
    }
}
