//! 元数据定义
//!
//! 提供运行时类型信息

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// 类型信息
///
/// 相等性和哈希只取决于 [`TypeId`]，名称仅用于诊断信息
#[derive(Debug, Clone, Eq)]
pub struct TypeInfo {
    /// 类型名称（不包含模块路径）
    pub name: String,
    /// 类型ID
    pub id: TypeId,
    /// 完整类型路径
    pub module_path: String,
}

impl TypeInfo {
    /// 从类型获取类型信息
    pub fn of<T: ?Sized + 'static>() -> Self {
        let full_name = std::any::type_name::<T>();
        Self {
            name: short_type_name(full_name),
            id: TypeId::of::<T>(),
            module_path: full_name.to_string(),
        }
    }

    /// 空返回类型 `()`
    pub fn void() -> Self {
        Self::of::<()>()
    }

    /// 是否为空返回类型
    pub fn is_void(&self) -> bool {
        self.id == TypeId::of::<()>()
    }

    /// 获取简短的类型名称（不包含模块路径）
    pub fn short_name(&self) -> &str {
        &self.name
    }

    /// 获取完整类型路径
    pub fn full_name(&self) -> &str {
        &self.module_path
    }
}

impl PartialEq for TypeInfo {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Hash for TypeInfo {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// 去掉泛型参数之外的模块路径
///
/// `alloc::sync::Arc<dyn di::ServiceProvider>` -> `Arc<dyn ServiceProvider>`
fn short_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut segment = String::new();

    for ch in full_name.chars() {
        match ch {
            ':' => segment.clear(),
            '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' => {
                result.push_str(&segment);
                segment.clear();
                result.push(ch);
            }
            _ => segment.push(ch),
        }
    }
    result.push_str(&segment);
    result
}
