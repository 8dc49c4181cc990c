//! SqlValuer：渲染阶段才计算出实际值的参数。
//!
//! 适用于延迟求值的场景（例如乐观锁版本号、按租户计算的值）。
//! 求值失败会让本次渲染整体失败。

use crate::value::SqlValue;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("builder sql valuer error: {0}")]
pub struct ValuerError(pub String);

/// 可在渲染阶段动态计算实际值的 trait。
pub trait SqlValuer: dyn_clone::DynClone + std::fmt::Debug + Send + Sync {
    fn value(&self) -> Result<SqlValue, ValuerError>;
}

dyn_clone::clone_trait_object!(SqlValuer);
