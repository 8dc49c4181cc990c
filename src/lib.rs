//! halo-sql-criteria：条件树 -> SQL 片段 + 有序参数列表，附带列名解析与链式 builder。

pub mod builder;
pub mod catalog;
pub mod condition;
pub mod config;
pub mod dialect;
pub mod entity;
pub mod error;
mod expr;
pub mod keywords;
mod literal;
pub mod macros;
pub mod naming;
pub mod render;
#[cfg(test)]
mod render_tests;
pub mod resolver;
pub mod value;
pub mod valuer;

pub use crate::builder::{JoinKind, Mode, SqlBuilder};
pub use crate::catalog::{AliasMap, ColumnMap, EntityCatalog, PropertyCatalog, default_catalog};
pub use crate::condition::{
    Condition, Junction, JunctionOp, Keyword, Operand, Operator, SubQuery, SubQueryEntity,
};
pub use crate::config::BuilderConfig;
pub use crate::dialect::{
    DefaultDialectGuard, Dialect, default_dialect, set_default_dialect,
    set_default_dialect_scoped,
};
pub use crate::entity::{EntityMeta, PropMeta, SqlEntity};
pub use crate::error::{BuilderError, Result};
pub use crate::macros::IntoProps;
pub use crate::naming::{
    DefaultNamingGuard, NamingPolicy, default_naming_policy, set_default_naming_policy,
    set_default_naming_policy_scoped,
};
pub use crate::render::{Renderer, SqlParts};
pub use crate::resolver::ColumnResolver;
pub use crate::value::{SqlDateTime, SqlValue};
pub use crate::valuer::{SqlValuer, ValuerError};

/// 推荐的便捷命名空间：允许 `use halo_space::sqlbuilder::{...}` 形式导入。
pub mod sqlbuilder {
    pub use crate::*;
}
