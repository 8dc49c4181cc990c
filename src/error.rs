//! 构建/渲染错误。全部属于调用方的编程错误：尽早失败，不产生部分输出。

use crate::valuer::ValuerError;

pub type Result<T> = std::result::Result<T, BuilderError>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuilderError {
    #[error("builder junction requires at least one child condition")]
    EmptyJunction,
    #[error("builder unsupported condition kind {kind} in {position}")]
    UnsupportedConditionKind {
        kind: &'static str,
        position: &'static str,
    },
    #[error("builder unsupported dialect {0:?}")]
    UnsupportedDialect(String),
    #[error("builder no columns/props selected before from")]
    MissingSelectClause,
    #[error("builder {operation} is not allowed in {mode} mode")]
    InvalidOperation {
        operation: &'static str,
        mode: &'static str,
    },
    #[error(transparent)]
    Valuer(#[from] ValuerError),
}
