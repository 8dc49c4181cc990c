//! Dialect：参数输出策略（字面量 / `?` / `:name` / `#{name}`）。

use crate::error::BuilderError;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

/// 一次渲染内固定不变的参数方言。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Dialect {
    /// 值直接内联为字面量，不产生参数。
    Literal,
    /// `?` 占位符。
    #[default]
    Positional,
    /// `:propName` 占位符。
    Named,
    /// ibatis 风格的 `#{propName}` 占位符。
    Indexed,
}

static DEFAULT_DIALECT: AtomicU8 = AtomicU8::new(Dialect::Positional as u8);
static DEFAULT_DIALECT_LOCK: Mutex<()> = Mutex::new(());

impl Dialect {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::Literal,
            1 => Self::Positional,
            2 => Self::Named,
            3 => Self::Indexed,
            _ => Self::Positional,
        }
    }

    /// 是否把值追加到参数列表（`Literal` 之外都是）。
    pub fn is_parameterized(self) -> bool {
        !matches!(self, Self::Literal)
    }

    /// 占位符是否携带参数名。
    pub fn uses_keys(self) -> bool {
        matches!(self, Self::Named | Self::Indexed)
    }

    /// 写出一个占位符；`Literal` 下写出未绑定占位 `?`。
    pub(crate) fn write_placeholder(self, key: &str, out: &mut String) {
        match self {
            Self::Literal | Self::Positional => out.push('?'),
            Self::Named => {
                out.push(':');
                out.push_str(key);
            }
            Self::Indexed => {
                out.push_str("#{");
                out.push_str(key);
                out.push('}');
            }
        }
    }
}

/// 获取当前全局默认 Dialect。
pub fn default_dialect() -> Dialect {
    Dialect::from_u8(DEFAULT_DIALECT.load(Ordering::Relaxed))
}

/// 设置全局默认 Dialect，返回旧值。
pub fn set_default_dialect(dialect: Dialect) -> Dialect {
    Dialect::from_u8(DEFAULT_DIALECT.swap(dialect as u8, Ordering::Relaxed))
}

/// 修改全局默认 Dialect 的 RAII guard（持有全局锁，避免并行测试互相干扰）。
pub struct DefaultDialectGuard {
    _lock: MutexGuard<'static, ()>,
    old: Dialect,
}

impl Drop for DefaultDialectGuard {
    fn drop(&mut self) {
        set_default_dialect(self.old);
    }
}

/// 在一个作用域内临时设置默认 Dialect，退出作用域后自动恢复。
pub fn set_default_dialect_scoped(dialect: Dialect) -> DefaultDialectGuard {
    let lock = DEFAULT_DIALECT_LOCK
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    let old = set_default_dialect(dialect);
    DefaultDialectGuard { _lock: lock, old }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Literal => "literal",
            Self::Positional => "positional",
            Self::Named => "named",
            Self::Indexed => "indexed",
        };
        f.write_str(s)
    }
}

impl FromStr for Dialect {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "positional" | "?" => Ok(Self::Positional),
            "named" | ":" => Ok(Self::Named),
            "indexed" | "ibatis" | "#{}" => Ok(Self::Indexed),
            _ => Err(BuilderError::UnsupportedDialect(s.to_string())),
        }
    }
}
