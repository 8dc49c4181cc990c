//! BuilderConfig：(命名策略, 参数方言) 二元组，是 builder/renderer 唯一的参数化入口。

use crate::dialect::{Dialect, default_dialect};
use crate::naming::{NamingPolicy, default_naming_policy};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuilderConfig {
    pub naming: NamingPolicy,
    pub dialect: Dialect,
}

macro_rules! config_ctors {
    ($($name:ident => ($naming:ident, $dialect:ident)),+ $(,)?) => {
        impl BuilderConfig {
            $(
                pub const fn $name() -> Self {
                    Self::new(NamingPolicy::$naming, Dialect::$dialect)
                }
            )+
        }
    };
}

config_ctors! {
    snake_lower_positional => (SnakeLower, Positional),
    snake_upper_positional => (SnakeUpper, Positional),
    camel_lower_positional => (CamelLower, Positional),
    snake_lower_named => (SnakeLower, Named),
    snake_upper_named => (SnakeUpper, Named),
    camel_lower_named => (CamelLower, Named),
    snake_lower_indexed => (SnakeLower, Indexed),
    snake_upper_indexed => (SnakeUpper, Indexed),
    camel_lower_indexed => (CamelLower, Indexed),
    snake_lower_literal => (SnakeLower, Literal),
    snake_upper_literal => (SnakeUpper, Literal),
    camel_lower_literal => (CamelLower, Literal),
}

impl BuilderConfig {
    pub const fn new(naming: NamingPolicy, dialect: Dialect) -> Self {
        Self { naming, dialect }
    }

    pub fn with_naming(mut self, naming: NamingPolicy) -> Self {
        self.naming = naming;
        self
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = dialect;
        self
    }
}

/// 读取全局默认的命名策略与方言。
impl Default for BuilderConfig {
    fn default() -> Self {
        Self::new(default_naming_policy(), default_dialect())
    }
}

impl fmt::Display for BuilderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.naming, self.dialect)
    }
}
