//! NamingPolicy：没有显式列名映射时，属性名到列名的机械转换。

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Mutex, MutexGuard};

/// 属性名 -> 列名的大小写转换策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NamingPolicy {
    /// `firstName` -> `first_name`
    #[default]
    SnakeLower,
    /// `firstName` -> `FIRST_NAME`
    SnakeUpper,
    /// `firstName` -> `firstName`；`first_name` -> `firstName`
    CamelLower,
}

static DEFAULT_NAMING: AtomicU8 = AtomicU8::new(NamingPolicy::SnakeLower as u8);
static DEFAULT_NAMING_LOCK: Mutex<()> = Mutex::new(());

impl NamingPolicy {
    fn from_u8(v: u8) -> Self {
        match v {
            0 => Self::SnakeLower,
            1 => Self::SnakeUpper,
            2 => Self::CamelLower,
            _ => Self::SnakeLower,
        }
    }

    /// 机械转换；不查询任何映射，也不识别关键字。
    pub fn apply(self, name: &str) -> String {
        match self {
            Self::SnakeLower => to_snake(name, false),
            Self::SnakeUpper => to_snake(name, true),
            Self::CamelLower => to_lower_camel(name),
        }
    }
}

/// 在 camelCase 边界插入 `_`（`aB`、`a1B`、`ABc`），再统一大小写。
fn to_snake(s: &str, upper: bool) -> String {
    let mut out = String::with_capacity(s.len() + 8);
    let chars: Vec<char> = s.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars
                .get(i + 1)
                .map(|n| n.is_ascii_lowercase())
                .unwrap_or(false);
            if prev.is_ascii_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_ascii_uppercase() && next_is_lower)
            {
                out.push('_');
            }
        }
        out.push(if upper {
            c.to_ascii_uppercase()
        } else {
            c.to_ascii_lowercase()
        });
    }

    out
}

fn to_lower_camel(s: &str) -> String {
    let has_lower = s.chars().any(|c| c.is_ascii_lowercase());
    if !s.contains('_') && has_lower {
        // 已经是 camelCase（或 PascalCase）：只把首字母降为小写
        let mut chars = s.chars();
        return match chars.next() {
            Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
            None => String::new(),
        };
    }

    let mut out = String::with_capacity(s.len());
    let mut upper_next = false;
    for c in s.chars() {
        if c == '_' {
            upper_next = !out.is_empty() && !out.ends_with('.');
            continue;
        }
        if upper_next {
            out.push(c.to_ascii_uppercase());
            upper_next = false;
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

/// 获取当前全局默认 NamingPolicy。
pub fn default_naming_policy() -> NamingPolicy {
    NamingPolicy::from_u8(DEFAULT_NAMING.load(Ordering::Relaxed))
}

/// 设置全局默认 NamingPolicy，返回旧值。
pub fn set_default_naming_policy(policy: NamingPolicy) -> NamingPolicy {
    NamingPolicy::from_u8(DEFAULT_NAMING.swap(policy as u8, Ordering::Relaxed))
}

pub struct DefaultNamingGuard {
    _lock: MutexGuard<'static, ()>,
    old: NamingPolicy,
}

impl Drop for DefaultNamingGuard {
    fn drop(&mut self) {
        set_default_naming_policy(self.old);
    }
}

/// 在一个作用域内临时设置默认 NamingPolicy，退出作用域后自动恢复。
pub fn set_default_naming_policy_scoped(policy: NamingPolicy) -> DefaultNamingGuard {
    let lock = DEFAULT_NAMING_LOCK
        .lock()
        .unwrap_or_else(|e| e.into_inner());
    let old = set_default_naming_policy(policy);
    DefaultNamingGuard { _lock: lock, old }
}

impl fmt::Display for NamingPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::SnakeLower => "snake_lower",
            Self::SnakeUpper => "snake_upper",
            Self::CamelLower => "camel_lower",
        };
        f.write_str(s)
    }
}

impl FromStr for NamingPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "snake_lower" | "lower_case_with_underscore" => Ok(Self::SnakeLower),
            "snake_upper" | "upper_case_with_underscore" => Ok(Self::SnakeUpper),
            "camel_lower" | "lower_camel_case" => Ok(Self::CamelLower),
            _ => Err(format!("unknown naming policy {s:?}")),
        }
    }
}
