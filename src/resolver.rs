//! ColumnResolver：属性名 -> 列名。
//!
//! 解析顺序（先命中先返回）：
//! 1. 不带别名前缀且当前实体映射中存在 -> 映射值原样返回；
//! 2. `alias.prop` 且 `alias` 已登记 -> 在该别名的映射中查 `prop`，命中返回 `alias.column`；
//! 3. 保留字 -> 原样返回；
//! 4. 按命名策略机械转换整个名字（含前缀）。

use crate::catalog::{AliasMap, ColumnMap};
use crate::keywords::{self, ASTERISK};
use crate::naming::NamingPolicy;
use std::borrow::Cow;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ColumnResolver<'a> {
    policy: NamingPolicy,
    columns: Option<Arc<ColumnMap>>,
    aliases: &'a AliasMap,
}

impl<'a> ColumnResolver<'a> {
    pub fn new(
        policy: NamingPolicy,
        columns: Option<Arc<ColumnMap>>,
        aliases: &'a AliasMap,
    ) -> Self {
        Self {
            policy,
            columns,
            aliases,
        }
    }

    pub fn policy(&self) -> NamingPolicy {
        self.policy
    }

    /// 替换当前实体映射，返回旧值（子查询渲染期间临时切换）。
    pub(crate) fn swap_columns(&mut self, columns: Option<Arc<ColumnMap>>) -> Option<Arc<ColumnMap>> {
        std::mem::replace(&mut self.columns, columns)
    }

    pub fn resolve<'p>(&self, prop: &'p str) -> Cow<'p, str> {
        if prop == ASTERISK {
            return Cow::Borrowed(prop);
        }

        match prop.split_once('.') {
            None => {
                if let Some(col) = self.columns.as_ref().and_then(|m| m.get(prop)) {
                    return Cow::Owned(col.clone());
                }
            }
            Some((alias, rest)) => {
                if let Some(col) = self.aliases.get(alias).and_then(|m| m.get(rest)) {
                    return Cow::Owned(format!("{alias}.{col}"));
                }
            }
        }

        if keywords::is_reserved(prop) {
            return Cow::Borrowed(prop);
        }

        Cow::Owned(self.policy.apply(prop))
    }
}
