//! 条件树 -> SQL 文本 + 有序参数列表。
//!
//! 每次顶层渲染创建一个新的 [`RenderState`]，渲染结束后取出 `(sql, parameters)`
//! 即丢弃；状态从不跨调用共享。

use crate::catalog::{AliasMap, ColumnMap, PropertyCatalog, default_catalog};
use crate::condition::{Condition, Junction, Operand, SubQuery, SubQueryEntity};
use crate::config::BuilderConfig;
use crate::dialect::Dialect;
use crate::entity::{EntityMeta, SqlEntity};
use crate::error::{BuilderError, Result};
use crate::expr::{self, TokenKind};
use crate::keywords;
use crate::literal::encode_value;
use crate::resolver::ColumnResolver;
use crate::value::SqlValue;
use std::sync::Arc;

/// 渲染结果。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SqlParts {
    pub sql: String,
    pub parameters: Vec<SqlValue>,
}

impl SqlParts {
    pub fn into_pair(self) -> (String, Vec<SqlValue>) {
        (self.sql, self.parameters)
    }
}

pub(crate) struct RenderState<'a> {
    pub(crate) sql: String,
    pub(crate) parameters: Vec<SqlValue>,
    pub(crate) dialect: Dialect,
    pub(crate) resolver: ColumnResolver<'a>,
    pub(crate) catalog: &'a dyn PropertyCatalog,
}

impl<'a> RenderState<'a> {
    pub(crate) fn new(
        dialect: Dialect,
        resolver: ColumnResolver<'a>,
        catalog: &'a dyn PropertyCatalog,
    ) -> Self {
        Self {
            sql: String::new(),
            parameters: Vec::new(),
            dialect,
            resolver,
            catalog,
        }
    }

    pub(crate) fn finish(self) -> SqlParts {
        SqlParts {
            sql: self.sql,
            parameters: self.parameters,
        }
    }

    pub(crate) fn push(&mut self, s: &str) {
        self.sql.push_str(s);
    }

    pub(crate) fn push_column(&mut self, prop: &str) {
        let col = self.resolver.resolve(prop);
        self.sql.push_str(&col);
    }

    /// 按 `sep` 连接，逐项调用 `f`。
    pub(crate) fn push_joined<T>(
        &mut self,
        items: &[T],
        sep: &str,
        mut f: impl FnMut(&mut Self, &T) -> Result<()>,
    ) -> Result<()> {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.sql.push_str(sep);
            }
            f(self, item)?;
        }
        Ok(())
    }

    /// 叶子值：按方言输出占位符/字面量，并维护参数列表。
    pub(crate) fn emit_operand(&mut self, key: &str, operand: &Operand) -> Result<()> {
        match operand {
            Operand::Value(v) => {
                self.emit_value(key, v.clone());
                Ok(())
            }
            Operand::Valuer(v) => {
                let v = v.value()?;
                self.emit_value(key, v);
                Ok(())
            }
            Operand::Condition(c) => self.render_nested(c),
            Operand::Placeholder => {
                self.dialect.write_placeholder(key, &mut self.sql);
                Ok(())
            }
        }
    }

    fn emit_value(&mut self, key: &str, v: SqlValue) {
        if self.dialect.is_parameterized() {
            self.dialect.write_placeholder(key, &mut self.sql);
            self.parameters.push(v);
        } else {
            encode_value(&mut self.sql, &v);
        }
    }

    /// 嵌套位置：子查询加括号，其余直接渲染。
    fn render_nested(&mut self, cond: &Condition) -> Result<()> {
        if matches!(cond, Condition::SubQuery(_)) {
            self.push("(");
            self.render(cond)?;
            self.push(")");
            Ok(())
        } else {
            self.render(cond)
        }
    }

    pub(crate) fn render(&mut self, cond: &Condition) -> Result<()> {
        match cond {
            Condition::Comparison { prop, op, value } => {
                self.push_column(prop);
                self.push(" ");
                self.push(op.as_str());
                self.push(" ");
                self.emit_operand(prop, value)
            }
            Condition::Between {
                prop,
                min,
                max,
                negated,
            } => {
                self.push_column(prop);
                self.push(" ");
                self.push(if *negated {
                    keywords::NOT_BETWEEN
                } else {
                    keywords::BETWEEN
                });
                self.push(" ");
                let cap = capitalize(prop);
                self.emit_operand(&format!("min{cap}"), min)?;
                self.push(" AND ");
                self.emit_operand(&format!("max{cap}"), max)
            }
            Condition::In {
                prop,
                values,
                negated,
            } => {
                if values.is_empty() {
                    self.push(if *negated { "0 = 0" } else { "0 = 1" });
                    return Ok(());
                }
                self.push_column(prop);
                self.push(if *negated { " NOT IN (" } else { " IN (" });
                let keyed = self.dialect.uses_keys();
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        self.push(", ");
                    }
                    if keyed {
                        self.emit_operand(&format!("{prop}{}", i + 1), v)?;
                    } else {
                        self.emit_operand(prop, v)?;
                    }
                }
                self.push(")");
                Ok(())
            }
            Condition::InSubQuery {
                prop,
                sub_query,
                negated,
            } => {
                self.push_column(prop);
                self.push(if *negated { " NOT IN (" } else { " IN (" });
                self.render(sub_query)?;
                self.push(")");
                Ok(())
            }
            Condition::Junction(j) => self.render_junction(j),
            Condition::Cell { keyword, inner } => {
                self.push(" ");
                self.push(keyword.as_str());
                self.push(" ");
                if keyword.is_unary() {
                    self.push("(");
                    self.render(inner)?;
                    self.push(")");
                    Ok(())
                } else {
                    self.render_nested(inner)
                }
            }
            Condition::Raw(text) => {
                self.render_raw(text);
                Ok(())
            }
            Condition::SubQuery(sq) => self.render_sub_query(sq),
        }
    }

    fn render_junction(&mut self, j: &Junction) -> Result<()> {
        if let [only] = j.children() {
            return self.render(only);
        }
        let sep = format!(" {} ", j.op().as_str());
        self.push_joined(j.children(), &sep, |st, child| {
            st.push("(");
            st.render(child)?;
            st.push(")");
            Ok(())
        })
    }

    /// 原始表达式：首字符不是 ASCII 字母的词、以及后面紧跟 `(` 的词（函数名）原样输出，
    /// 其余词按列名解析。
    pub(crate) fn render_raw(&mut self, text: &str) {
        let tokens = expr::tokenize(text);
        for (i, t) in tokens.iter().enumerate() {
            let passthrough = t.kind != TokenKind::Word
                || !t.text.starts_with(|c: char| c.is_ascii_alphabetic())
                || expr::is_function_name(&tokens, i);
            if passthrough {
                self.push(t.text);
            } else {
                self.push_column(t.text);
            }
        }
    }

    /// 投影列：列名与属性名不同时输出 `col AS "prop"`；`*`、函数与带空白的表达式按原始表达式处理。
    pub(crate) fn render_projection(&mut self, props: &[String]) -> Result<()> {
        self.push_joined(props, ", ", |st, prop| {
            if is_expression(prop) {
                st.render_raw(prop);
                return Ok(());
            }
            let col = st.resolver.resolve(prop).into_owned();
            st.push(&col);
            if col != *prop {
                st.push(" AS \"");
                st.push(prop);
                st.push("\"");
            }
            Ok(())
        })
    }

    fn render_sub_query(&mut self, sq: &SubQuery) -> Result<()> {
        let (entity, props, condition) = match sq {
            SubQuery::Sql(sql) => {
                self.push(sql);
                return Ok(());
            }
            SubQuery::Select {
                entity,
                props,
                condition,
            } => (entity, props, condition),
        };

        let policy = self.resolver.policy();
        let (table, columns, props) = match entity {
            SubQueryEntity::Entity(meta) => {
                let meta: &'static EntityMeta = *meta;
                let props = if props.is_empty() {
                    self.catalog.select_props(meta)
                } else {
                    props.clone()
                };
                (
                    self.catalog.table_name(meta, policy),
                    Some(self.catalog.column_map(meta, policy)),
                    props,
                )
            }
            SubQueryEntity::Table(t) => {
                if props.is_empty() {
                    return Err(BuilderError::MissingSelectClause);
                }
                (t.clone(), None, props.clone())
            }
        };

        let saved = self.resolver.swap_columns(columns);
        let rendered = self.render_select_body(&table, &props, condition.as_deref());
        self.resolver.swap_columns(saved);
        rendered
    }

    fn render_select_body(
        &mut self,
        table: &str,
        props: &[String],
        condition: Option<&Condition>,
    ) -> Result<()> {
        self.push(keywords::SELECT);
        self.push(" ");
        self.render_projection(props)?;
        self.push(" ");
        self.push(keywords::FROM);
        self.push(" ");
        self.push(table);
        match condition {
            None => Ok(()),
            Some(c @ Condition::Cell { .. }) => self.render(c),
            Some(c) => {
                self.push(" ");
                self.push(keywords::WHERE);
                self.push(" ");
                self.render(c)
            }
        }
    }
}

pub(crate) fn is_expression(prop: &str) -> bool {
    prop == keywords::ASTERISK || prop.contains('(') || prop.chars().any(char::is_whitespace)
}

/// 首字符大写，其余原样。带点的属性整体参与拼接：`a.age` 的区间键是
/// `minA.age` / `maxA.age`，与 Named 方言下 `:a.id` 一样按原文输出。
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 列名映射的来源：声明的实体（渲染时向 catalog 查询）或现成的映射。
#[derive(Debug, Clone)]
pub(crate) enum ColumnSource {
    Entity(&'static EntityMeta),
    Columns(Arc<ColumnMap>),
}

impl ColumnSource {
    pub(crate) fn materialize(
        &self,
        catalog: &dyn PropertyCatalog,
        config: BuilderConfig,
    ) -> Arc<ColumnMap> {
        match self {
            Self::Entity(meta) => catalog.column_map(*meta, config.naming),
            Self::Columns(m) => m.clone(),
        }
    }
}

/// 渲染一棵独立的条件树。
///
/// ```ignore
/// let parts = Renderer::new(BuilderConfig::snake_lower_named())
///     .entity::<Account>()
///     .render(&Condition::eq("firstName", "Jon"))?;
/// assert_eq!(parts.sql, "first_name = :firstName");
/// ```
#[derive(Debug, Clone)]
pub struct Renderer {
    config: BuilderConfig,
    catalog: Arc<dyn PropertyCatalog>,
    columns: Option<ColumnSource>,
    aliases: Vec<(String, ColumnSource)>,
}

impl Renderer {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            config,
            catalog: default_catalog(),
            columns: None,
            aliases: Vec::new(),
        }
    }

    pub fn catalog(mut self, catalog: Arc<dyn PropertyCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    /// 当前实体：未带别名的属性先查它的列名映射。
    pub fn entity<T: SqlEntity>(mut self) -> Self {
        self.columns = Some(ColumnSource::Entity(T::meta()));
        self
    }

    pub fn column_map(mut self, columns: ColumnMap) -> Self {
        self.columns = Some(ColumnSource::Columns(Arc::new(columns)));
        self
    }

    pub fn alias(mut self, alias: impl Into<String>, columns: ColumnMap) -> Self {
        self.aliases
            .push((alias.into(), ColumnSource::Columns(Arc::new(columns))));
        self
    }

    pub fn alias_entity<T: SqlEntity>(mut self, alias: impl Into<String>) -> Self {
        self.aliases
            .push((alias.into(), ColumnSource::Entity(T::meta())));
        self
    }

    pub fn render(&self, cond: &Condition) -> Result<SqlParts> {
        let catalog = self.catalog.as_ref();
        let columns = self
            .columns
            .as_ref()
            .map(|c| c.materialize(catalog, self.config));
        let aliases: AliasMap = self
            .aliases
            .iter()
            .map(|(a, c)| (a.clone(), c.materialize(catalog, self.config)))
            .collect();

        let resolver = ColumnResolver::new(self.config.naming, columns, &aliases);
        let mut state = RenderState::new(self.config.dialect, resolver, catalog);
        state.render(cond)?;
        let parts = state.finish();
        tracing::debug!(
            sql = %parts.sql,
            parameters = parts.parameters.len(),
            "rendered condition"
        );
        Ok(parts)
    }
}
