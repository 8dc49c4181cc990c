//! SqlBuilder：按调用顺序记录子句，`build()` 时用一个新的渲染状态一次性输出。
//!
//! 同一个类型覆盖查询、插入、更新、删除四种模式；条件部分全部复用
//! [`Condition`] 的渲染逻辑，列名解析复用 [`ColumnResolver`](crate::resolver::ColumnResolver)。

use crate::catalog::{AliasMap, PropertyCatalog, default_catalog};
use crate::condition::{Condition, Keyword, Operand};
use crate::config::BuilderConfig;
use crate::dialect::Dialect;
use crate::entity::SqlEntity;
use crate::error::{BuilderError, Result};
use crate::keywords;
use crate::macros::IntoProps;
use crate::render::{ColumnSource, RenderState, SqlParts};
use crate::resolver::ColumnResolver;
use crate::value::SqlValue;
use std::sync::Arc;

/// builder 当前的语句类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Query,
    Add,
    Update,
    Delete,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Query => "Query",
            Self::Add => "Add",
            Self::Update => "Update",
            Self::Delete => "Delete",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Plain,
    Inner,
    Left,
    Right,
    Full,
    Cross,
}

impl JoinKind {
    fn as_str(self) -> &'static str {
        match self {
            Self::Plain => "JOIN",
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
            Self::Cross => "CROSS JOIN",
        }
    }
}

const QUERY: &[Mode] = &[Mode::Query];
const FILTERED: &[Mode] = &[Mode::Query, Mode::Update, Mode::Delete];

#[derive(Debug, Clone)]
enum Segment {
    Select(Vec<String>),
    From(String),
    Join { kind: JoinKind, table: String },
    /// ON / USING / WHERE / GROUP BY / HAVING 等带关键字的条件。
    Clause(Condition),
    OrderBy(Vec<String>),
    Limit(u64),
    Offset(u64),
    Union { all: bool, other: Box<SqlBuilder> },
    ForUpdate,
    Insert {
        table: Option<String>,
        columns: Vec<(String, Operand)>,
    },
    Update(String),
    Set(Vec<(String, Operand)>),
    DeleteFrom(String),
}

/// 链式 SQL builder。
///
/// ```ignore
/// let mut sb = SqlBuilder::new(BuilderConfig::snake_lower_named());
/// sb.select_from::<Account>()
///     .where_(Condition::eq("firstName", "Jon"))
///     .order_by_desc("createdAt")
///     .limit(10);
/// let parts = sb.build()?;
/// ```
#[derive(Debug, Clone)]
pub struct SqlBuilder {
    config: BuilderConfig,
    catalog: Arc<dyn PropertyCatalog>,
    mode: Mode,
    distinct: bool,
    columns: Option<ColumnSource>,
    aliases: Vec<(String, ColumnSource)>,
    segments: Vec<Segment>,
    /// 第一次在错误模式下调用的子句，`build()` 时返回。
    error: Option<BuilderError>,
}

impl Default for SqlBuilder {
    fn default() -> Self {
        Self::new(BuilderConfig::default())
    }
}

impl SqlBuilder {
    pub fn new(config: BuilderConfig) -> Self {
        Self {
            config,
            catalog: default_catalog(),
            mode: Mode::Query,
            distinct: false,
            columns: None,
            aliases: Vec::new(),
            segments: Vec::new(),
            error: None,
        }
    }

    pub fn with_catalog(mut self, catalog: Arc<dyn PropertyCatalog>) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn config(&self) -> BuilderConfig {
        self.config
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    fn invalid(&self, operation: &'static str) -> BuilderError {
        BuilderError::InvalidOperation {
            operation,
            mode: self.mode.as_str(),
        }
    }

    fn reject(&mut self, operation: &'static str) {
        if self.error.is_none() {
            self.error = Some(self.invalid(operation));
        }
    }

    /// 当前模式是否接受该子句；不接受时记下错误，子句被丢弃。
    fn allow(&mut self, operation: &'static str, modes: &[Mode]) -> bool {
        if modes.contains(&self.mode) {
            return true;
        }
        self.reject(operation);
        false
    }

    /// 第一个子句确定模式，之后只能停留在同一模式。
    fn enter(&mut self, operation: &'static str, mode: Mode) -> bool {
        if self.mode == mode || self.segments.is_empty() {
            self.mode = mode;
            return true;
        }
        self.reject(operation);
        false
    }

    fn use_entity<T: SqlEntity>(&mut self) {
        self.columns = Some(ColumnSource::Entity(T::meta()));
    }

    fn entity_table<T: SqlEntity>(&self) -> String {
        self.catalog.table_name(T::meta(), self.config.naming)
    }

    fn has_projection(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Select(props) if !props.is_empty()))
    }

    // ---- Query ----
    //
    // 查询子句只在 Query 模式下有效；在其它模式下调用会被记录为
    // `InvalidOperation`，由 `build()` 返回。

    /// 追加投影列；多次调用合并到同一个 SELECT。
    pub fn select(&mut self, props: impl IntoProps) -> &mut Self {
        if !self.allow("select", QUERY) {
            return self;
        }
        let props = props.into_props();
        let existing = self.segments.iter_mut().find_map(|s| match s {
            Segment::Select(existing) => Some(existing),
            _ => None,
        });
        match existing {
            Some(existing) => existing.extend(props),
            None => self.segments.push(Segment::Select(props)),
        }
        self
    }

    /// 投影实体的全部列属性，并以该实体作为列名映射。
    pub fn select_entity<T: SqlEntity>(&mut self) -> &mut Self {
        if !self.allow("select", QUERY) {
            return self;
        }
        self.use_entity::<T>();
        let props = self.catalog.select_props(T::meta());
        self.select(props)
    }

    /// `SELECT <T 的列> FROM <T 的表>`。
    pub fn select_from<T: SqlEntity>(&mut self) -> &mut Self {
        if !self.allow("select", QUERY) {
            return self;
        }
        self.select_entity::<T>();
        let table = self.entity_table::<T>();
        self.segments.push(Segment::From(table));
        self
    }

    pub fn distinct(&mut self) -> &mut Self {
        if !self.allow("distinct", QUERY) {
            return self;
        }
        self.distinct = true;
        self
    }

    /// 之前没有投影列时返回 `MissingSelectClause`。
    pub fn from(&mut self, table: impl Into<String>) -> Result<&mut Self> {
        if self.mode != Mode::Query {
            return Err(self.invalid("from"));
        }
        if !self.has_projection() {
            return Err(BuilderError::MissingSelectClause);
        }
        self.segments.push(Segment::From(table.into()));
        Ok(self)
    }

    pub fn from_entity<T: SqlEntity>(&mut self) -> Result<&mut Self> {
        let table = self.entity_table::<T>();
        self.from(table)?;
        self.use_entity::<T>();
        Ok(self)
    }

    /// `FROM <T 的表> alias`，并登记别名；`alias.prop` 按 T 的映射解析。
    pub fn from_entity_as<T: SqlEntity>(&mut self, alias: impl Into<String>) -> Result<&mut Self> {
        let alias = alias.into();
        let table = format!("{} {alias}", self.entity_table::<T>());
        self.from(table)?;
        if self.columns.is_none() {
            self.use_entity::<T>();
        }
        self.aliases.push((alias, ColumnSource::Entity(T::meta())));
        Ok(self)
    }

    fn push_join(&mut self, kind: JoinKind, table: String) -> &mut Self {
        if !self.allow("join", QUERY) {
            return self;
        }
        self.segments.push(Segment::Join { kind, table });
        self
    }

    pub fn join(&mut self, table: impl Into<String>) -> &mut Self {
        self.push_join(JoinKind::Plain, table.into())
    }

    pub fn inner_join(&mut self, table: impl Into<String>) -> &mut Self {
        self.push_join(JoinKind::Inner, table.into())
    }

    pub fn left_join(&mut self, table: impl Into<String>) -> &mut Self {
        self.push_join(JoinKind::Left, table.into())
    }

    pub fn right_join(&mut self, table: impl Into<String>) -> &mut Self {
        self.push_join(JoinKind::Right, table.into())
    }

    pub fn full_join(&mut self, table: impl Into<String>) -> &mut Self {
        self.push_join(JoinKind::Full, table.into())
    }

    pub fn cross_join(&mut self, table: impl Into<String>) -> &mut Self {
        self.push_join(JoinKind::Cross, table.into())
    }

    pub fn join_entity_as<T: SqlEntity>(
        &mut self,
        kind: JoinKind,
        alias: impl Into<String>,
    ) -> &mut Self {
        if !self.allow("join", QUERY) {
            return self;
        }
        let alias = alias.into();
        let table = format!("{} {alias}", self.entity_table::<T>());
        self.aliases.push((alias, ColumnSource::Entity(T::meta())));
        self.push_join(kind, table)
    }

    pub fn on(&mut self, cond: Condition) -> &mut Self {
        if !self.allow("on", QUERY) {
            return self;
        }
        self.segments.push(Segment::Clause(Condition::on(cond)));
        self
    }

    pub fn using(&mut self, props: impl IntoProps) -> &mut Self {
        if !self.allow("using", QUERY) {
            return self;
        }
        self.segments.push(Segment::Clause(Condition::using(props)));
        self
    }

    /// 多次调用以 AND 合并到第一个 WHERE。Query、Update、Delete 模式可用。
    pub fn where_(&mut self, cond: Condition) -> &mut Self {
        if !self.allow("where", FILTERED) {
            return self;
        }
        let existing = self.segments.iter_mut().find_map(|s| match s {
            Segment::Clause(Condition::Cell {
                keyword: Keyword::Where,
                inner,
            }) => Some(inner),
            _ => None,
        });
        match existing {
            Some(inner) => {
                let prev = std::mem::replace(inner.as_mut(), Condition::Raw(String::new()));
                **inner = prev.and_also(cond);
            }
            None => self.segments.push(Segment::Clause(Condition::where_(cond))),
        }
        self
    }

    pub fn group_by(&mut self, props: impl IntoProps) -> &mut Self {
        if !self.allow("group by", QUERY) {
            return self;
        }
        self.segments.push(Segment::Clause(Condition::group_by(props)));
        self
    }

    pub fn having(&mut self, cond: Condition) -> &mut Self {
        if !self.allow("having", QUERY) {
            return self;
        }
        self.segments.push(Segment::Clause(Condition::having(cond)));
        self
    }

    fn push_order(&mut self, items: Vec<String>) -> &mut Self {
        if !self.allow("order by", QUERY) {
            return self;
        }
        let existing = self.segments.iter_mut().find_map(|s| match s {
            Segment::OrderBy(existing) => Some(existing),
            _ => None,
        });
        match existing {
            Some(existing) => existing.extend(items),
            None => self.segments.push(Segment::OrderBy(items)),
        }
        self
    }

    pub fn order_by(&mut self, props: impl IntoProps) -> &mut Self {
        self.push_order(props.into_props())
    }

    pub fn order_by_asc(&mut self, prop: impl Into<String>) -> &mut Self {
        self.push_order(vec![format!("{} {}", prop.into(), keywords::ASC)])
    }

    pub fn order_by_desc(&mut self, prop: impl Into<String>) -> &mut Self {
        self.push_order(vec![format!("{} {}", prop.into(), keywords::DESC)])
    }

    pub fn limit(&mut self, limit: u64) -> &mut Self {
        if !self.allow("limit", QUERY) {
            return self;
        }
        self.segments.push(Segment::Limit(limit));
        self
    }

    pub fn offset(&mut self, offset: u64) -> &mut Self {
        if !self.allow("offset", QUERY) {
            return self;
        }
        self.segments.push(Segment::Offset(offset));
        self
    }

    /// 另一个查询按本 builder 的方言渲染后拼接，参数依次追加。
    pub fn union(&mut self, other: SqlBuilder) -> &mut Self {
        if !self.allow("union", QUERY) {
            return self;
        }
        self.segments.push(Segment::Union {
            all: false,
            other: Box::new(other),
        });
        self
    }

    pub fn union_all(&mut self, other: SqlBuilder) -> &mut Self {
        if !self.allow("union all", QUERY) {
            return self;
        }
        self.segments.push(Segment::Union {
            all: true,
            other: Box::new(other),
        });
        self
    }

    pub fn for_update(&mut self) -> &mut Self {
        if !self.allow("for update", QUERY) {
            return self;
        }
        self.segments.push(Segment::ForUpdate);
        self
    }

    // ---- Add ----

    fn insert_columns(&mut self, columns: Vec<(String, Operand)>) -> &mut Self {
        if !self.enter("insert", Mode::Add) {
            return self;
        }
        let existing = self.segments.iter_mut().find_map(|s| match s {
            Segment::Insert { columns, .. } => Some(columns),
            _ => None,
        });
        match existing {
            Some(existing) => existing.extend(columns),
            None => self.segments.push(Segment::Insert {
                table: None,
                columns,
            }),
        }
        self
    }

    /// 插入列，值位置输出未绑定的占位符。
    pub fn insert(&mut self, props: impl IntoProps) -> &mut Self {
        let columns = props
            .into_props()
            .into_iter()
            .map(|p| (p, Operand::Placeholder))
            .collect();
        self.insert_columns(columns)
    }

    pub fn insert_values<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>) -> &mut Self
    where
        K: Into<String>,
        V: Into<Operand>,
    {
        let columns = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.insert_columns(columns)
    }

    /// `INSERT INTO <T 的表> (<T 的列>) VALUES (<占位符>)`。
    pub fn insert_into_entity<T: SqlEntity>(&mut self) -> &mut Self {
        if !self.enter("insert", Mode::Add) {
            return self;
        }
        let props = self.catalog.select_props(T::meta());
        self.use_entity::<T>();
        self.insert(props);
        let table = self.entity_table::<T>();
        self.set_insert_table(table);
        self
    }

    fn set_insert_table(&mut self, table: String) {
        for s in &mut self.segments {
            if let Segment::Insert { table: t, .. } = s {
                *t = Some(table);
                return;
            }
        }
    }

    /// 只能在 `insert*` 之后调用。
    pub fn into_table(&mut self, table: impl Into<String>) -> Result<&mut Self> {
        if self.mode != Mode::Add {
            return Err(self.invalid("into"));
        }
        self.set_insert_table(table.into());
        Ok(self)
    }

    pub fn into_entity<T: SqlEntity>(&mut self) -> Result<&mut Self> {
        if self.mode != Mode::Add {
            return Err(self.invalid("into"));
        }
        let table = self.entity_table::<T>();
        self.use_entity::<T>();
        self.set_insert_table(table);
        Ok(self)
    }

    // ---- Update ----

    pub fn update(&mut self, table: impl Into<String>) -> &mut Self {
        if !self.enter("update", Mode::Update) {
            return self;
        }
        self.segments.push(Segment::Update(table.into()));
        self
    }

    pub fn update_entity<T: SqlEntity>(&mut self) -> &mut Self {
        if !self.enter("update", Mode::Update) {
            return self;
        }
        let table = self.entity_table::<T>();
        self.use_entity::<T>();
        self.update(table)
    }

    fn set_columns(&mut self, columns: Vec<(String, Operand)>) -> Result<&mut Self> {
        if self.mode != Mode::Update {
            return Err(self.invalid("set"));
        }
        let existing = self.segments.iter_mut().find_map(|s| match s {
            Segment::Set(existing) => Some(existing),
            _ => None,
        });
        match existing {
            Some(existing) => existing.extend(columns),
            None => self.segments.push(Segment::Set(columns)),
        }
        Ok(self)
    }

    /// `SET col = <占位符>`。
    pub fn set(&mut self, props: impl IntoProps) -> Result<&mut Self> {
        let columns = props
            .into_props()
            .into_iter()
            .map(|p| (p, Operand::Placeholder))
            .collect();
        self.set_columns(columns)
    }

    pub fn set_values<K, V>(&mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Result<&mut Self>
    where
        K: Into<String>,
        V: Into<Operand>,
    {
        let columns = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.set_columns(columns)
    }

    // ---- Delete ----

    pub fn delete_from(&mut self, table: impl Into<String>) -> &mut Self {
        if !self.enter("delete", Mode::Delete) {
            return self;
        }
        self.segments.push(Segment::DeleteFrom(table.into()));
        self
    }

    pub fn delete_from_entity<T: SqlEntity>(&mut self) -> &mut Self {
        if !self.enter("delete", Mode::Delete) {
            return self;
        }
        let table = self.entity_table::<T>();
        self.use_entity::<T>();
        self.delete_from(table)
    }

    // ---- build ----

    fn validate(&self) -> Result<()> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        match self.mode {
            Mode::Query if !self.has_projection() => Err(BuilderError::MissingSelectClause),
            Mode::Add => {
                let has_table = self
                    .segments
                    .iter()
                    .any(|s| matches!(s, Segment::Insert { table: Some(_), .. }));
                if has_table {
                    Ok(())
                } else {
                    Err(self.invalid("build without into"))
                }
            }
            _ => Ok(()),
        }
    }

    pub fn build(&self) -> Result<SqlParts> {
        self.build_with(self.config.dialect)
    }

    pub fn sql(&self) -> Result<String> {
        self.build().map(|p| p.sql)
    }

    fn build_with(&self, dialect: Dialect) -> Result<SqlParts> {
        self.validate()?;

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
        let mut state = RenderState::new(dialect, resolver, catalog);
        for segment in &self.segments {
            self.render_segment(&mut state, segment)?;
        }

        let parts = state.finish();
        tracing::debug!(
            mode = self.mode.as_str(),
            sql = %parts.sql,
            parameters = parts.parameters.len(),
            "built statement"
        );
        Ok(parts)
    }

    fn render_segment(&self, st: &mut RenderState<'_>, segment: &Segment) -> Result<()> {
        match segment {
            Segment::Select(props) => {
                st.push(keywords::SELECT);
                st.push(" ");
                if self.distinct {
                    st.push(keywords::DISTINCT);
                    st.push(" ");
                }
                st.render_projection(props)
            }
            Segment::From(table) => {
                st.push(" ");
                st.push(keywords::FROM);
                st.push(" ");
                st.push(table);
                Ok(())
            }
            Segment::Join { kind, table } => {
                st.push(" ");
                st.push(kind.as_str());
                st.push(" ");
                st.push(table);
                Ok(())
            }
            Segment::Clause(cond) => st.render(cond),
            Segment::OrderBy(items) => {
                st.push(" ");
                st.push(keywords::ORDER_BY);
                st.push(" ");
                st.render_raw(&items.join(", "));
                Ok(())
            }
            Segment::Limit(n) => {
                st.push(" ");
                st.push(keywords::LIMIT);
                st.push(" ");
                st.emit_operand("limit", &Operand::Value(SqlValue::U64(*n)))
            }
            Segment::Offset(n) => {
                st.push(" ");
                st.push(keywords::OFFSET);
                st.push(" ");
                st.emit_operand("offset", &Operand::Value(SqlValue::U64(*n)))
            }
            Segment::Union { all, other } => {
                let sub = other.build_with(st.dialect)?;
                st.push(" ");
                st.push(if *all {
                    keywords::UNION_ALL
                } else {
                    keywords::UNION
                });
                st.push(" ");
                st.push(&sub.sql);
                st.parameters.extend(sub.parameters);
                Ok(())
            }
            Segment::ForUpdate => {
                st.push(" ");
                st.push(keywords::FOR_UPDATE);
                Ok(())
            }
            Segment::Insert { table, columns } => {
                st.push(keywords::INSERT_INTO);
                st.push(" ");
                st.push(table.as_deref().unwrap_or_default());
                st.push(" (");
                st.push_joined(columns, ", ", |st, (prop, _)| {
                    st.push_column(prop);
                    Ok(())
                })?;
                st.push(") ");
                st.push(keywords::VALUES);
                st.push(" (");
                st.push_joined(columns, ", ", |st, (prop, value)| {
                    st.emit_operand(prop, value)
                })?;
                st.push(")");
                Ok(())
            }
            Segment::Update(table) => {
                st.push(keywords::UPDATE);
                st.push(" ");
                st.push(table);
                Ok(())
            }
            Segment::Set(columns) => {
                st.push(" ");
                st.push(keywords::SET);
                st.push(" ");
                st.push_joined(columns, ", ", |st, (prop, value)| {
                    st.push_column(prop);
                    st.push(" = ");
                    st.emit_operand(prop, value)
                })
            }
            Segment::DeleteFrom(table) => {
                st.push(keywords::DELETE_FROM);
                st.push(" ");
                st.push(table);
                Ok(())
            }
        }
    }
}
