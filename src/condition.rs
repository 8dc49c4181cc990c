//! Condition：封闭的条件树（比较、BETWEEN、IN、子查询、AND/OR、关键字包装、原始表达式）。
//!
//! 条件一旦构造即不可变；非法的结构（空 junction、IN 的右侧不是子查询）在构造时就失败。

use crate::entity::{EntityMeta, SqlEntity};
use crate::error::{BuilderError, Result};
use crate::keywords;
use crate::macros::IntoProps;
use crate::value::SqlValue;
use crate::valuer::SqlValuer;

/// 二元比较运算符。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
    Like,
    NotLike,
    Is,
    IsNot,
}

impl Operator {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Like => "LIKE",
            Self::NotLike => "NOT LIKE",
            Self::Is => "IS",
            Self::IsNot => "IS NOT",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JunctionOp {
    And,
    Or,
}

impl JunctionOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::And => keywords::AND,
            Self::Or => keywords::OR,
        }
    }
}

/// Cell 的前缀关键字。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Keyword {
    Where,
    Having,
    GroupBy,
    OrderBy,
    Not,
    Exists,
    NotExists,
    On,
    Using,
    Other(String),
}

impl Keyword {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Where => keywords::WHERE,
            Self::Having => keywords::HAVING,
            Self::GroupBy => keywords::GROUP_BY,
            Self::OrderBy => keywords::ORDER_BY,
            Self::Not => keywords::NOT,
            Self::Exists => keywords::EXISTS,
            Self::NotExists => keywords::NOT_EXISTS,
            Self::On => keywords::ON,
            Self::Using => keywords::USING,
            Self::Other(s) => s,
        }
    }

    /// 一元运算符：内层整体加括号。
    pub(crate) fn is_unary(&self) -> bool {
        matches!(self, Self::Not | Self::Exists | Self::NotExists)
    }
}

/// 叶子值位置上的操作数。
#[derive(Debug, Clone)]
pub enum Operand {
    Value(SqlValue),
    /// 渲染时才求值。
    Valuer(Box<dyn SqlValuer>),
    /// 嵌套条件/表达式：任何方言下都内联渲染，不产生参数。
    Condition(Box<Condition>),
    /// 未绑定的占位符：输出占位符但不追加参数。
    Placeholder,
}

impl Operand {
    pub fn valuer(v: impl SqlValuer + 'static) -> Self {
        Self::Valuer(Box::new(v))
    }

    pub fn raw(expr: impl Into<String>) -> Self {
        Self::Condition(Box::new(Condition::Raw(expr.into())))
    }
}

impl PartialEq for Operand {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Value(a), Self::Value(b)) => a == b,
            (Self::Condition(a), Self::Condition(b)) => a == b,
            (Self::Placeholder, Self::Placeholder) => true,
            _ => false,
        }
    }
}

impl<T: Into<SqlValue>> From<T> for Operand {
    fn from(v: T) -> Self {
        Self::Value(v.into())
    }
}

impl From<Condition> for Operand {
    fn from(c: Condition) -> Self {
        Self::Condition(Box::new(c))
    }
}

/// AND/OR 组合；至少有一个子条件。
#[derive(Debug, Clone, PartialEq)]
pub struct Junction {
    op: JunctionOp,
    children: Vec<Condition>,
}

impl Junction {
    pub fn new(op: JunctionOp, children: impl IntoIterator<Item = Condition>) -> Result<Self> {
        let children: Vec<Condition> = children.into_iter().collect();
        if children.is_empty() {
            return Err(BuilderError::EmptyJunction);
        }
        Ok(Self { op, children })
    }

    fn non_empty(
        op: JunctionOp,
        first: Condition,
        rest: impl IntoIterator<Item = Condition>,
    ) -> Self {
        let mut children = vec![first];
        children.extend(rest);
        Self { op, children }
    }

    pub fn op(&self) -> JunctionOp {
        self.op
    }

    pub fn children(&self) -> &[Condition] {
        &self.children
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubQuery {
    /// 原样输出的 SQL 文本。
    Sql(String),
    Select {
        entity: SubQueryEntity,
        /// 为空时投影实体的全部列属性。
        props: Vec<String>,
        condition: Option<Box<Condition>>,
    },
}

/// 子查询引用的实体：已声明的实体，或直接给出表名。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubQueryEntity {
    Entity(&'static EntityMeta),
    Table(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// `col OP value`
    Comparison {
        prop: String,
        op: Operator,
        value: Operand,
    },
    /// `col [NOT] BETWEEN min AND max`
    Between {
        prop: String,
        min: Operand,
        max: Operand,
        negated: bool,
    },
    /// `col [NOT] IN (v1, v2, ...)`
    In {
        prop: String,
        values: Vec<Operand>,
        negated: bool,
    },
    /// `col [NOT] IN (<subquery>)`，`sub_query` 一定是 `Condition::SubQuery`。
    InSubQuery {
        prop: String,
        sub_query: Box<Condition>,
        negated: bool,
    },
    Junction(Junction),
    /// ` KEYWORD inner`
    Cell {
        keyword: Keyword,
        inner: Box<Condition>,
    },
    /// 原始表达式：按词替换列名，不参数化。
    Raw(String),
    SubQuery(SubQuery),
}

impl Condition {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Comparison { .. } => "Comparison",
            Self::Between { .. } => "Between",
            Self::In { .. } => "In",
            Self::InSubQuery { .. } => "InSubQuery",
            Self::Junction(_) => "Junction",
            Self::Cell { .. } => "Cell",
            Self::Raw(_) => "Raw",
            Self::SubQuery(_) => "SubQuery",
        }
    }

    fn compare(prop: impl Into<String>, op: Operator, value: impl Into<Operand>) -> Self {
        Self::Comparison {
            prop: prop.into(),
            op,
            value: value.into(),
        }
    }

    pub fn eq(prop: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(prop, Operator::Eq, value)
    }

    pub fn ne(prop: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(prop, Operator::Ne, value)
    }

    pub fn gt(prop: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(prop, Operator::Gt, value)
    }

    pub fn ge(prop: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(prop, Operator::Ge, value)
    }

    pub fn lt(prop: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(prop, Operator::Lt, value)
    }

    pub fn le(prop: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(prop, Operator::Le, value)
    }

    pub fn like(prop: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(prop, Operator::Like, value)
    }

    pub fn not_like(prop: impl Into<String>, value: impl Into<Operand>) -> Self {
        Self::compare(prop, Operator::NotLike, value)
    }

    pub fn is_null(prop: impl Into<String>) -> Self {
        Self::compare(prop, Operator::Is, Operand::raw(keywords::NULL))
    }

    pub fn is_not_null(prop: impl Into<String>) -> Self {
        Self::compare(prop, Operator::IsNot, Operand::raw(keywords::NULL))
    }

    pub fn between(
        prop: impl Into<String>,
        min: impl Into<Operand>,
        max: impl Into<Operand>,
    ) -> Self {
        Self::Between {
            prop: prop.into(),
            min: min.into(),
            max: max.into(),
            negated: false,
        }
    }

    pub fn not_between(
        prop: impl Into<String>,
        min: impl Into<Operand>,
        max: impl Into<Operand>,
    ) -> Self {
        Self::Between {
            prop: prop.into(),
            min: min.into(),
            max: max.into(),
            negated: true,
        }
    }

    /// `prop IN (v1, v2, ...)`。
    ///
    /// 空列表不输出 `IN ()`，而是渲染成恒假的 `0 = 1`，不产生任何参数。
    pub fn in_(
        prop: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Operand>>,
    ) -> Self {
        Self::In {
            prop: prop.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: false,
        }
    }

    /// `prop NOT IN (...)`；空列表渲染成恒真的 `0 = 0`，不产生参数。
    pub fn not_in(
        prop: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<Operand>>,
    ) -> Self {
        Self::In {
            prop: prop.into(),
            values: values.into_iter().map(Into::into).collect(),
            negated: true,
        }
    }

    fn in_sub_query_impl(prop: String, sub_query: Condition, negated: bool) -> Result<Self> {
        if !matches!(sub_query, Self::SubQuery(_)) {
            return Err(BuilderError::UnsupportedConditionKind {
                kind: sub_query.kind(),
                position: "IN sub query",
            });
        }
        Ok(Self::InSubQuery {
            prop,
            sub_query: Box::new(sub_query),
            negated,
        })
    }

    /// `sub_query` 必须是 `Condition::SubQuery`，否则返回 `UnsupportedConditionKind`。
    pub fn in_sub_query(prop: impl Into<String>, sub_query: Condition) -> Result<Self> {
        Self::in_sub_query_impl(prop.into(), sub_query, false)
    }

    pub fn not_in_sub_query(prop: impl Into<String>, sub_query: Condition) -> Result<Self> {
        Self::in_sub_query_impl(prop.into(), sub_query, true)
    }

    /// 子条件为空时返回 `EmptyJunction`。
    pub fn and(children: impl IntoIterator<Item = Condition>) -> Result<Self> {
        Junction::new(JunctionOp::And, children).map(Self::Junction)
    }

    /// 子条件为空时返回 `EmptyJunction`。
    pub fn or(children: impl IntoIterator<Item = Condition>) -> Result<Self> {
        Junction::new(JunctionOp::Or, children).map(Self::Junction)
    }

    pub fn all_of(first: Condition, rest: impl IntoIterator<Item = Condition>) -> Self {
        Self::Junction(Junction::non_empty(JunctionOp::And, first, rest))
    }

    pub fn any_of(first: Condition, rest: impl IntoIterator<Item = Condition>) -> Self {
        Self::Junction(Junction::non_empty(JunctionOp::Or, first, rest))
    }

    fn combine(self, op: JunctionOp, other: Condition) -> Self {
        match self {
            Self::Junction(mut j) if j.op == op => {
                j.children.push(other);
                Self::Junction(j)
            }
            first => Self::Junction(Junction::non_empty(op, first, [other])),
        }
    }

    /// `self AND other`；`self` 已经是 AND 时直接追加子条件。
    pub fn and_also(self, other: Condition) -> Self {
        self.combine(JunctionOp::And, other)
    }

    /// `self OR other`；`self` 已经是 OR 时直接追加子条件。
    pub fn or_else(self, other: Condition) -> Self {
        self.combine(JunctionOp::Or, other)
    }

    pub fn cell(keyword: Keyword, inner: Condition) -> Self {
        Self::Cell {
            keyword,
            inner: Box::new(inner),
        }
    }

    pub fn where_(cond: Condition) -> Self {
        Self::cell(Keyword::Where, cond)
    }

    pub fn having(cond: Condition) -> Self {
        Self::cell(Keyword::Having, cond)
    }

    pub fn on(cond: Condition) -> Self {
        Self::cell(Keyword::On, cond)
    }

    pub fn not(cond: Condition) -> Self {
        Self::cell(Keyword::Not, cond)
    }

    pub fn exists(sub_query: Condition) -> Self {
        Self::cell(Keyword::Exists, sub_query)
    }

    pub fn not_exists(sub_query: Condition) -> Self {
        Self::cell(Keyword::NotExists, sub_query)
    }

    pub fn group_by(props: impl IntoProps) -> Self {
        Self::cell(Keyword::GroupBy, Self::Raw(props.into_props().join(", ")))
    }

    pub fn order_by(props: impl IntoProps) -> Self {
        Self::cell(Keyword::OrderBy, Self::Raw(props.into_props().join(", ")))
    }

    pub fn using(props: impl IntoProps) -> Self {
        let cols = props.into_props().join(", ");
        Self::cell(Keyword::Using, Self::Raw(format!("({cols})")))
    }

    pub fn raw(expr: impl Into<String>) -> Self {
        Self::Raw(expr.into())
    }

    pub fn sub_query_sql(sql: impl Into<String>) -> Self {
        Self::SubQuery(SubQuery::Sql(sql.into()))
    }

    /// `SELECT props FROM <T 的表> [WHERE condition]`。
    pub fn sub_query<T: SqlEntity>(props: impl IntoProps, condition: Option<Condition>) -> Self {
        Self::SubQuery(SubQuery::Select {
            entity: SubQueryEntity::Entity(T::meta()),
            props: props.into_props(),
            condition: condition.map(Box::new),
        })
    }

    pub fn sub_query_from(
        table: impl Into<String>,
        props: impl IntoProps,
        condition: Option<Condition>,
    ) -> Self {
        Self::SubQuery(SubQuery::Select {
            entity: SubQueryEntity::Table(table.into()),
            props: props.into_props(),
            condition: condition.map(Box::new),
        })
    }
}
