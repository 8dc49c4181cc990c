//! 实体元数据：属性名、列名覆盖与子实体关系。
//!
//! Rust 没有运行时反射；这里通过 `sql_entity!` 宏为业务类型生成静态元数据，
//! 再由 [`PropertyCatalog`](crate::catalog::PropertyCatalog) 按命名策略派生列名映射。

/// 单个属性的元数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropMeta {
    /// 属性名（camelCase，条件树与 builder 里引用的名字）。
    pub name: &'static str,
    /// 显式列名；为 `None` 时按命名策略转换。
    pub column: Option<&'static str>,
    /// 指向另一个实体（关联对象），不是本表的列。
    pub sub_entity: bool,
    /// 不持久化的属性。
    pub transient: bool,
}

impl PropMeta {
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            column: None,
            sub_entity: false,
            transient: false,
        }
    }

    /// 是否对应本表的一列。
    pub fn is_column(&self) -> bool {
        !self.sub_entity && !self.transient
    }
}

/// 实体（表）的元数据。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityMeta {
    /// 实体的类型名，同时作为缓存键。
    pub name: &'static str,
    /// 显式表名；为 `None` 时按命名策略转换 `name`。
    pub table: Option<&'static str>,
    pub props: &'static [PropMeta],
}

impl EntityMeta {
    pub fn prop(&self, name: &str) -> Option<&'static PropMeta> {
        self.props.iter().find(|p| p.name == name)
    }

    /// 本表列对应的属性名（声明顺序）。
    pub fn column_props(&self) -> impl Iterator<Item = &'static str> {
        self.props.iter().filter(|p| p.is_column()).map(|p| p.name)
    }
}

/// 由 `sql_entity!` 为业务类型实现：提供静态元数据。
pub trait SqlEntity {
    fn meta() -> &'static EntityMeta;
}

/// 声明一个实体的元数据。
///
/// ```ignore
/// struct Account;
///
/// halo_space::sql_entity! {
///     impl Account {
///         table: Some("account"),
///         props: [
///             id:        { column: None,               sub_entity: false, transient: false },
///             firstName: { column: Some("given_name"), sub_entity: false, transient: false },
///             contact:   { column: None,               sub_entity: true,  transient: false },
///         ]
///     }
/// }
/// ```
#[macro_export]
macro_rules! sql_entity {
    (
        impl $ty:ident {
            table: $table:expr,
            props: [
                $(
                    $prop:ident : { column: $column:expr, sub_entity: $sub:literal, transient: $transient:literal }
                ),* $(,)?
            ] $(,)?
        }
    ) => {
        impl $crate::entity::SqlEntity for $ty {
            fn meta() -> &'static $crate::entity::EntityMeta {
                static META: $crate::entity::EntityMeta = $crate::entity::EntityMeta {
                    name: stringify!($ty),
                    table: $table,
                    props: &[
                        $(
                            $crate::entity::PropMeta {
                                name: stringify!($prop),
                                column: $column,
                                sub_entity: $sub,
                                transient: $transient,
                            }
                        ),*
                    ],
                };
                &META
            }
        }
    };
}
