//! PropertyCatalog：实体 -> (属性名 -> 列名) 映射、表名与子实体属性的查询能力。
//!
//! 渲染器只依赖 [`PropertyCatalog`] trait。默认实现 [`EntityCatalog`] 按
//! (实体, 命名策略) 惰性计算并缓存映射；并发读安全，两个线程同时填充同一个键时
//! 任一结果胜出都不影响正确性（计算是确定且无副作用的）。

use crate::entity::EntityMeta;
use crate::naming::NamingPolicy;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::{Arc, OnceLock, RwLock};

/// 属性名 -> 列名。
pub type ColumnMap = HashMap<String, String>;

/// 别名 -> 该别名对应实体的列名映射（多表/别名查询）。
pub type AliasMap = HashMap<String, Arc<ColumnMap>>;

pub trait PropertyCatalog: Send + Sync + fmt::Debug {
    fn column_map(&self, entity: &'static EntityMeta, policy: NamingPolicy) -> Arc<ColumnMap>;

    fn table_name(&self, entity: &'static EntityMeta, policy: NamingPolicy) -> String;

    fn sub_entity_props(&self, entity: &'static EntityMeta) -> Arc<HashSet<String>>;

    /// `SELECT` 默认投影的属性：既不是子实体也不是 transient，保持声明顺序。
    fn select_props(&self, entity: &'static EntityMeta) -> Vec<String> {
        let subs = self.sub_entity_props(entity);
        entity
            .column_props()
            .filter(|p| !subs.contains(*p))
            .map(str::to_string)
            .collect()
    }
}

/// 以元数据的静态地址区分实体：不同模块里的同名类型互不影响。
fn entity_key(entity: &'static EntityMeta) -> usize {
    std::ptr::from_ref(entity) as usize
}

type ColumnKey = (usize, NamingPolicy);

/// 基于 `sql_entity!` 静态元数据的默认 catalog。
#[derive(Default)]
pub struct EntityCatalog {
    columns: RwLock<HashMap<ColumnKey, Arc<ColumnMap>>>,
    sub_entities: RwLock<HashMap<usize, Arc<HashSet<String>>>>,
}

impl EntityCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn build_column_map(entity: &EntityMeta, policy: NamingPolicy) -> ColumnMap {
        entity
            .props
            .iter()
            .filter(|p| p.is_column())
            .map(|p| {
                let column = match p.column {
                    Some(c) => c.to_string(),
                    None => policy.apply(p.name),
                };
                (p.name.to_string(), column)
            })
            .collect()
    }

    /// 已缓存的 (实体, 策略) 数量。
    pub fn cached_len(&self) -> usize {
        self.columns
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }
}

impl fmt::Debug for EntityCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EntityCatalog")
            .field("cached", &self.cached_len())
            .finish()
    }
}

impl PropertyCatalog for EntityCatalog {
    fn column_map(&self, entity: &'static EntityMeta, policy: NamingPolicy) -> Arc<ColumnMap> {
        let key = (entity_key(entity), policy);
        if let Some(m) = self
            .columns
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&key)
        {
            return m.clone();
        }

        let built = Arc::new(Self::build_column_map(entity, policy));
        tracing::trace!(entity = entity.name, %policy, columns = built.len(), "populate column map");
        self.columns
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(key)
            .or_insert(built)
            .clone()
    }

    fn table_name(&self, entity: &'static EntityMeta, policy: NamingPolicy) -> String {
        match entity.table {
            Some(t) => t.to_string(),
            None => policy.apply(entity.name),
        }
    }

    fn sub_entity_props(&self, entity: &'static EntityMeta) -> Arc<HashSet<String>> {
        if let Some(s) = self
            .sub_entities
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(&entity_key(entity))
        {
            return s.clone();
        }

        let built: Arc<HashSet<String>> = Arc::new(
            entity
                .props
                .iter()
                .filter(|p| p.sub_entity)
                .map(|p| p.name.to_string())
                .collect(),
        );
        self.sub_entities
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .entry(entity_key(entity))
            .or_insert(built)
            .clone()
    }
}

/// 进程内共享的默认 catalog。
pub fn default_catalog() -> Arc<dyn PropertyCatalog> {
    static CATALOG: OnceLock<Arc<EntityCatalog>> = OnceLock::new();
    CATALOG
        .get_or_init(|| Arc::new(EntityCatalog::new()))
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::SqlEntity;
    use pretty_assertions::assert_eq;

    struct UserAccount;

    crate::sql_entity! {
        impl UserAccount {
            table: None,
            props: [
                id:           { column: None,            sub_entity: false, transient: false },
                firstName:    { column: None,            sub_entity: false, transient: false },
                emailAddress: { column: Some("email"),   sub_entity: false, transient: false },
                devices:      { column: None,            sub_entity: true,  transient: false },
                loginCount:   { column: None,            sub_entity: false, transient: true },
            ]
        }
    }

    #[test]
    fn column_map_applies_overrides_then_policy() {
        let catalog = EntityCatalog::new();
        let m = catalog.column_map(UserAccount::meta(), NamingPolicy::SnakeUpper);
        assert_eq!(m.get("id").map(String::as_str), Some("ID"));
        assert_eq!(m.get("firstName").map(String::as_str), Some("FIRST_NAME"));
        assert_eq!(m.get("emailAddress").map(String::as_str), Some("email"));
        assert_eq!(m.get("devices"), None);
        assert_eq!(m.get("loginCount"), None);
    }

    #[test]
    fn column_map_is_cached_per_policy() {
        let catalog = EntityCatalog::new();
        let a = catalog.column_map(UserAccount::meta(), NamingPolicy::SnakeLower);
        let b = catalog.column_map(UserAccount::meta(), NamingPolicy::SnakeLower);
        assert!(Arc::ptr_eq(&a, &b));
        catalog.column_map(UserAccount::meta(), NamingPolicy::CamelLower);
        assert_eq!(catalog.cached_len(), 2);
    }

    #[test]
    fn table_name_follows_policy() {
        let catalog = EntityCatalog::new();
        let meta = UserAccount::meta();
        assert_eq!(catalog.table_name(meta, NamingPolicy::SnakeLower), "user_account");
        assert_eq!(catalog.table_name(meta, NamingPolicy::SnakeUpper), "USER_ACCOUNT");
        assert_eq!(catalog.table_name(meta, NamingPolicy::CamelLower), "userAccount");
    }

    #[test]
    fn select_props_exclude_sub_entities_and_transients() {
        let catalog = EntityCatalog::new();
        assert_eq!(
            catalog.select_props(UserAccount::meta()),
            vec!["id", "firstName", "emailAddress"]
        );
        assert!(
            catalog
                .sub_entity_props(UserAccount::meta())
                .contains("devices")
        );
    }

    #[test]
    fn concurrent_reads_agree() {
        let catalog = Arc::new(EntityCatalog::new());
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let c = catalog.clone();
                std::thread::spawn(move || {
                    c.column_map(UserAccount::meta(), NamingPolicy::SnakeLower)
                        .get("firstName")
                        .cloned()
                })
            })
            .collect();
        for h in handles {
            assert_eq!(h.join().unwrap(), Some("first_name".to_string()));
        }
        assert_eq!(catalog.cached_len(), 1);
    }
}
