//! SQL 关键字：列名解析时原样保留的保留字，以及子句关键字常量。

use std::collections::HashSet;
use std::sync::OnceLock;

pub const SELECT: &str = "SELECT";
pub const DISTINCT: &str = "DISTINCT";
pub const FROM: &str = "FROM";
pub const WHERE: &str = "WHERE";
pub const GROUP_BY: &str = "GROUP BY";
pub const HAVING: &str = "HAVING";
pub const ORDER_BY: &str = "ORDER BY";
pub const LIMIT: &str = "LIMIT";
pub const OFFSET: &str = "OFFSET";
pub const FOR_UPDATE: &str = "FOR UPDATE";
pub const UNION: &str = "UNION";
pub const UNION_ALL: &str = "UNION ALL";
pub const INSERT_INTO: &str = "INSERT INTO";
pub const VALUES: &str = "VALUES";
pub const UPDATE: &str = "UPDATE";
pub const SET: &str = "SET";
pub const DELETE_FROM: &str = "DELETE FROM";
pub const ON: &str = "ON";
pub const USING: &str = "USING";
pub const AS: &str = "AS";
pub const ASC: &str = "ASC";
pub const DESC: &str = "DESC";
pub const AND: &str = "AND";
pub const OR: &str = "OR";
pub const NOT: &str = "NOT";
pub const EXISTS: &str = "EXISTS";
pub const NOT_EXISTS: &str = "NOT EXISTS";
pub const IN: &str = "IN";
pub const NOT_IN: &str = "NOT IN";
pub const BETWEEN: &str = "BETWEEN";
pub const NOT_BETWEEN: &str = "NOT BETWEEN";
pub const NULL: &str = "NULL";
pub const ASTERISK: &str = "*";

const RESERVED: &[&str] = &[
    "SELECT", "DISTINCT", "DISTINCTROW", "FROM", "WHERE", "GROUP", "BY", "HAVING", "ORDER",
    "LIMIT", "OFFSET", "TOP", "FETCH", "FIRST", "NEXT", "ROWS", "ONLY", "FOR", "UPDATE",
    "INSERT", "INTO", "VALUES", "SET", "DELETE", "REPLACE", "MERGE", "UNION", "INTERSECT",
    "EXCEPT", "MINUS", "ALL", "ANY", "SOME", "JOIN", "INNER", "LEFT", "RIGHT", "FULL", "OUTER",
    "CROSS", "NATURAL", "ON", "USING", "AS", "ASC", "DESC", "AND", "OR", "NOT", "XOR", "IN",
    "IS", "NULL", "LIKE", "ILIKE", "REGEXP", "BETWEEN", "EXISTS", "CASE", "WHEN", "THEN",
    "ELSE", "END", "TRUE", "FALSE", "UNKNOWN", "COUNT", "SUM", "AVG", "MIN", "MAX", "CAST",
    "CONVERT", "COALESCE", "NULLIF", "IFNULL", "IF", "INTERVAL", "DATE", "TIME", "TIMESTAMP",
    "CURRENT_DATE", "CURRENT_TIME", "CURRENT_TIMESTAMP", "NOW", "LOWER", "UPPER", "TRIM",
    "CONCAT", "SUBSTRING", "LENGTH", "ABS", "ROUND", "FLOOR", "CEIL", "MOD", "DIV", "WITH",
    "RECURSIVE", "OVER", "PARTITION", "ROW_NUMBER", "RANK", "DENSE_RANK", "LOCK", "SHARE",
    "MODE", "NOWAIT", "SKIP", "LOCKED", "DEFAULT", "ESCAPE", "COLLATE", "BINARY",
];

fn reserved() -> &'static HashSet<&'static str> {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| RESERVED.iter().copied().collect())
}

/// 是否是保留字（精确匹配，区分大小写）。
pub fn is_reserved(word: &str) -> bool {
    reserved().contains(word)
}
