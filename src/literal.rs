//! 字面量编码：`Literal` 方言下把参数值直接写进 SQL 文本。
//!
//! 安全警告：字面量永远不如预编译参数安全；只用于调试输出或不支持参数化的驱动。

use crate::value::{SqlDateTime, SqlValue};
use time::format_description::FormatItem;
use time::macros::format_description;

const DATETIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:6]");

pub(crate) fn encode_value(out: &mut String, v: &SqlValue) {
    match v {
        SqlValue::Null => out.push_str("NULL"),
        SqlValue::Bool(b) => out.push_str(if *b { "TRUE" } else { "FALSE" }),
        SqlValue::I64(n) => out.push_str(&n.to_string()),
        SqlValue::U64(n) => out.push_str(&n.to_string()),
        // NaN / inf 没有对应的 SQL 字面量
        SqlValue::F64(n) if !n.is_finite() => out.push_str("NULL"),
        SqlValue::F64(n) => out.push_str(&n.to_string()),
        SqlValue::String(s) => quote_string(out, s),
        SqlValue::Bytes(b) => encode_bytes(out, b),
        SqlValue::DateTime(dt) => encode_datetime(out, dt),
    }
}

fn encode_bytes(out: &mut String, data: &[u8]) {
    if data.is_empty() {
        out.push_str("NULL");
        return;
    }
    const HEX: &[u8; 16] = b"0123456789ABCDEF";
    out.push_str("X'");
    for &b in data {
        out.push(HEX[((b >> 4) & 0xF) as usize] as char);
        out.push(HEX[(b & 0xF) as usize] as char);
    }
    out.push('\'');
}

fn quote_string(out: &mut String, s: &str) {
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\u{0000}' => out.push_str("\\0"),
            '\u{0008}' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\u{001a}' => out.push_str("\\Z"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            _ => out.push(ch),
        }
    }
    out.push('\'');
}

fn encode_datetime(out: &mut String, v: &SqlDateTime) {
    // 四舍五入到微秒；已到可表示的上限时直接截断
    let dt = v
        .dt
        .checked_add(time::Duration::nanoseconds(500))
        .unwrap_or(v.dt);
    out.push('\'');
    match dt.format(DATETIME_FORMAT) {
        Ok(s) => out.push_str(&s),
        // 格式描述是编译期常量，只有超出范围的年份会走到这里
        Err(_) => out.push_str(&dt.to_string()),
    }
    out.push('\'');
}

#[cfg(test)]
mod tests {
    use super::encode_value;
    use crate::value::SqlValue;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    fn encode(v: impl Into<SqlValue>) -> String {
        let mut out = String::new();
        encode_value(&mut out, &v.into());
        out
    }

    #[test]
    fn scalars() {
        assert_eq!(encode(()), "NULL");
        assert_eq!(encode(true), "TRUE");
        assert_eq!(encode(-42_i64), "-42");
        assert_eq!(encode(42_u32), "42");
        assert_eq!(encode(1.25_f64), "1.25");
    }

    #[test]
    fn non_finite_floats_are_null() {
        assert_eq!(encode(f64::NAN), "NULL");
        assert_eq!(encode(f64::INFINITY), "NULL");
        assert_eq!(encode(f64::NEG_INFINITY), "NULL");
    }

    #[test]
    fn strings_are_escaped() {
        assert_eq!(encode("I'm fine"), "'I\\'m fine'");
        assert_eq!(encode("a\nb\\c"), "'a\\nb\\\\c'");
    }

    #[test]
    fn bytes_are_hex() {
        assert_eq!(encode(vec![0x01_u8, 0xAB]), "X'01AB'");
        assert_eq!(encode(Vec::<u8>::new()), "NULL");
    }

    #[test]
    fn datetime_has_microseconds() {
        let dt = datetime!(2024-03-05 06:07:08.123456789 UTC);
        assert_eq!(encode(dt), "'2024-03-05 06:07:08.123457'");
    }

    #[test]
    fn datetime_at_upper_bound_truncates() {
        let dt = datetime!(9999-12-31 23:59:59.999999999 UTC);
        assert_eq!(encode(dt), "'9999-12-31 23:59:59.999999'");
    }
}
