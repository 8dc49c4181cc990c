//! 原始表达式的分词：把 `UPPER(firstName) = 'X'` 切成词、空白、字符串、占位符与符号。
//!
//! 渲染时只有“词”会被当作列名替换；其余 token 原样输出。

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Word,
    Space,
    /// `'..'`、`".."`、`` `..` ``
    Quoted,
    /// `:name`、`#{name}`、`?`
    Param,
    Symbol,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Token<'a> {
    pub(crate) kind: TokenKind,
    pub(crate) text: &'a str,
}

const MULTI_CHAR_SYMBOLS: &[&str] = &[">=", "<=", "<>", "!=", "||", "::", "->>", "->"];

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '.' || c == '$'
}

pub(crate) fn tokenize(s: &str) -> Vec<Token<'_>> {
    let mut out = Vec::new();
    let mut i = 0usize;

    while i < s.len() {
        let rest = &s[i..];
        let mut chars = rest.chars();
        let Some(c) = chars.next() else { break };

        let (kind, len) = if c.is_whitespace() {
            (TokenKind::Space, span_while(rest, char::is_whitespace))
        } else if is_word_char(c) {
            (TokenKind::Word, span_while(rest, is_word_char))
        } else if c == '\'' || c == '"' || c == '`' {
            (TokenKind::Quoted, quoted_len(rest, c))
        } else if c == '?' {
            (TokenKind::Param, 1)
        } else if c == ':' && chars.next().is_some_and(is_word_char) {
            (TokenKind::Param, 1 + span_while(&rest[1..], is_word_char))
        } else if rest.starts_with("#{") {
            match rest.find('}') {
                Some(end) => (TokenKind::Param, end + 1),
                None => (TokenKind::Symbol, 1),
            }
        } else if let Some(sym) = MULTI_CHAR_SYMBOLS.iter().find(|sym| rest.starts_with(**sym)) {
            (TokenKind::Symbol, sym.len())
        } else {
            (TokenKind::Symbol, c.len_utf8())
        };

        out.push(Token {
            kind,
            text: &rest[..len],
        });
        i += len;
    }

    out
}

fn span_while(s: &str, pred: impl Fn(char) -> bool) -> usize {
    s.char_indices()
        .find(|&(_, c)| !pred(c))
        .map(|(idx, _)| idx)
        .unwrap_or(s.len())
}

/// 引号内的 `\x` 转义与成对引号（`''`）都不结束字符串；未闭合时吞掉剩余全部文本。
fn quoted_len(s: &str, quote: char) -> usize {
    let bytes = s.as_bytes();
    let q = quote as u8;
    let mut i = 1usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b if b == q => {
                if bytes.get(i + 1) == Some(&q) {
                    i += 2;
                } else {
                    return i + 1;
                }
            }
            _ => i += 1,
        }
    }
    s.len()
}

/// 当前词后面紧跟 `(`：视为函数名。中间有空白则不算。
pub(crate) fn is_function_name(tokens: &[Token<'_>], idx: usize) -> bool {
    tokens.get(idx + 1).is_some_and(|t| t.text == "(")
}
