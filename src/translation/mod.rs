use std::borrow::Cow;
use std::fmt::Write;

mod parsers;
mod scanner;

use parsers::{
    is_block_comment_end, is_block_comment_start, is_line_comment_start, is_system_variable,
};
use scanner::{State, is_identifier_byte, scan_identifier};

/// Rewrite `@name` parameters into the positional `@P1..@Pn` form SQL Server
/// expects over TDS.
///
/// `names` is the bind list in declaration order: a token `@names[k]` becomes
/// `@P{k+1}`. Every occurrence of a bound name is rewritten, so one value can be
/// used several times. Names match ASCII case-insensitively, as T-SQL
/// variables do. Tokens not in `names` (T-SQL locals, `@@ROWCOUNT`) are
/// left alone, as is anything inside string literals, quoted or bracketed
/// identifiers and comments.
///
/// ```rust
/// use sql_request::translation::rewrite_named_placeholders;
///
/// let sql = "UPDATE Test SET nom=@nom WHERE id=@id";
/// let out = rewrite_named_placeholders(sql, &["id", "nom"]);
/// assert_eq!(out, "UPDATE Test SET nom=@P2 WHERE id=@P1");
/// ```
/// Returns a borrowed `Cow` when no changes are needed.
#[must_use]
pub fn rewrite_named_placeholders<'a>(sql: &'a str, names: &[&str]) -> Cow<'a, str> {
    if names.is_empty() {
        return Cow::Borrowed(sql);
    }

    let mut out: Option<String> = None;
    let mut copied = 0;
    let mut state = State::Normal;
    let mut idx = 0;
    let bytes = sql.as_bytes();

    while idx < bytes.len() {
        let b = bytes[idx];
        match state {
            State::Normal => match b {
                b'\'' => state = State::SingleQuoted,
                b'"' => state = State::DoubleQuoted,
                b'[' => state = State::Bracketed,
                _ if is_line_comment_start(bytes, idx) => {
                    state = State::LineComment;
                    idx += 1;
                }
                _ if is_block_comment_start(bytes, idx) => {
                    state = State::BlockComment(1);
                    idx += 1;
                }
                b'@' if is_system_variable(bytes, idx) => {
                    idx += 1;
                    while bytes.get(idx + 1).is_some_and(|&c| is_identifier_byte(c)) {
                        idx += 1;
                    }
                }
                b'@' => {
                    if let Some((end, ident)) = scan_identifier(bytes, idx + 1) {
                        if let Some(pos) =
                            names.iter().position(|name| name.eq_ignore_ascii_case(ident))
                        {
                            let buf = out.get_or_insert_with(|| String::with_capacity(sql.len() + 8));
                            buf.push_str(&sql[copied..idx]);
                            // Writing to a String cannot fail.
                            let _ = write!(buf, "@P{}", pos + 1);
                            copied = end;
                        }
                        idx = end - 1;
                    }
                }
                _ => {}
            },
            State::SingleQuoted => {
                if b == b'\'' {
                    if bytes.get(idx + 1) == Some(&b'\'') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::DoubleQuoted => {
                if b == b'"' {
                    if bytes.get(idx + 1) == Some(&b'"') {
                        idx += 1; // skip escaped quote
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::Bracketed => {
                if b == b']' {
                    if bytes.get(idx + 1) == Some(&b']') {
                        idx += 1;
                    } else {
                        state = State::Normal;
                    }
                }
            }
            State::LineComment => {
                if b == b'\n' {
                    state = State::Normal;
                }
            }
            State::BlockComment(depth) => {
                if is_block_comment_start(bytes, idx) {
                    state = State::BlockComment(depth + 1);
                    idx += 1;
                } else if is_block_comment_end(bytes, idx) {
                    state = if depth == 1 {
                        State::Normal
                    } else {
                        State::BlockComment(depth - 1)
                    };
                    idx += 1;
                }
            }
        }

        idx += 1;
    }

    match out {
        Some(mut buf) => {
            buf.push_str(&sql[copied..]);
            Cow::Owned(buf)
        }
        None => Cow::Borrowed(sql),
    }
}
