//! Route template tokenizer
//!
//! Splits a template such as `/pages/:id(/:title)?` into raw tokens. The
//! tokenizer only classifies characters; structural validation (balanced
//! groups, unique names, placement of `?`) happens in the compiler.

/// A single token with the byte offset it started at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned {
    pub at: usize,
    pub token: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Plain text, including `/` separators and escaped special characters
    Literal(String),
    /// `:name`; the name is empty when `:` is not followed by an identifier
    Capture(String),
    /// `*name`, or `*` alone which is named `splat`
    Splat(String),
    /// `(`
    GroupOpen,
    /// `)`
    GroupClose,
    /// `?`
    Optional,
}

/// Name given to an anonymous `*` splat
pub const DEFAULT_SPLAT_NAME: &str = "splat";

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

fn push_literal(buf: &mut String, start: usize, out: &mut Vec<Spanned>) {
    if !buf.is_empty() {
        out.push(Spanned {
            at: start,
            token: Token::Literal(std::mem::take(buf)),
        });
    }
}

// Reads an identifier starting at `i`, returning it and the index after it.
fn read_ident(chars: &[(usize, char)], mut i: usize) -> (String, usize) {
    let mut ident = String::new();
    if i < chars.len() && is_ident_start(chars[i].1) {
        while i < chars.len() && is_ident_continue(chars[i].1) {
            ident.push(chars[i].1);
            i += 1;
        }
    }
    (ident, i)
}

/// Tokenize a route template.
///
/// A backslash makes the following character literal (`\:` or `\(`); a
/// trailing lone backslash is kept as a literal backslash.
pub fn tokenize(input: &str) -> Vec<Spanned> {
    let chars: Vec<(usize, char)> = input.char_indices().collect();
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut buf_start = 0usize;
    let mut i = 0usize;

    while i < chars.len() {
        let (at, c) = chars[i];

        let token = match c {
            '\\' => {
                if buf.is_empty() {
                    buf_start = at;
                }
                match chars.get(i + 1) {
                    Some(&(_, escaped)) => {
                        buf.push(escaped);
                        i += 2;
                    }
                    None => {
                        buf.push('\\');
                        i += 1;
                    }
                }
                continue;
            }
            ':' => {
                let (name, next) = read_ident(&chars, i + 1);
                i = next;
                Token::Capture(name)
            }
            '*' => {
                let (name, next) = read_ident(&chars, i + 1);
                i = next;
                if name.is_empty() {
                    Token::Splat(DEFAULT_SPLAT_NAME.to_string())
                } else {
                    Token::Splat(name)
                }
            }
            '(' => {
                i += 1;
                Token::GroupOpen
            }
            ')' => {
                i += 1;
                Token::GroupClose
            }
            '?' => {
                i += 1;
                Token::Optional
            }
            other => {
                if buf.is_empty() {
                    buf_start = at;
                }
                buf.push(other);
                i += 1;
                continue;
            }
        };

        push_literal(&mut buf, buf_start, &mut out);
        out.push(Spanned { at, token });
    }

    push_literal(&mut buf, buf_start, &mut out);
    out
}
