//! Route template compilation
//!
//! Turns the token stream from the lexer into a segment tree, validating the
//! template structure and attaching constraints to named captures.

use super::lexer::{tokenize, Token};
use super::pattern::{Constraint, Segment, Template};
use crate::errors::{RoutingError, RoutingResult};
use std::collections::HashSet;

/// Compile a template string into a [`Template`].
///
/// Fails on unbalanced groups, empty or duplicate capture names, a `?` with
/// nothing to make optional, an invalid constraint expression, or a
/// constraint naming a key the template does not declare.
pub fn compile(source: &str, constraints: &[(String, String)]) -> RoutingResult<Template> {
    let mut names: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    let mut current: Vec<Segment> = Vec::new();
    let mut groups: Vec<(usize, Vec<Segment>)> = Vec::new();
    let mut after_group_close = false;

    for spanned in tokenize(source) {
        let closed_group = matches!(spanned.token, Token::GroupClose);

        match spanned.token {
            Token::Literal(text) => push_literal(&mut current, &text),
            Token::Capture(name) | Token::Splat(name) if name.is_empty() => {
                return Err(RoutingError::compile(
                    source,
                    format!("empty capture name at index {}", spanned.at),
                ));
            }
            Token::Capture(name) => {
                declare(source, &name, &mut seen, &mut names)?;
                current.push(Segment::Capture {
                    name,
                    constraint: None,
                });
            }
            Token::Splat(name) => {
                declare(source, &name, &mut seen, &mut names)?;
                current.push(Segment::Splat {
                    name,
                    constraint: None,
                });
            }
            Token::GroupOpen => {
                groups.push((spanned.at, std::mem::take(&mut current)));
            }
            Token::GroupClose => {
                let (_, parent) = groups.pop().ok_or_else(|| {
                    RoutingError::compile(
                        source,
                        format!("unbalanced ')' at index {}", spanned.at),
                    )
                })?;
                let inner = std::mem::replace(&mut current, parent);
                current.push(Segment::Optional(inner));
            }
            Token::Optional => {
                // `(...)?` is the same as `(...)`; `c?`, `:name?` and `*name?`
                // make the preceding character or capture optional
                if !after_group_close {
                    optional_last(&mut current).ok_or_else(|| {
                        RoutingError::compile(
                            source,
                            format!(
                                "'?' at index {} does not follow a group, capture or character",
                                spanned.at
                            ),
                        )
                    })?;
                }
            }
        }

        after_group_close = closed_group;
    }

    if let Some((at, _)) = groups.last() {
        return Err(RoutingError::compile(
            source,
            format!("unbalanced '(' at index {}", at),
        ));
    }

    for (key, expression) in constraints {
        let constraint = Constraint::parse(expression).map_err(|e| {
            RoutingError::compile(source, format!("invalid constraint for '{}': {}", key, e))
        })?;
        if !attach_constraint(&mut current, key, &constraint) {
            return Err(RoutingError::compile(
                source,
                format!("constraint given for unknown key '{}'", key),
            ));
        }
    }

    Ok(Template::from_parts(source.to_string(), current, names))
}

fn declare(
    source: &str,
    name: &str,
    seen: &mut HashSet<String>,
    names: &mut Vec<String>,
) -> RoutingResult<()> {
    if !seen.insert(name.to_string()) {
        return Err(RoutingError::compile(
            source,
            format!("duplicate capture name '{}'", name),
        ));
    }
    names.push(name.to_string());
    Ok(())
}

fn push_literal(segments: &mut Vec<Segment>, text: &str) {
    match segments.last_mut() {
        Some(Segment::Literal(existing)) => existing.push_str(text),
        _ => segments.push(Segment::Literal(text.to_string())),
    }
}

fn optional_last(segments: &mut Vec<Segment>) -> Option<()> {
    let ch = match segments.last_mut() {
        Some(Segment::Literal(text)) => text.pop()?,
        Some(Segment::Capture { .. } | Segment::Splat { .. }) => {
            let capture = segments.pop()?;
            segments.push(Segment::Optional(vec![capture]));
            return Some(());
        }
        _ => return None,
    };
    if matches!(segments.last(), Some(Segment::Literal(text)) if text.is_empty()) {
        segments.pop();
    }
    segments.push(Segment::Optional(vec![Segment::Literal(ch.to_string())]));
    Some(())
}

fn attach_constraint(segments: &mut [Segment], key: &str, constraint: &Constraint) -> bool {
    for segment in segments.iter_mut() {
        match segment {
            Segment::Capture { name, constraint: slot } | Segment::Splat { name, constraint: slot }
                if name.as_str() == key =>
            {
                *slot = Some(constraint.clone());
                return true;
            }
            Segment::Optional(inner) => {
                if attach_constraint(inner, key, constraint) {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}
