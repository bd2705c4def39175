//! Path generation from templates
//!
//! Expansion walks the same segment tree the matcher uses. Arguments the
//! template does not consume are handed back so callers can turn them into a
//! query string.

use super::params::{Args, ParamValue};
use super::pattern::{Segment, Template};
use crate::errors::{RoutingError, RoutingResult};
use std::collections::HashSet;
use url::form_urlencoded;

/// Result of expanding a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub path: String,
    /// Arguments no capture or splat consumed, in the caller's order
    pub unused: Args,
}

impl Expansion {
    /// The path followed by `?query` when arguments were left over
    pub fn into_url(self) -> String {
        match query_string(&self.unused) {
            Some(query) => format!("{}?{}", self.path, query),
            None => self.path,
        }
    }
}

/// Serialize arguments as a query string; lists become repeated `key[]` pairs
pub fn query_string(args: &Args) -> Option<String> {
    if args.is_empty() {
        return None;
    }
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in args.iter() {
        match value {
            ParamValue::Single(value) => {
                serializer.append_pair(key, value);
            }
            ParamValue::List(values) => {
                let key = format!("{}[]", key);
                for value in values {
                    serializer.append_pair(&key, value);
                }
            }
        }
    }
    Some(serializer.finish())
}

/// Expand a template with the given arguments.
///
/// Every top-level capture and splat must be supplied, and an empty value does
/// not count for a capture. An optional group is written only when all of its
/// own captures are supplied; a group that would write no capture at all is
/// left out.
pub fn expand(template: &Template, args: &Args) -> RoutingResult<Expansion> {
    let mut out = String::new();
    let mut used = HashSet::new();
    let mut missing = Vec::new();

    render(template.segments(), args, &mut out, &mut used, &mut missing);

    if !missing.is_empty() {
        let given: Vec<&str> = args.keys().collect();
        return Err(RoutingError::expansion(template.source(), &given, missing));
    }

    let unused = args
        .iter()
        .filter(|(key, _)| !used.contains(key))
        .map(|(key, value)| (key, value.clone()))
        .collect();

    Ok(Expansion { path: out, unused })
}

// Writes `segments` into `out`, returning how many captures were written.
fn render<'t>(
    segments: &'t [Segment],
    args: &Args,
    out: &mut String,
    used: &mut HashSet<&'t str>,
    missing: &mut Vec<String>,
) -> usize {
    let mut written = 0;
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Capture { name, .. } => match capture_value(args, name) {
                Some(value) => {
                    out.push_str(&urlencoding::encode(&value));
                    used.insert(name);
                    written += 1;
                }
                None => missing.push(name.clone()),
            },
            Segment::Splat { name, .. } => match args.get(name) {
                Some(value) => {
                    out.push_str(&encode_splat(&value.joined()));
                    used.insert(name);
                    written += 1;
                }
                None => missing.push(name.clone()),
            },
            Segment::Optional(inner) => {
                let complete = inner.iter().all(|segment| match segment {
                    Segment::Capture { name, .. } => capture_value(args, name).is_some(),
                    Segment::Splat { name, .. } => args.contains_key(name),
                    _ => true,
                });
                if !complete {
                    continue;
                }
                let mut group = String::new();
                let mut group_used = HashSet::new();
                let mut group_missing = Vec::new();
                let count = render(inner, args, &mut group, &mut group_used, &mut group_missing);
                if count > 0 {
                    out.push_str(&group);
                    used.extend(group_used);
                    written += count;
                }
            }
        }
    }
    written
}

// A capture never matches zero characters, so an empty value is missing.
fn capture_value(args: &Args, name: &str) -> Option<String> {
    args.get(name)
        .map(ParamValue::joined)
        .filter(|value| !value.is_empty())
}

fn encode_splat(value: &str) -> String {
    value
        .split('/')
        .map(|piece| urlencoding::encode(piece).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(source: &str) -> Template {
        Template::parse(source).unwrap()
    }

    #[test]
    fn test_expand_captures() {
        let t = template("/users/:id/posts/:slug");
        let args = Args::new().with("id", 123).with("slug", "hello-world");
        let expansion = t.expand(&args).unwrap();
        assert_eq!(expansion.path, "/users/123/posts/hello-world");
        assert!(expansion.unused.is_empty());
    }

    #[test]
    fn test_optional_group_needs_all_its_captures() {
        let t = template("/pages/:id(/:title)?");
        assert_eq!(
            t.expand(&Args::new().with("id", 54).with("title", "eloquent-ruby"))
                .unwrap()
                .path,
            "/pages/54/eloquent-ruby"
        );
        assert_eq!(t.expand(&Args::new().with("id", 54)).unwrap().path, "/pages/54");
    }

    #[test]
    fn test_optional_group_without_captures_is_omitted() {
        let t = template("/books/?");
        assert_eq!(t.expand(&Args::new()).unwrap().path, "/books");

        let t = template("/books(.json)");
        assert_eq!(t.expand(&Args::new()).unwrap().path, "/books");
    }

    #[test]
    fn test_optional_capture() {
        let t = template("/pages/:id?");
        assert_eq!(t.expand(&Args::new().with("id", 5)).unwrap().path, "/pages/5");

        let path = t.expand(&Args::new()).unwrap().path;
        assert_eq!(path, "/pages/");
        assert!(t.matches(&path));
    }

    #[test]
    fn test_nested_optional_groups() {
        let t = template("/a(/:b(/:c))");
        assert_eq!(t.expand(&Args::new()).unwrap().path, "/a");
        assert_eq!(t.expand(&Args::new().with("b", 1)).unwrap().path, "/a/1");
        assert_eq!(
            t.expand(&Args::new().with("b", 1).with("c", 2)).unwrap().path,
            "/a/1/2"
        );
        // `c` alone cannot be placed without `b`, so it is left over
        let expansion = t.expand(&Args::new().with("c", 2)).unwrap();
        assert_eq!(expansion.path, "/a");
        assert!(expansion.unused.contains_key("c"));
    }

    #[test]
    fn test_missing_top_level_capture() {
        let t = template("/books/:book_id/reviews/:id");
        let err = t.expand(&Args::new().with("book_id", 1)).unwrap_err();
        assert_eq!(
            err,
            RoutingError::Expansion {
                pattern: "/books/:book_id/reviews/:id".to_string(),
                given: "book_id".to_string(),
                missing: vec!["id".to_string()],
            }
        );
    }

    #[test]
    fn test_unused_arguments_become_query() {
        let t = template("/books/:id");
        let args = Args::new()
            .with("id", 82)
            .with("return_to", "/")
            .with("page", 2);
        assert_eq!(
            t.expand_with_query(&args).unwrap(),
            "/books/82?return_to=%2F&page=2"
        );
    }

    #[test]
    fn test_list_values() {
        let t = template("/files/*path");
        let args = Args::new()
            .with("path", vec!["docs", "a b.txt"])
            .with("tags", vec!["x", "y"]);
        assert_eq!(
            t.expand_with_query(&args).unwrap(),
            "/files/docs/a%20b.txt?tags%5B%5D=x&tags%5B%5D=y"
        );
    }

    #[test]
    fn test_capture_values_are_encoded() {
        let t = template("/search/:query");
        let path = t.expand(&Args::new().with("query", "a/b c")).unwrap().path;
        assert_eq!(path, "/search/a%2Fb%20c");
        assert_eq!(t.match_path(&path).unwrap().get("query"), Some("a/b c"));
    }

    #[test]
    fn test_expand_then_match_recovers_values() {
        let t = template("/pages/:id(/:title)?");
        let args = Args::new().with("id", 54).with("title", "eloquent-ruby");
        let path = t.expand(&args).unwrap().path;
        let params = t.match_path(&path).unwrap();
        assert_eq!(params.get("id"), Some("54"));
        assert_eq!(params.get("title"), Some("eloquent-ruby"));

        let path = t.expand(&Args::new().with("id", 54)).unwrap().path;
        assert_eq!(path, "/pages/54");
        assert_eq!(t.match_path(&path).unwrap().get("title"), None);
    }

    #[test]
    fn test_empty_capture_value_is_missing() {
        let t = template("/books/:id");
        let err = t.expand(&Args::new().with("id", "")).unwrap_err();
        assert_eq!(
            err,
            RoutingError::Expansion {
                pattern: "/books/:id".to_string(),
                given: "id".to_string(),
                missing: vec!["id".to_string()],
            }
        );

        let t = template("/pages/:id(/:title)");
        let path = t
            .expand(&Args::new().with("id", 1).with("title", ""))
            .unwrap()
            .path;
        assert_eq!(path, "/pages/1");
        assert!(t.match_path(&path).is_some());
    }

    #[test]
    fn test_empty_splat_value_is_written() {
        let t = template("/files/*path");
        let path = t.expand(&Args::new().with("path", "")).unwrap().path;
        assert_eq!(path, "/files/");
        assert_eq!(t.match_path(&path).unwrap().get("path"), Some(""));
    }
}
