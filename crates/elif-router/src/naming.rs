//! Name and path inflection helpers used when registering routes
//!
//! Route names are normalized to snake_case symbols, controller identifiers
//! are classified to `Namespace::Name` form and route paths are cleaned before
//! compilation.

use once_cell::sync::Lazy;
use regex::Regex;

static ACRONYM_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").expect("valid acronym boundary regex"));
static CAMEL_BOUNDARY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([a-z\d])([A-Z])").expect("valid camel boundary regex"));
static WORD_SEPARATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s-]").expect("valid word separator regex"));
static REPEATED_UNDERSCORES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_{2,}").expect("valid underscore regex"));

/// Return a lower-cased, underscore separated version of the string.
///
/// `::` becomes `/`, word boundaries in CamelCase get an underscore and
/// whitespace or dashes are replaced with underscores.
///
/// ```
/// use elif_router::naming::underscore;
///
/// assert_eq!(underscore("ElifRouter"), "elif_router");
/// assert_eq!(underscore("Admin::HTTPSessions"), "admin/http_sessions");
/// ```
pub fn underscore(input: &str) -> String {
    let replaced = input.replace("::", "/");
    let replaced = ACRONYM_BOUNDARY.replace_all(&replaced, "${1}_${2}");
    let replaced = CAMEL_BOUNDARY.replace_all(&replaced, "${1}_${2}");
    let replaced = WORD_SEPARATOR.replace_all(&replaced, "_");
    replaced.to_lowercase()
}

/// Return a CamelCase version of the string, turning `/` into `::`.
///
/// ```
/// use elif_router::naming::classify;
///
/// assert_eq!(classify("species/mammals/cats"), "Species::Mammals::Cats");
/// assert_eq!(classify("user_sessions"), "UserSessions");
/// ```
pub fn classify(input: &str) -> String {
    let underscored = underscore(input);
    let mut output = String::with_capacity(underscored.len());
    let mut word = String::new();

    for ch in underscored.chars() {
        match ch {
            '_' => output.push_str(&capitalize(&std::mem::take(&mut word))),
            '/' => {
                output.push_str(&capitalize(&std::mem::take(&mut word)));
                output.push_str("::");
            }
            _ => word.push(ch),
        }
    }
    output.push_str(&capitalize(&word));
    output
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Normalize the given string to a valid route name.
///
/// Normalization is idempotent.
///
/// ```
/// use elif_router::naming::route_name;
///
/// assert_eq!(route_name("_weird/__name__"), "weird_name");
/// assert_eq!(route_name("admin/UserSessions"), "admin_user_sessions");
/// ```
pub fn route_name(input: &str) -> String {
    let name = underscore(input).replace('/', "_");
    let name = REPEATED_UNDERSCORES.replace_all(&name, "_");
    let name = name.strip_prefix('_').unwrap_or(&name);
    let name = name.strip_suffix('_').unwrap_or(name);
    name.to_string()
}

/// Normalize a route path: ensure a leading slash, collapse repeated slashes,
/// drop `.` components, resolve `..` and strip the trailing slash.
///
/// ```
/// use elif_router::naming::cleanpath;
///
/// assert_eq!(cleanpath("books//:id/"), "/books/:id");
/// assert_eq!(cleanpath(""), "/");
/// ```
pub fn cleanpath(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => {
                parts.pop();
            }
            other => parts.push(other),
        }
    }

    format!("/{}", parts.join("/"))
}

/// Join the non-empty parts with the separator.
///
/// ```
/// use elif_router::naming::join;
///
/// assert_eq!(join(&[Some("api"), None, Some(""), Some("v1")], "/"), "api/v1");
/// ```
pub fn join(parts: &[Option<&str>], sep: &str) -> String {
    parts
        .iter()
        .flatten()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join(sep)
}
