//! Route parameters
//!
//! [`Params`] is what matching produces: every name the template declares,
//! mapped to its captured value or to nothing when it sat in an absent
//! optional group. [`Args`] is what expansion consumes: an insertion-ordered
//! list of key/value pairs.

use std::str::FromStr;

/// Parameters captured from a matched path
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: Vec<(String, Option<String>)>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a captured value; `None` when missing or not captured
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values
            .iter()
            .find(|(key, _)| key == name)
            .and_then(|(_, value)| value.as_deref())
    }

    /// Get a captured value parsed into `T`; `None` when absent or unparsable
    pub fn get_as<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name).and_then(|value| value.parse().ok())
    }

    /// Whether the name was declared by the matched template
    pub fn contains_key(&self, name: &str) -> bool {
        self.values.iter().any(|(key, _)| key == name)
    }

    /// Set a value, replacing an existing entry in place
    pub fn insert<K: Into<String>>(&mut self, name: K, value: Option<String>) {
        let name = name.into();
        match self.values.iter_mut().find(|(key, _)| *key == name) {
            Some((_, slot)) => *slot = value,
            None => self.values.push((name, value)),
        }
    }

    /// Merge another set of parameters into this one, the other side winning
    pub fn merge(&mut self, other: Params) {
        for (name, value) in other.values {
            self.insert(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.values
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Option<String>)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, Option<String>)>>(iter: I) -> Self {
        let mut params = Params::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}

/// A value passed to path generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamValue {
    Single(String),
    List(Vec<String>),
}

impl ParamValue {
    /// Single values as-is, lists joined with `/`
    pub fn joined(&self) -> String {
        match self {
            ParamValue::Single(value) => value.clone(),
            ParamValue::List(values) => values.join("/"),
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Single(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Single(value)
    }
}

impl From<&String> for ParamValue {
    fn from(value: &String) -> Self {
        ParamValue::Single(value.clone())
    }
}

impl<T: ToString> From<Vec<T>> for ParamValue {
    fn from(values: Vec<T>) -> Self {
        ParamValue::List(values.iter().map(ToString::to_string).collect())
    }
}

macro_rules! param_value_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for ParamValue {
                fn from(value: $ty) -> Self {
                    ParamValue::Single(value.to_string())
                }
            }
        )*
    };
}

param_value_from_number!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

/// Arguments for path generation, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Args {
    entries: Vec<(String, ParamValue)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    ///
    /// ```
    /// use elif_router::Args;
    ///
    /// let args = Args::new().with("id", 82).with("return_to", "/");
    /// assert_eq!(args.len(), 2);
    /// ```
    pub fn with<K: Into<String>, V: Into<ParamValue>>(mut self, key: K, value: V) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, keeping the original position when the key exists
    pub fn insert<K: Into<String>, V: Into<ParamValue>>(&mut self, key: K, value: V) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&ParamValue> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    pub fn remove(&mut self, key: &str) -> Option<ParamValue> {
        let index = self.entries.iter().position(|(existing, _)| existing == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<ParamValue>> FromIterator<(K, V)> for Args {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Args::new();
        for (key, value) in iter {
            args.insert(key, value);
        }
        args
    }
}

impl<K: Into<String>, V: Into<ParamValue>, const N: usize> From<[(K, V); N]> for Args {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_absent_values_are_declared() {
        let params: Params = vec![("id", Some("54".to_string())), ("title", None)]
            .into_iter()
            .collect();

        assert_eq!(params.get("id"), Some("54"));
        assert_eq!(params.get("title"), None);
        assert!(params.contains_key("title"));
        assert!(!params.contains_key("format"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_params_typed_access() {
        let mut params = Params::new();
        params.insert("id", Some("82".to_string()));
        params.insert("slug", Some("pickaxe".to_string()));

        assert_eq!(params.get_as::<i64>("id"), Some(82));
        assert_eq!(params.get_as::<i64>("slug"), None);
        assert_eq!(params.get_as::<i64>("missing"), None);
    }

    #[test]
    fn test_params_merge() {
        let mut outer: Params = vec![("account", Some("7".to_string()))].into_iter().collect();
        let inner: Params = vec![
            ("account", Some("8".to_string())),
            ("id", Some("1".to_string())),
        ]
        .into_iter()
        .collect();

        outer.merge(inner);
        let pairs: Vec<_> = outer.iter().collect();
        assert_eq!(pairs, vec![("account", Some("8")), ("id", Some("1"))]);
    }

    #[test]
    fn test_args_keep_insertion_order() {
        let args = Args::new().with("b", 1).with("a", "x").with("b", 2);
        let keys: Vec<_> = args.keys().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(args.get("b"), Some(&ParamValue::Single("2".into())));
    }

    #[test]
    fn test_args_remove() {
        let mut args = Args::from([("subdomain", "auth"), ("id", "1")]);
        assert_eq!(args.remove("subdomain"), Some(ParamValue::Single("auth".into())));
        assert_eq!(args.remove("subdomain"), None);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn test_param_value_conversions() {
        assert_eq!(ParamValue::from(82u32), ParamValue::Single("82".into()));
        assert_eq!(
            ParamValue::from(vec!["a", "b"]),
            ParamValue::List(vec!["a".into(), "b".into()])
        );
        assert_eq!(ParamValue::from(vec![1, 2]).joined(), "1/2");
    }
}
