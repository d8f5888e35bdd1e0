//! Form argument sets and their wire encoding.
//!
//! Keys and values are inserted verbatim: no percent-encoding is applied.
//! A value containing `&` or `=` will therefore change the meaning of the
//! encoded string. Callers that need escaping must do it themselves.

use std::fmt;

/// An insertion-ordered set of `key=value` arguments.
///
/// Inserting an existing key replaces its value in place, keeping the
/// original position.
///
/// # Examples
///
/// ```
/// use stix_req::http::FormArgs;
///
/// let mut args = FormArgs::new();
/// args.insert("a", "1");
/// args.insert("b", "2");
/// args.insert("a", "3");
///
/// assert_eq!(args.get("a"), Some("3"));
/// assert_eq!(args.iter().map(|(k, _)| k).collect::<Vec<_>>(), vec!["a", "b"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormArgs {
    inner: Vec<(String, String)>,
}

impl FormArgs {
    /// Creates an empty argument set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.inner.iter_mut().find(|(k, _)| *k == key) {
            Some((_, v)) => *v = value,
            None => self.inner.push((key, value)),
        }
    }

    /// Returns the value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns an iterator over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Joins the pairs as `k1=v1&k2=v2`.
    pub fn encode(&self) -> String {
        let mut out = String::new();
        for (key, value) in self.iter() {
            out.push_str(key);
            out.push('=');
            out.push_str(value);
            out.push('&');
        }
        out.pop();
        out
    }

    /// The length advertised in `Content-Length` for this set.
    ///
    /// Counts `len(key) + len(value) + 1` per entry: one separator per pair
    /// where the encoded form has two (`=` and `&`) for all but the last. With
    /// two or more pairs it is shorter than [`encode`](Self::encode)'s output.
    pub fn advertised_len(&self) -> usize {
        self.iter().map(|(k, v)| k.len() + v.len() + 1).sum()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut args = Self::new();
        for (k, v) in iter {
            args.insert(k, v);
        }
        args
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for FormArgs {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl fmt::Display for FormArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Encodes an optional argument set into `(argstr, arglen)`.
///
/// `None` yields `("", 0)`. `arglen` is [`FormArgs::advertised_len`], not
/// `argstr.len()`.
///
/// # Examples
///
/// ```
/// use stix_req::http::{FormArgs, get_argstr};
///
/// assert_eq!(get_argstr(None), (String::new(), 0));
///
/// let args: FormArgs = [("a", "1"), ("b", "2")].into_iter().collect();
/// assert_eq!(get_argstr(Some(&args)), ("a=1&b=2".to_owned(), 6));
/// ```
pub fn get_argstr(args: Option<&FormArgs>) -> (String, usize) {
    match args {
        Some(args) => (args.encode(), args.advertised_len()),
        None => (String::new(), 0),
    }
}
