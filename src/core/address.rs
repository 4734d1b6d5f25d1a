//! URL decomposition into pathname, query parameters and hash.
//!
//! Decomposition never fails: a missing origin (headless evaluation) or a
//! malformed target yields [`UrlParts::default`], which is the root path
//! with no query and no hash.

use serde::{Deserialize, Serialize};
use url::{form_urlencoded, Url};

/// Decoded query parameters.
///
/// Iteration follows first-insertion order, while a repeated key keeps
/// only its last value, mirroring standard query-string semantics.
///
/// # Example
///
/// ```rust
/// use waypoint::core::QueryParams;
///
/// let query = QueryParams::parse("tab=x&page=1&tab=y");
/// assert_eq!(query.get("tab"), Some("y"));
/// assert_eq!(query.keys().collect::<Vec<_>>(), vec!["tab", "page"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    /// Create an empty set of query parameters.
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Parse a raw query string (without the leading `?`).
    pub fn parse(raw: &str) -> Self {
        form_urlencoded::parse(raw.as_bytes())
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect()
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set a value, keeping the key's original position if already present.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Remove a key, returning its value if it was present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(index).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Serialize as `key=value&key2=value2` using form encoding.
    ///
    /// Returns an empty string when there are no parameters.
    pub fn to_query_string(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter())
            .finish()
    }
}

impl<K, V> FromIterator<(K, V)> for QueryParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = QueryParams::new();
        for (key, value) in iter {
            params.set(key, value);
        }
        params
    }
}

/// The three parts of a URL the router cares about.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlParts {
    /// Canonical pathname, always starting with `/`.
    pub pathname: String,
    pub query: QueryParams,
    /// Fragment without the leading `#`; empty when absent.
    pub hash: String,
}

impl Default for UrlParts {
    fn default() -> Self {
        Self {
            pathname: "/".to_string(),
            query: QueryParams::new(),
            hash: String::new(),
        }
    }
}

impl UrlParts {
    /// Rebuild a relative URL of the form `pathname?query#hash`.
    ///
    /// The query and hash markers are omitted when their part is empty.
    pub fn to_relative_url(&self) -> String {
        compose(&self.pathname, &self.query, &self.hash)
    }
}

/// Split `target` into pathname, query and hash.
///
/// Relative targets are resolved against `origin` using standard URL
/// resolution; absolute targets ignore it. Without an origin there is no
/// live location to resolve against and the safe default is returned.
///
/// # Example
///
/// ```rust
/// use waypoint::core::decompose;
///
/// let parts = decompose("/blog/42?tab=x#y", Some("http://localhost:3000"));
/// assert_eq!(parts.pathname, "/blog/42");
/// assert_eq!(parts.query.get("tab"), Some("x"));
/// assert_eq!(parts.hash, "y");
///
/// let headless = decompose("/blog/42", None);
/// assert_eq!(headless.pathname, "/");
/// ```
pub fn decompose(target: &str, origin: Option<&str>) -> UrlParts {
    let Some(origin) = origin else {
        return UrlParts::default();
    };

    let resolved = Url::parse(origin).and_then(|base| base.join(target));
    match resolved {
        Ok(url) => parts_of(&url),
        Err(err) => {
            tracing::warn!(target_url = %target, %origin, error = %err, "malformed url, using defaults");
            UrlParts::default()
        }
    }
}

/// Extract the router-relevant parts of an already parsed URL.
pub fn parts_of(url: &Url) -> UrlParts {
    UrlParts {
        pathname: url.path().to_string(),
        query: url.query().map(QueryParams::parse).unwrap_or_default(),
        hash: url.fragment().unwrap_or_default().to_string(),
    }
}

/// Build `path?query#hash`, leaving out empty query and hash parts.
///
/// # Example
///
/// ```rust
/// use waypoint::core::{compose, QueryParams};
///
/// let query: QueryParams = [("q", "rust lang")].into_iter().collect();
/// assert_eq!(compose("/search", &query, "top"), "/search?q=rust+lang#top");
/// assert_eq!(compose("/search", &QueryParams::new(), ""), "/search");
/// ```
pub fn compose(path: &str, query: &QueryParams, hash: &str) -> String {
    let mut full = path.to_string();
    let search = query.to_query_string();
    if !search.is_empty() {
        full.push('?');
        full.push_str(&search);
    }
    if !hash.is_empty() {
        full.push('#');
        full.push_str(hash);
    }
    full
}
