//! Route patterns and path matching.
//!
//! A pattern is a `/`-separated template whose segments are literals,
//! named parameters (`:id`), optional named parameters (`:query?`) or a
//! terminating wildcard (`/*`). Matching is pure: the same pattern and
//! path always produce the same result.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;
use thiserror::Error;

/// Parameters extracted from a matched path, keyed by name.
pub type Params = BTreeMap<String, String>;

/// Name under which a wildcard's remainder is captured.
pub const WILDCARD_PARAM: &str = "*";

/// One segment of a compiled pattern.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Segment {
    /// Must equal the path segment exactly.
    Literal(String),
    /// `:name`, captures a present path segment.
    Param(String),
    /// `:name?`, captures a non-empty path segment if there is one.
    Optional(String),
    /// `*` in final position after a `/`.
    Wildcard,
}

/// A compiled route pattern.
///
/// Compilation normalizes the trailing slash: `"/"` stays the root, any
/// other pattern loses one trailing `/`, and an empty pattern becomes the
/// root.
///
/// # Example
///
/// ```rust
/// use waypoint::core::RoutePattern;
///
/// let pattern = RoutePattern::new("/user/:id/posts/:postId");
/// let params = pattern.matches("/user/7/posts/9").unwrap();
///
/// assert_eq!(params["id"], "7");
/// assert_eq!(params["postId"], "9");
/// assert!(pattern.matches("/user/7").is_none());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
    wildcard_base: Option<String>,
}

impl RoutePattern {
    /// Compile a pattern string. Never fails.
    pub fn new(pattern: &str) -> Self {
        let source = normalize(pattern).to_string();
        let wildcard_base = source.strip_suffix("/*").map(str::to_string);
        let last = source.split('/').count() - 1;
        let segments = source
            .split('/')
            .enumerate()
            .map(|(index, part)| compile_segment(part, index == last && wildcard_base.is_some()))
            .collect();

        Self {
            source,
            segments,
            wildcard_base,
        }
    }

    /// The normalized pattern string.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_root(&self) -> bool {
        self.source == "/"
    }

    pub fn has_wildcard(&self) -> bool {
        self.wildcard_base.is_some()
    }

    /// Names of all parameters this pattern can capture, in order.
    pub fn param_names(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Param(name) | Segment::Optional(name) => Some(name.as_str()),
                Segment::Wildcard => Some(WILDCARD_PARAM),
                Segment::Literal(_) => None,
            })
            .collect()
    }

    /// Match a concrete pathname, returning the captured parameters.
    ///
    /// `None` is an ordinary negative result, not an error. Captured values
    /// are percent-decoded; literal segments are compared as written.
    pub fn matches(&self, path: &str) -> Option<Params> {
        let path = normalize(path);

        if self.is_root() {
            return (path == "/").then(Params::new);
        }

        if let Some(base) = &self.wildcard_base {
            if let Some(rest) = path.strip_prefix(base.as_str()) {
                let mut params = Params::new();
                params.insert(WILDCARD_PARAM.to_string(), decode(rest));
                return Some(params);
            }
        }

        let parts: Vec<&str> = path.split('/').collect();
        let trailing_optional = matches!(self.segments.last(), Some(Segment::Optional(_)));
        let omits_optional = trailing_optional && self.segments.len() == parts.len() + 1;
        if self.segments.len() != parts.len() && !omits_optional {
            return None;
        }

        let mut params = Params::new();
        for (index, segment) in self.segments.iter().enumerate() {
            let part = parts.get(index).copied();
            match segment {
                Segment::Optional(name) => {
                    if let Some(value) = part.filter(|value| !value.is_empty()) {
                        params.insert(name.clone(), decode(value));
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), decode(part?));
                }
                Segment::Literal(literal) => {
                    if part? != literal {
                        return None;
                    }
                }
                Segment::Wildcard => {
                    if part? != WILDCARD_PARAM {
                        return None;
                    }
                }
            }
        }

        Some(params)
    }

    /// Report every structural problem with this pattern at once.
    ///
    /// Diagnostics never change how the pattern matches; a pattern with
    /// issues still compiles and behaves as documented on [`matches`].
    ///
    /// [`matches`]: RoutePattern::matches
    pub fn validate(&self) -> Validation<(), NonEmptyVec<PatternIssue>> {
        let raw: Vec<&str> = self.source.split('/').collect();
        let last = raw.len() - 1;
        let mut checks: Vec<Validation<(), NonEmptyVec<PatternIssue>>> = Vec::new();

        let wildcard_positions: Vec<usize> = raw
            .iter()
            .enumerate()
            .filter(|(_, part)| **part == WILDCARD_PARAM)
            .map(|(index, _)| index)
            .collect();
        if wildcard_positions.len() > 1 {
            checks.push(Validation::fail(PatternIssue::MultipleWildcards {
                count: wildcard_positions.len(),
            }));
        }
        for &position in wildcard_positions.iter().filter(|&&p| p != last) {
            checks.push(Validation::fail(PatternIssue::WildcardNotTerminal {
                segment: position,
            }));
        }

        let mut seen = BTreeSet::new();
        for (index, part) in raw.iter().enumerate() {
            let Some(name) = part.strip_prefix(':') else {
                continue;
            };
            let (name, optional) = match name.strip_suffix('?') {
                Some(stripped) => (stripped, true),
                None => (name, false),
            };

            if name.is_empty() {
                checks.push(Validation::fail(PatternIssue::EmptyParameterName {
                    segment: index,
                }));
            } else if !seen.insert(name) {
                checks.push(Validation::fail(PatternIssue::DuplicateParameter {
                    name: name.to_string(),
                }));
            }

            if optional && index != last {
                checks.push(Validation::fail(PatternIssue::OptionalNotTerminal {
                    name: name.to_string(),
                }));
            }
        }

        if checks.is_empty() {
            return Validation::success(());
        }
        Validation::all_vec(checks).map(|_| ())
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl From<&str> for RoutePattern {
    fn from(pattern: &str) -> Self {
        RoutePattern::new(pattern)
    }
}

/// Structural problems found by [`RoutePattern::validate`].
#[derive(Debug, Clone, Error, PartialEq, Eq, Serialize, Deserialize)]
pub enum PatternIssue {
    #[error("Wildcard at segment {segment} is not the final segment")]
    WildcardNotTerminal { segment: usize },

    #[error("Pattern contains {count} wildcards, at most one is allowed")]
    MultipleWildcards { count: usize },

    #[error("Parameter at segment {segment} has an empty name")]
    EmptyParameterName { segment: usize },

    #[error("Optional parameter '{name}' is not the final segment")]
    OptionalNotTerminal { name: String },

    #[error("Parameter '{name}' appears more than once")]
    DuplicateParameter { name: String },
}

/// Match `pattern` against `path` without keeping the compiled pattern.
///
/// # Example
///
/// ```rust
/// use waypoint::core::match_path;
///
/// assert!(match_path("/search/:query?", "/search/").unwrap().is_empty());
/// assert_eq!(match_path("/search/:query?", "/search/abc").unwrap()["query"], "abc");
/// assert_eq!(match_path("/admin/*", "/admin/users/5/edit").unwrap()["*"], "/users/5/edit");
/// assert!(match_path("/", "/x").is_none());
/// ```
pub fn match_path(pattern: &str, path: &str) -> Option<Params> {
    RoutePattern::new(pattern).matches(path)
}

/// Collapse empty, `/` and `//` to the root; otherwise drop one trailing `/`.
pub fn normalize(path: &str) -> &str {
    if path.is_empty() || path == "/" || path == "//" {
        return "/";
    }
    path.strip_suffix('/').unwrap_or(path)
}

fn compile_segment(part: &str, wildcard: bool) -> Segment {
    if wildcard {
        return Segment::Wildcard;
    }
    match part.strip_prefix(':') {
        Some(name) => match name.strip_suffix('?') {
            Some(optional) => Segment::Optional(optional.to_string()),
            None => Segment::Param(name.to_string()),
        },
        None => Segment::Literal(part.to_string()),
    }
}

fn decode(value: &str) -> String {
    urlencoding::decode(value)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| value.to_string())
}
