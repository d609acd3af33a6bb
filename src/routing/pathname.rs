//! Route pattern compilation.
//!
//! # Responsibilities
//! - Parse a route pattern (`/posts/[slug]`, `/docs/[...path]`, `/[[...all]]`)
//!   into typed segments
//! - Pick the static (string equality) or dynamic (segment walk) variant
//! - Extract parameters, binding catch-all remainders as ordered sequences
//!
//! # Design Decisions
//! - Patterns are validated once, at construction; matching itself never fails
//! - No regex: matching walks segments and is anchored at both ends
//! - Pathnames are compared verbatim (no decoding, no trailing-slash folding);
//!   normalization happens before a pathname reaches a matcher

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::fmt;

use serde::Serialize;
use thiserror::Error;

/// Errors raised while compiling a route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    /// Patterns are absolute.
    #[error("route pattern must start with '/': {0:?}")]
    MissingLeadingSlash(String),

    /// A `[` or `[[` group never closes.
    #[error("unterminated bracket group {segment:?} in {pattern:?}")]
    Unterminated { pattern: String, segment: String },

    /// Brackets in a position we cannot interpret.
    #[error("malformed segment {segment:?} in {pattern:?}")]
    Malformed { pattern: String, segment: String },

    /// `[]`, `[...]` or `[[...]]`.
    #[error("empty parameter name in {0:?}")]
    EmptyName(String),

    /// Catch-alls consume the rest of the pathname, so nothing may follow them.
    #[error("catch-all segment {segment:?} must be the last segment of {pattern:?}")]
    CatchAllNotLast { pattern: String, segment: String },

    #[error("parameter {name:?} appears more than once in {pattern:?}")]
    DuplicateName { pattern: String, name: String },
}

/// One segment of a compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Literal text, matched by equality.
    Static(String),
    /// `[name]`: exactly one segment.
    Param(String),
    /// `[...name]`: one or more trailing segments.
    CatchAll(String),
    /// `[[...name]]`: zero or more trailing segments.
    OptionalCatchAll(String),
}

impl Segment {
    /// Returns true for parameter and catch-all segments.
    pub fn is_dynamic(&self) -> bool {
        !matches!(self, Segment::Static(_))
    }

    pub fn is_catch_all(&self) -> bool {
        matches!(self, Segment::CatchAll(_) | Segment::OptionalCatchAll(_))
    }

    /// Rank used when comparing two patterns position by position.
    /// Lower is more specific.
    pub fn rank(&self) -> u8 {
        match self {
            Segment::Static(_) => 0,
            Segment::Param(_) => 1,
            Segment::CatchAll(_) => 2,
            Segment::OptionalCatchAll(_) => 3,
        }
    }

    fn name(&self) -> Option<&str> {
        match self {
            Segment::Static(_) => None,
            Segment::Param(name) | Segment::CatchAll(name) | Segment::OptionalCatchAll(name) => {
                Some(name)
            }
        }
    }
}

/// A value bound to a route parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Bound by a `[name]` segment.
    Single(String),
    /// Bound by a catch-all, in pathname order.
    Multiple(Vec<String>),
}

impl ParamValue {
    /// The string form of the value; catch-all parts are joined with `/`.
    pub fn joined(&self) -> String {
        match self {
            ParamValue::Single(value) => value.clone(),
            ParamValue::Multiple(parts) => parts.join("/"),
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Parameters extracted by a successful match, keyed by parameter name.
pub type Params = BTreeMap<String, ParamValue>;

/// A compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathnameMatcher {
    /// Pattern without parameters; matches by string equality.
    Static { pathname: String },
    /// Pattern with at least one parameter or catch-all segment.
    Dynamic {
        pattern: String,
        segments: Vec<Segment>,
    },
}

impl PathnameMatcher {
    /// Compile a route pattern.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let segments = parse_pattern(pattern)?;
        if segments.iter().any(Segment::is_dynamic) {
            Ok(PathnameMatcher::Dynamic {
                pattern: pattern.to_string(),
                segments,
            })
        } else {
            Ok(PathnameMatcher::Static {
                pathname: pattern.to_string(),
            })
        }
    }

    pub fn is_dynamic(&self) -> bool {
        matches!(self, PathnameMatcher::Dynamic { .. })
    }

    /// The pattern this matcher was compiled from.
    pub fn pattern(&self) -> &str {
        match self {
            PathnameMatcher::Static { pathname } => pathname,
            PathnameMatcher::Dynamic { pattern, .. } => pattern,
        }
    }

    /// Compiled segments. Empty for the static variant, which never needs them.
    pub fn segments(&self) -> &[Segment] {
        match self {
            PathnameMatcher::Static { .. } => &[],
            PathnameMatcher::Dynamic { segments, .. } => segments,
        }
    }

    /// Match a pathname, returning the extracted parameters on success.
    pub fn matches(&self, pathname: &str) -> Option<Params> {
        match self {
            PathnameMatcher::Static { pathname: expected } => {
                (expected == pathname).then(Params::new)
            }
            PathnameMatcher::Dynamic { segments, .. } => match_segments(segments, pathname),
        }
    }
}

/// Returns true when the pathname itself looks like a route pattern,
/// i.e. has a whole segment wrapped in brackets.
pub fn is_dynamic_route(pathname: &str) -> bool {
    pathname
        .split('/')
        .any(|segment| segment.len() > 2 && segment.starts_with('[') && segment.ends_with(']'))
}

fn parse_pattern(pattern: &str) -> Result<Vec<Segment>, PatternError> {
    let rest = pattern
        .strip_prefix('/')
        .ok_or_else(|| PatternError::MissingLeadingSlash(pattern.to_string()))?;

    let raw: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();
    let mut segments = Vec::with_capacity(raw.len());
    let mut names = HashSet::new();

    for (index, text) in raw.iter().enumerate() {
        let segment = classify_segment(pattern, text)?;

        if segment.is_catch_all() && index + 1 != raw.len() {
            return Err(PatternError::CatchAllNotLast {
                pattern: pattern.to_string(),
                segment: text.to_string(),
            });
        }

        if let Some(name) = segment.name() {
            if !names.insert(name.to_string()) {
                return Err(PatternError::DuplicateName {
                    pattern: pattern.to_string(),
                    name: name.to_string(),
                });
            }
        }

        segments.push(segment);
    }

    Ok(segments)
}

fn classify_segment(pattern: &str, text: &str) -> Result<Segment, PatternError> {
    let unterminated = || PatternError::Unterminated {
        pattern: pattern.to_string(),
        segment: text.to_string(),
    };
    let malformed = || PatternError::Malformed {
        pattern: pattern.to_string(),
        segment: text.to_string(),
    };

    if let Some(after) = text.strip_prefix("[[") {
        let inner = after.strip_suffix("]]").ok_or_else(unterminated)?;
        // Only catch-alls may be optional.
        let name = inner.strip_prefix("...").ok_or_else(malformed)?;
        return param_name(pattern, text, name).map(Segment::OptionalCatchAll);
    }

    if let Some(after) = text.strip_prefix('[') {
        let inner = after.strip_suffix(']').ok_or_else(unterminated)?;
        return match inner.strip_prefix("...") {
            Some(name) => param_name(pattern, text, name).map(Segment::CatchAll),
            None => param_name(pattern, text, inner).map(Segment::Param),
        };
    }

    if text.contains('[') {
        return Err(unterminated());
    }
    if text.contains(']') {
        return Err(malformed());
    }

    Ok(Segment::Static(text.to_string()))
}

fn param_name(pattern: &str, text: &str, name: &str) -> Result<String, PatternError> {
    if name.is_empty() {
        return Err(PatternError::EmptyName(pattern.to_string()));
    }
    if name.contains(['[', ']']) {
        return Err(PatternError::Malformed {
            pattern: pattern.to_string(),
            segment: text.to_string(),
        });
    }
    Ok(name.to_string())
}

fn match_segments(segments: &[Segment], pathname: &str) -> Option<Params> {
    let rest = pathname.strip_prefix('/')?;
    let parts: Vec<&str> = if rest.is_empty() {
        Vec::new()
    } else {
        rest.split('/').collect()
    };
    if parts.iter().any(|part| part.is_empty()) {
        return None;
    }

    let mut params = Params::new();
    let mut position = 0;

    for segment in segments {
        match segment {
            Segment::Static(literal) => {
                if *parts.get(position)? != literal.as_str() {
                    return None;
                }
                position += 1;
            }
            Segment::Param(name) => {
                let value = parts.get(position)?;
                params.insert(name.clone(), ParamValue::Single(value.to_string()));
                position += 1;
            }
            Segment::CatchAll(name) => {
                if position >= parts.len() {
                    return None;
                }
                let rest = parts[position..].iter().map(|p| p.to_string()).collect();
                params.insert(name.clone(), ParamValue::Multiple(rest));
                position = parts.len();
            }
            Segment::OptionalCatchAll(name) => {
                if position < parts.len() {
                    let rest = parts[position..].iter().map(|p| p.to_string()).collect();
                    params.insert(name.clone(), ParamValue::Multiple(rest));
                }
                position = parts.len();
            }
        }
    }

    (position == parts.len()).then_some(params)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(value: &str) -> ParamValue {
        ParamValue::Single(value.to_string())
    }

    fn multiple(values: &[&str]) -> ParamValue {
        ParamValue::Multiple(values.iter().map(|v| v.to_string()).collect())
    }

    #[test]
    fn test_static_pattern() {
        let matcher = PathnameMatcher::compile("/about/team").unwrap();
        assert!(!matcher.is_dynamic());
        assert_eq!(matcher.matches("/about/team"), Some(Params::new()));
        assert_eq!(matcher.matches("/about/team/"), None);
        assert_eq!(matcher.matches("/about"), None);
    }

    #[test]
    fn test_root_pattern() {
        let matcher = PathnameMatcher::compile("/").unwrap();
        assert!(!matcher.is_dynamic());
        assert!(matcher.matches("/").is_some());
        assert!(matcher.matches("/x").is_none());
    }

    #[test]
    fn test_named_param() {
        let matcher = PathnameMatcher::compile("/posts/[slug]").unwrap();
        assert!(matcher.is_dynamic());

        let params = matcher.matches("/posts/hello-world").unwrap();
        assert_eq!(params.get("slug"), Some(&single("hello-world")));

        assert!(matcher.matches("/posts").is_none());
        assert!(matcher.matches("/posts/a/b").is_none());
        assert!(matcher.matches("/posts/").is_none());
        assert!(matcher.matches("/other/hello").is_none());
    }

    #[test]
    fn test_multiple_params() {
        let matcher = PathnameMatcher::compile("/[org]/repos/[repo]").unwrap();
        let params = matcher.matches("/acme/repos/widgets").unwrap();
        assert_eq!(params.get("org"), Some(&single("acme")));
        assert_eq!(params.get("repo"), Some(&single("widgets")));
    }

    #[test]
    fn test_catch_all() {
        let matcher = PathnameMatcher::compile("/docs/[...path]").unwrap();
        let params = matcher.matches("/docs/guide/install/linux").unwrap();
        assert_eq!(params.get("path"), Some(&multiple(&["guide", "install", "linux"])));
        assert_eq!(params["path"].joined(), "guide/install/linux");

        // Required catch-all needs at least one segment.
        assert!(matcher.matches("/docs").is_none());
    }

    #[test]
    fn test_optional_catch_all() {
        let matcher = PathnameMatcher::compile("/shop/[[...filters]]").unwrap();

        let params = matcher.matches("/shop").unwrap();
        assert!(params.get("filters").is_none());

        let params = matcher.matches("/shop/red/large").unwrap();
        assert_eq!(params.get("filters"), Some(&multiple(&["red", "large"])));
    }

    #[test]
    fn test_root_optional_catch_all() {
        let matcher = PathnameMatcher::compile("/[[...all]]").unwrap();
        assert!(matcher.matches("/").is_some());
        assert_eq!(matcher.matches("/a/b").unwrap()["all"], multiple(&["a", "b"]));
    }

    #[test]
    fn test_anchored_match() {
        let matcher = PathnameMatcher::compile("/a/[id]").unwrap();
        assert!(matcher.matches("/x/a/1").is_none());
        assert!(matcher.matches("/a/1/extra").is_none());
        assert!(matcher.matches("a/1").is_none());
    }

    #[test]
    fn test_pattern_errors() {
        assert_eq!(
            PathnameMatcher::compile("posts/[id]"),
            Err(PatternError::MissingLeadingSlash("posts/[id]".into()))
        );
        assert!(matches!(
            PathnameMatcher::compile("/posts/[id"),
            Err(PatternError::Unterminated { .. })
        ));
        assert!(matches!(
            PathnameMatcher::compile("/posts/[[...rest]"),
            Err(PatternError::Unterminated { .. })
        ));
        assert!(matches!(
            PathnameMatcher::compile("/posts/[[id]]"),
            Err(PatternError::Malformed { .. })
        ));
        assert!(matches!(
            PathnameMatcher::compile("/posts/id]"),
            Err(PatternError::Malformed { .. })
        ));
        assert!(matches!(
            PathnameMatcher::compile("/posts/[]"),
            Err(PatternError::EmptyName(_))
        ));
        assert!(matches!(
            PathnameMatcher::compile("/docs/[...path]/edit"),
            Err(PatternError::CatchAllNotLast { .. })
        ));
        assert!(matches!(
            PathnameMatcher::compile("/[id]/[id]"),
            Err(PatternError::DuplicateName { .. })
        ));
    }

    #[test]
    fn test_is_dynamic_route() {
        assert!(is_dynamic_route("/posts/[slug]"));
        assert!(is_dynamic_route("/[...all]"));
        assert!(!is_dynamic_route("/posts/slug"));
        assert!(!is_dynamic_route("/posts/[]"));
        assert!(!is_dynamic_route("/"));
    }

    #[test]
    fn test_param_value_display() {
        assert_eq!(single("a").to_string(), "a");
        assert_eq!(multiple(&["a", "b"]).to_string(), "a/b");
    }
}
