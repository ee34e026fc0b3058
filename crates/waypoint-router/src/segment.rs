//! Route pattern parsing.
//!
//! A pattern is split on `/` into segments. Empty segments are dropped, so
//! `/users/`, `users` and `//users` all describe the same route. Segments
//! starting with `:` are named parameters, a final `*` is a catch-all, and
//! every other segment is a literal compared case-insensitively.

use crate::error::RouteError;

/// Score base for routes without a trailing wildcard.
const STATIC_BASE: usize = 100;

/// Score base for wildcard-terminated routes.
const WILDCARD_BASE: usize = 10;

/// Parameter count at which the score stops decreasing.
const MAX_RANKED_PARAMS: usize = 10;

/// One parsed segment of a route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, already case-folded.
    Literal(String),
    /// Named parameter, name stored without the `:` prefix.
    Param(String),
}

/// A parsed route pattern.
///
/// # Example
///
/// ```rust
/// use waypoint_router::{Pattern, Segment};
///
/// let pattern = Pattern::parse("/Users/:id/*").unwrap();
/// assert_eq!(
///     pattern.segments(),
///     &[Segment::Literal("users".into()), Segment::Param("id".into())]
/// );
/// assert!(pattern.has_wildcard());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    raw: String,
    segments: Vec<Segment>,
    wildcard: bool,
}

impl Pattern {
    /// Parses a route pattern.
    ///
    /// A pattern consisting solely of `/` is the root catch-all and parses as
    /// `/*`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the pattern has no segments, when `*` is
    /// not the last segment, or when a parameter has no name.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        let normalized = if raw == "/" { "/*" } else { raw };
        let mut parts: Vec<&str> = split_path(normalized).collect();
        if parts.is_empty() {
            return Err(RouteError::EmptyPattern {
                pattern: raw.to_string(),
            });
        }

        let wildcard = parts.last() == Some(&"*");
        if wildcard {
            parts.pop();
        }

        let mut segments = Vec::with_capacity(parts.len());
        for part in parts {
            if part == "*" {
                return Err(RouteError::WildcardNotLast {
                    pattern: raw.to_string(),
                });
            }
            match part.strip_prefix(':') {
                Some("") => {
                    return Err(RouteError::EmptyParamName {
                        pattern: raw.to_string(),
                    })
                }
                Some(name) => segments.push(Segment::Param(name.to_string())),
                None => segments.push(Segment::Literal(part.to_lowercase())),
            }
        }

        Ok(Self {
            raw: raw.to_string(),
            segments,
            wildcard,
        })
    }

    /// The pattern exactly as it was registered.
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Segments before the wildcard, if any.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Whether the pattern ends in `*`.
    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.wildcard
    }

    /// Number of parameter segments.
    #[must_use]
    pub fn variable_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| matches!(s, Segment::Param(_)))
            .count()
    }

    /// Positional parameter names, `""` at literal positions.
    #[must_use]
    pub fn variable_names(&self) -> Vec<String> {
        self.segments
            .iter()
            .map(|s| match s {
                Segment::Param(name) => name.clone(),
                Segment::Literal(_) => String::new(),
            })
            .collect()
    }

    /// Lookup key for fully literal patterns, `None` otherwise.
    #[must_use]
    pub fn static_key(&self) -> Option<String> {
        if self.wildcard {
            return None;
        }
        let mut literals = Vec::with_capacity(self.segments.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => literals.push(text.as_str()),
                Segment::Param(_) => return None,
            }
        }
        Some(literals.join("/"))
    }

    /// Specificity score used to rank competing matches.
    ///
    /// Fully literal routes score highest, each parameter costs one step,
    /// and wildcard routes sit an order of magnitude lower with longer
    /// literal prefixes ahead of shorter ones.
    #[must_use]
    pub fn score(&self) -> usize {
        let base = if self.wildcard {
            WILDCARD_BASE
        } else {
            STATIC_BASE
        };
        let rank = MAX_RANKED_PARAMS
            .saturating_sub(self.variable_count())
            .max(1);
        let mut score = 1 + rank * base;
        if self.wildcard {
            score += self.segments.len();
        }
        score
    }
}

/// Splits a path into its non-empty segments.
pub(crate) fn split_path(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
