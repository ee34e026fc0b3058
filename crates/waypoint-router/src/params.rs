//! Bound path parameters.
//!
//! Parameters are bound positionally: the winning route's parameter names are
//! zipped with the request path's segments. Values keep the request's
//! original case even though literals are matched case-insensitively.

use std::collections::HashMap;

use smallvec::SmallVec;

/// Maximum number of parameters stored inline (stack allocated).
const INLINE_PARAMS: usize = 4;

/// Path parameters bound by a route match.
///
/// # Example
///
/// ```rust
/// use waypoint_router::Params;
///
/// let names = vec!["".to_string(), "className".to_string(), "objectId".to_string()];
/// let params = Params::bind(&names, &["classes", "Category", "Item"]);
///
/// assert_eq!(params.get("className"), Some("Category"));
/// assert_eq!(params.get("objectId"), Some("Item"));
/// assert_eq!(params.len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    inner: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `names[i]` to `parts[i]` for every non-empty name.
    ///
    /// Positions beyond either slice are ignored.
    #[must_use]
    pub fn bind(names: &[String], parts: &[&str]) -> Self {
        let mut params = Self::new();
        for (name, value) in names.iter().zip(parts) {
            if !name.is_empty() {
                params.insert(name.as_str(), *value);
            }
        }
        params
    }

    /// Sets a parameter, replacing an earlier value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.inner.iter_mut().find(|(n, _)| *n == name) {
            Some(slot) => slot.1 = value,
            None => self.inner.push((name, value)),
        }
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.inner
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Returns true if `name` is bound.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Returns true if no parameters are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Iterates over `(name, value)` pairs in path order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.inner.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// Copies the parameters into an owned map.
    #[must_use]
    pub fn to_map(&self) -> HashMap<String, String> {
        self.inner.iter().cloned().collect()
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}
