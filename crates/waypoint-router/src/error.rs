//! Route registration errors.

use thiserror::Error;

/// Errors returned when a route cannot be registered.
///
/// Matching never fails with an error: a request that matches nothing simply
/// yields no route. Everything here is a configuration mistake that should be
/// caught before the first request is served.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The pattern has no segments at all (e.g. `""` or `"//"`).
    #[error("route pattern {pattern:?} has no segments")]
    EmptyPattern {
        /// The rejected pattern.
        pattern: String,
    },

    /// A `*` segment appears somewhere other than the end of the pattern.
    #[error("wildcard must be the last segment in {pattern:?}")]
    WildcardNotLast {
        /// The rejected pattern.
        pattern: String,
    },

    /// A `:` segment has no name after the prefix.
    #[error("parameter without a name in {pattern:?}")]
    EmptyParamName {
        /// The rejected pattern.
        pattern: String,
    },

    /// Strict mode only: two parameter spellings at the same tree position.
    #[error("parameter :{name} in {pattern:?} conflicts with :{existing} at the same position")]
    ParamConflict {
        /// The rejected pattern.
        pattern: String,
        /// The parameter name in the rejected pattern.
        name: String,
        /// The parameter name already registered at that position.
        existing: String,
    },

    /// The method is not one of the nine routable HTTP methods.
    #[error("unsupported HTTP method {method}")]
    UnsupportedMethod {
        /// The rejected method.
        method: String,
    },

    /// The handler chain is empty.
    #[error("route {pattern:?} registered without handlers")]
    NoHandlers {
        /// The rejected pattern.
        pattern: String,
    },
}
