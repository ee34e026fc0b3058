//! HTTP method tables.
//!
//! Every leaf of the route tree owns a [`MethodRouter`] mapping each of the
//! nine routable methods to an ordered handler chain. [`MethodFilter::Any`]
//! is expanded at registration time into one entry per method, so lookups
//! during matching are a single array index.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use http::Method;

use crate::error::RouteError;

/// The routable methods, in slot order.
pub const METHODS: [Method; 9] = [
    Method::CONNECT,
    Method::DELETE,
    Method::GET,
    Method::HEAD,
    Method::OPTIONS,
    Method::PATCH,
    Method::POST,
    Method::PUT,
    Method::TRACE,
];

/// Returns the table slot for a method, or `None` for extension methods.
pub(crate) fn method_slot(method: &Method) -> Option<usize> {
    let slot = match *method {
        Method::CONNECT => 0,
        Method::DELETE => 1,
        Method::GET => 2,
        Method::HEAD => 3,
        Method::OPTIONS => 4,
        Method::PATCH => 5,
        Method::POST => 6,
        Method::PUT => 7,
        Method::TRACE => 8,
        _ => return None,
    };
    Some(slot)
}

/// The method(s) a route is registered under.
///
/// # Example
///
/// ```rust
/// use waypoint_router::MethodFilter;
/// use http::Method;
///
/// assert_eq!("ANY".parse::<MethodFilter>().unwrap(), MethodFilter::Any);
/// assert_eq!(MethodFilter::from(Method::GET), MethodFilter::Only(Method::GET));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodFilter {
    /// Register under every routable method.
    Any,
    /// Register under a single method.
    Only(Method),
}

impl MethodFilter {
    /// Table slots this filter expands to.
    pub(crate) fn slots(&self) -> Result<Vec<usize>, RouteError> {
        match self {
            Self::Any => Ok((0..METHODS.len()).collect()),
            Self::Only(method) => method_slot(method).map(|slot| vec![slot]).ok_or_else(|| {
                RouteError::UnsupportedMethod {
                    method: method.to_string(),
                }
            }),
        }
    }
}

impl From<Method> for MethodFilter {
    fn from(method: Method) -> Self {
        Self::Only(method)
    }
}

impl From<&Method> for MethodFilter {
    fn from(method: &Method) -> Self {
        Self::Only(method.clone())
    }
}

impl FromStr for MethodFilter {
    type Err = RouteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("ANY") {
            return Ok(Self::Any);
        }
        let unsupported = || RouteError::UnsupportedMethod {
            method: s.to_string(),
        };
        let method = Method::from_bytes(s.to_ascii_uppercase().as_bytes())
            .map_err(|_| unsupported())?;
        if method_slot(&method).is_none() {
            return Err(unsupported());
        }
        Ok(Self::Only(method))
    }
}

impl fmt::Display for MethodFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("ANY"),
            Self::Only(method) => write!(f, "{method}"),
        }
    }
}

/// Per-method handler chains for one route.
///
/// Chains are stored as `Arc<[H]>` so a match can hand its chain to the
/// request without copying handlers. Each slot also remembers the router's
/// registration sequence number from when it was first filled.
#[derive(Debug, Clone)]
pub struct MethodRouter<H> {
    chains: [Option<Arc<[H]>>; 9],
    orders: [Option<usize>; 9],
}

impl<H> Default for MethodRouter<H> {
    fn default() -> Self {
        Self {
            chains: Default::default(),
            orders: [None; 9],
        }
    }
}

impl<H> MethodRouter<H> {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn chain(&self, method: &Method) -> Option<&Arc<[H]>> {
        method_slot(method).and_then(|slot| self.chains[slot].as_ref())
    }

    pub(crate) fn chain_at(&self, slot: usize) -> Option<&Arc<[H]>> {
        self.chains[slot].as_ref()
    }

    /// Sequence number of the first registration that filled `slot`.
    pub(crate) fn order_at(&self, slot: usize) -> Option<usize> {
        self.orders[slot]
    }

    /// Methods with a registered chain, in slot order.
    #[must_use]
    pub fn allowed_methods(&self) -> Vec<Method> {
        METHODS
            .iter()
            .zip(&self.chains)
            .filter(|(_, chain)| chain.is_some())
            .map(|(method, _)| method.clone())
            .collect()
    }
}

impl<H: Clone> MethodRouter<H> {
    /// Appends `handlers` to the chains selected by `filter`.
    ///
    /// Registering the same route twice extends its chain rather than
    /// replacing it.
    /// `order` is recorded only for slots that were empty.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::UnsupportedMethod`] for extension methods.
    pub fn append(
        &mut self,
        filter: &MethodFilter,
        handlers: &[H],
        order: usize,
    ) -> Result<(), RouteError> {
        for slot in filter.slots()? {
            if self.orders[slot].is_none() {
                self.orders[slot] = Some(order);
            }
            let chain: Arc<[H]> = match self.chains[slot].take() {
                Some(existing) => existing.iter().chain(handlers).cloned().collect(),
                None => handlers.iter().cloned().collect(),
            };
            self.chains[slot] = Some(chain);
        }
        Ok(())
    }
}
