//! Per-request context and the dispatch chain.
//!
//! A [`Context`] is created for every request. It owns the request, the
//! bound route parameters, the handler chain picked by the router and the
//! response written so far. [`Context::next`] walks the chain.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use bytes::Bytes;
use http::{HeaderMap, Method, StatusCode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use waypoint_router::{Params, RouteMatch};

use crate::error::HandlerError;
use crate::handler::{BoxFuture, BoxedHandler, HandlerResult};
use crate::types::{Request, Response, ResponseExt};

/// Header carrying an incoming request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// A unique identifier for each request, using UUID v7.
///
/// UUID v7 is time-ordered, so ids sort by arrival in log output.
///
/// # Example
///
/// ```
/// use waypoint_core::RequestId;
///
/// let id = RequestId::new();
/// println!("Request ID: {}", id);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Creates a new unique request ID using UUID v7.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `RequestId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Reads the id from the `x-request-id` header, or generates one when
    /// the header is missing or not a UUID.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        headers
            .get(REQUEST_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value.trim()).ok())
            .map_or_else(Self::new, Self)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for RequestId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<RequestId> for Uuid {
    fn from(id: RequestId) -> Self {
        id.0
    }
}

/// Per-request state that flows through the handler chain.
///
/// # Example
///
/// ```
/// use http::{Method, StatusCode};
/// use waypoint_core::{handler_fn, BoxedHandler, Context};
/// use waypoint_router::Router;
///
/// let hello = handler_fn(|ctx| {
///     Box::pin(async move {
///         let name = ctx.param("name").unwrap_or("stranger").to_string();
///         ctx.text(StatusCode::OK, format!("hello {name}"));
///         Ok(())
///     })
/// });
///
/// let mut router: Router<BoxedHandler> = Router::new();
/// router.add(Method::GET, "/hello/:name", [hello]).unwrap();
///
/// let request = http::Request::get("/hello/ada").body(Default::default()).unwrap();
/// let route = router.find(request.method(), request.uri().path()).unwrap();
/// let mut ctx = Context::with_route(request, route);
///
/// tokio_test::block_on(ctx.next()).unwrap();
/// assert_eq!(ctx.path(), "/hello/:name");
/// assert!(ctx.is_committed());
/// ```
pub struct Context {
    request: Request,
    request_id: RequestId,
    pattern: Option<Arc<str>>,
    params: Params,
    wildcard: Option<String>,
    chain: Arc<[BoxedHandler]>,
    cursor: usize,
    aborted: bool,
    response: Option<Response>,
    started_at: Instant,
    extensions: http::Extensions,
}

impl Context {
    /// Creates a context for a matched route.
    #[must_use]
    pub fn with_route(request: Request, route: RouteMatch<BoxedHandler>) -> Self {
        let mut ctx = Self::with_chain(request, route.handlers);
        ctx.pattern = Some(route.pattern);
        ctx.params = route.params;
        ctx.wildcard = route.wildcard;
        ctx
    }

    /// Creates a context for a request that matched nothing. The given
    /// chain is the application's not-found chain.
    #[must_use]
    pub fn not_found(request: Request, chain: impl Into<Arc<[BoxedHandler]>>) -> Self {
        Self::with_chain(request, chain.into())
    }

    fn with_chain(request: Request, chain: Arc<[BoxedHandler]>) -> Self {
        let request_id = RequestId::from_headers(request.headers());
        Self {
            request,
            request_id,
            pattern: None,
            params: Params::new(),
            wildcard: None,
            chain,
            cursor: 0,
            aborted: false,
            response: None,
            started_at: Instant::now(),
            extensions: http::Extensions::new(),
        }
    }

    /// Runs the rest of the chain.
    ///
    /// Each remaining handler is called in order. A handler may call `next`
    /// itself to run everything after it and then continue; when it returns
    /// the loop picks up wherever the cursor was left. With the cursor at the
    /// end this is a no-op.
    ///
    /// # Errors
    ///
    /// Returns the first error a handler produces. Nothing after the failing
    /// handler runs.
    pub fn next(&mut self) -> BoxFuture<'_, HandlerResult> {
        Box::pin(async move {
            while let Some(handler) = self.chain.get(self.cursor).cloned() {
                self.cursor += 1;
                tracing::trace!(handler = handler.name(), position = self.cursor, "calling handler");
                if let Err(e) = handler.call(self).await {
                    // A wrapping handler may swallow the error; nothing past
                    // the failing handler runs either way.
                    self.cursor = self.chain.len();
                    return Err(e);
                }
            }
            Ok(())
        })
    }

    /// Skips every handler that has not run yet.
    pub fn abort(&mut self) {
        self.cursor = self.chain.len();
        self.aborted = true;
    }

    /// Returns `true` if [`abort`](Self::abort) was called.
    #[must_use]
    pub const fn is_aborted(&self) -> bool {
        self.aborted
    }

    /// Number of handlers in the chain.
    #[must_use]
    pub fn chain_len(&self) -> usize {
        self.chain.len()
    }

    /// The request being handled.
    #[must_use]
    pub const fn request(&self) -> &Request {
        &self.request
    }

    /// Mutable access to the request, for middlewares that rewrite it.
    pub fn request_mut(&mut self) -> &mut Request {
        &mut self.request
    }

    /// The request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// The request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// The raw request body.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        self.request.body()
    }

    /// The pattern of the matched route, or `""` when nothing matched.
    #[must_use]
    pub fn path(&self) -> &str {
        self.pattern.as_deref().unwrap_or_default()
    }

    /// Returns `true` if the request matched a route.
    #[must_use]
    pub const fn is_matched(&self) -> bool {
        self.pattern.is_some()
    }

    /// A bound path parameter.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// All bound path parameters.
    #[must_use]
    pub const fn params(&self) -> &Params {
        &self.params
    }

    /// The path suffix captured by a trailing `*`.
    #[must_use]
    pub fn wildcard(&self) -> Option<&str> {
        self.wildcard.as_deref()
    }

    /// The request id.
    #[must_use]
    pub const fn request_id(&self) -> &RequestId {
        &self.request_id
    }

    /// Time since the context was created.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Typed values shared between handlers of this request.
    #[must_use]
    pub const fn extensions(&self) -> &http::Extensions {
        &self.extensions
    }

    /// Mutable access to the shared values.
    pub fn extensions_mut(&mut self) -> &mut http::Extensions {
        &mut self.extensions
    }

    /// Sets the response. Only the first response written is kept.
    pub fn set_response(&mut self, response: Response) {
        if self.response.is_some() {
            tracing::warn!(
                request_id = %self.request_id,
                status = response.status().as_u16(),
                "response already committed"
            );
            return;
        }
        self.response = Some(response);
    }

    /// Writes a plain-text response.
    pub fn text(&mut self, status: StatusCode, body: impl Into<String>) {
        self.set_response(Response::text(status, body));
    }

    /// Writes a response with an explicit content type.
    pub fn bytes(&mut self, status: StatusCode, content_type: &str, body: impl Into<Bytes>) {
        self.set_response(Response::with_body(status, content_type, body));
    }

    /// Writes a JSON response.
    ///
    /// # Errors
    ///
    /// Returns an internal error if the value cannot be serialized.
    pub fn json<T: Serialize>(&mut self, status: StatusCode, value: &T) -> HandlerResult {
        let body = serde_json::to_vec(value)
            .map_err(|e| HandlerError::internal_with_source("failed to serialize response", e))?;
        self.bytes(status, "application/json", body);
        Ok(())
    }

    /// Returns `true` once a response has been written.
    #[must_use]
    pub const fn is_committed(&self) -> bool {
        self.response.is_some()
    }

    /// The response written so far.
    #[must_use]
    pub const fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Takes the written response out of the context.
    pub fn take_response(&mut self) -> Option<Response> {
        self.response.take()
    }

    /// Consumes the context, returning the written response.
    #[must_use]
    pub fn into_response(self) -> Option<Response> {
        self.response
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("request_id", &self.request_id)
            .field("method", self.request.method())
            .field("uri", self.request.uri())
            .field("pattern", &self.pattern)
            .field("params", &self.params)
            .field("cursor", &self.cursor)
            .field("chain_len", &self.chain.len())
            .field("committed", &self.response.is_some())
            .finish_non_exhaustive()
    }
}
