//! Application facade: route registration, groups and dispatch.
//!
//! [`App`] owns the route table and the not-found chain. Registration goes
//! through the [`Routes`] trait, which both `App` and [`Group`] implement, so
//! the per-method helpers (`get`, `post`, ...) read the same on either.

use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use tracing::Instrument;
use waypoint_config::WaypointConfig;
use waypoint_core::{BoxedHandler, Context, HandlerResult, NotFound, Request, Response};
use waypoint_router::{MethodFilter, RouteError, Router, SharedRouter};

/// Route registration shared by [`App`] and [`Group`].
///
/// Only [`add`](Routes::add) is required; every per-method helper forwards
/// to it.
pub trait Routes {
    /// Registers a handler chain for `method` and `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError`] when the pattern is malformed, the chain is
    /// empty or the method cannot be routed.
    fn add<I>(
        &self,
        method: impl Into<MethodFilter>,
        pattern: &str,
        handlers: I,
    ) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>;

    /// Registers a `GET` route.
    ///
    /// # Errors
    ///
    /// See [`Routes::add`].
    fn get<I>(&self, pattern: &str, handlers: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.add(http::Method::GET, pattern, handlers)
    }

    /// Registers a `POST` route.
    ///
    /// # Errors
    ///
    /// See [`Routes::add`].
    fn post<I>(&self, pattern: &str, handlers: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.add(http::Method::POST, pattern, handlers)
    }

    /// Registers a `PUT` route.
    ///
    /// # Errors
    ///
    /// See [`Routes::add`].
    fn put<I>(&self, pattern: &str, handlers: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.add(http::Method::PUT, pattern, handlers)
    }

    /// Registers a `DELETE` route.
    ///
    /// # Errors
    ///
    /// See [`Routes::add`].
    fn delete<I>(&self, pattern: &str, handlers: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.add(http::Method::DELETE, pattern, handlers)
    }

    /// Registers a `PATCH` route.
    ///
    /// # Errors
    ///
    /// See [`Routes::add`].
    fn patch<I>(&self, pattern: &str, handlers: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.add(http::Method::PATCH, pattern, handlers)
    }

    /// Registers a `HEAD` route.
    ///
    /// # Errors
    ///
    /// See [`Routes::add`].
    fn head<I>(&self, pattern: &str, handlers: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.add(http::Method::HEAD, pattern, handlers)
    }

    /// Registers an `OPTIONS` route.
    ///
    /// # Errors
    ///
    /// See [`Routes::add`].
    fn options<I>(&self, pattern: &str, handlers: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.add(http::Method::OPTIONS, pattern, handlers)
    }

    /// Registers a `CONNECT` route.
    ///
    /// # Errors
    ///
    /// See [`Routes::add`].
    fn connect<I>(&self, pattern: &str, handlers: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.add(http::Method::CONNECT, pattern, handlers)
    }

    /// Registers a `TRACE` route.
    ///
    /// # Errors
    ///
    /// See [`Routes::add`].
    fn trace<I>(&self, pattern: &str, handlers: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.add(http::Method::TRACE, pattern, handlers)
    }

    /// Registers a route under all nine routable methods.
    ///
    /// # Errors
    ///
    /// See [`Routes::add`].
    fn any<I>(&self, pattern: &str, handlers: I) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.add(MethodFilter::Any, pattern, handlers)
    }
}

/// A Waypoint application.
///
/// # Example
///
/// ```
/// use http::StatusCode;
/// use waypoint_core::handler_fn;
/// use waypoint_server::{App, Routes};
///
/// let app = App::new();
/// app.get("/users/:id", [handler_fn(|ctx| {
///     Box::pin(async move {
///         let id = ctx.param("id").unwrap_or_default().to_string();
///         ctx.text(StatusCode::OK, id);
///         Ok(())
///     })
/// })])
/// .unwrap();
///
/// let request = http::Request::get("/users/42").body(Default::default()).unwrap();
/// let response = tokio_test::block_on(app.dispatch(request));
/// assert_eq!(response.status(), StatusCode::OK);
/// ```
pub struct App {
    router: SharedRouter<BoxedHandler>,
    not_found: Arc<[BoxedHandler]>,
}

impl App {
    /// Creates an application with lenient parameter naming.
    #[must_use]
    pub fn new() -> Self {
        Self::with_router(Router::new())
    }

    /// Creates an application from a prepared router.
    #[must_use]
    pub fn with_router(router: Router<BoxedHandler>) -> Self {
        let not_found: Vec<BoxedHandler> = vec![Arc::new(NotFound)];
        Self {
            router: SharedRouter::new(router),
            not_found: not_found.into(),
        }
    }

    /// Creates an application using the router section of `config`.
    #[must_use]
    pub fn from_config(config: &WaypointConfig) -> Self {
        Self::with_router(Router::new().with_strict_params(config.router.strict_params))
    }

    /// Replaces the chain run for requests that match no route.
    ///
    /// An empty chain falls back to the built-in plain-text 404.
    pub fn set_not_found<I>(&mut self, handlers: I)
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        let mut chain: Vec<BoxedHandler> = handlers.into_iter().collect();
        if chain.is_empty() {
            chain.push(Arc::new(NotFound));
        }
        self.not_found = chain.into();
    }

    /// Starts a route group under `prefix`.
    #[must_use]
    pub fn group(&self, prefix: &str) -> Group {
        Group {
            router: self.router.clone(),
            prefix: prefix.to_string(),
            middlewares: Vec::new(),
        }
    }

    /// The shared route table.
    #[must_use]
    pub const fn router(&self) -> &SharedRouter<BoxedHandler> {
        &self.router
    }

    /// Number of registered routes.
    #[must_use]
    pub fn route_count(&self) -> usize {
        self.router.len()
    }

    /// Renders the route tree.
    #[must_use]
    pub fn dump_routes(&self) -> String {
        self.router.dump()
    }

    /// Logs the route tree at `debug`.
    pub fn log_routes(&self) {
        tracing::debug!(routes = self.route_count(), "route tree\n{}", self.dump_routes());
    }

    /// Runs one request through the router and its handler chain.
    ///
    /// A handler error becomes a JSON error response unless the chain had
    /// already written a response, in which case that response is kept. A
    /// chain that writes nothing yields an empty `200 OK`.
    pub async fn dispatch(&self, request: Request) -> Response {
        let method = request.method().clone();
        let uri_path = request.uri().path().to_string();

        let ctx = match self.router.find(&method, &uri_path) {
            Some(route) => Context::with_route(request, route),
            None => Context::not_found(request, Arc::clone(&self.not_found)),
        };

        let span = tracing::info_span!(
            "request",
            request_id = %ctx.request_id(),
            http.method = %method,
            http.route = %ctx.path(),
        );

        async move {
            let mut ctx = ctx;
            waypoint_telemetry::log_request_start!(
                ctx.request_id(),
                method,
                uri_path,
                ctx.path()
            );
            let result = ctx.next().await;
            finish(ctx, result)
        }
        .instrument(span)
        .await
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

impl Routes for App {
    fn add<I>(
        &self,
        method: impl Into<MethodFilter>,
        pattern: &str,
        handlers: I,
    ) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        self.router.add(method, pattern, handlers)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("routes", &self.route_count())
            .field("not_found_chain", &self.not_found.len())
            .finish()
    }
}

fn finish(mut ctx: Context, result: HandlerResult) -> Response {
    let request_id = *ctx.request_id();
    let elapsed_ms = u64::try_from(ctx.elapsed().as_millis()).unwrap_or(u64::MAX);

    let response = match result {
        Ok(()) => ctx
            .take_response()
            .unwrap_or_else(|| http::Response::new(Full::new(Bytes::new()))),
        Err(err) => {
            waypoint_telemetry::log_request_error!(request_id, err);
            match ctx.take_response() {
                Some(response) => response,
                None => err.into_response(Some(&request_id)),
            }
        }
    };

    waypoint_telemetry::log_request_complete!(request_id, response.status().as_u16(), elapsed_ms);
    response
}

/// Routes sharing a path prefix and a middleware list.
///
/// Routes registered on a group get the prefix prepended to their pattern
/// and the group's middlewares prepended to their chain. Nested groups
/// inherit both.
///
/// # Example
///
/// ```
/// use waypoint_core::handler_fn;
/// use waypoint_server::{App, Routes};
///
/// let app = App::new();
/// let mut users = app.group("/users");
/// users.use_middleware(handler_fn(|ctx| Box::pin(async move { ctx.next().await })));
///
/// users.get("/:id", [handler_fn(|_ctx| Box::pin(async { Ok(()) }))]).unwrap();
/// assert!(app.dump_routes().contains(":id"));
/// ```
#[derive(Clone)]
pub struct Group {
    router: SharedRouter<BoxedHandler>,
    prefix: String,
    middlewares: Vec<BoxedHandler>,
}

impl Group {
    /// Appends a middleware to the group.
    ///
    /// Only routes registered after this call carry the middleware.
    pub fn use_middleware(&mut self, middleware: BoxedHandler) -> &mut Self {
        self.middlewares.push(middleware);
        self
    }

    /// Starts a nested group. The prefix and middlewares carry over.
    #[must_use]
    pub fn group(&self, prefix: &str) -> Self {
        Self {
            router: self.router.clone(),
            prefix: format!("{}{prefix}", self.prefix),
            middlewares: self.middlewares.clone(),
        }
    }

    /// The group's path prefix.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Number of middlewares in front of every route of the group.
    #[must_use]
    pub fn middleware_count(&self) -> usize {
        self.middlewares.len()
    }
}

impl Routes for Group {
    fn add<I>(
        &self,
        method: impl Into<MethodFilter>,
        pattern: &str,
        handlers: I,
    ) -> Result<(), RouteError>
    where
        I: IntoIterator<Item = BoxedHandler>,
    {
        let chain = self.middlewares.iter().cloned().chain(handlers);
        self.router
            .add(method, &format!("{}{pattern}", self.prefix), chain)
    }
}

impl std::fmt::Debug for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Group")
            .field("prefix", &self.prefix)
            .field("middlewares", &self.middlewares.len())
            .finish_non_exhaustive()
    }
}
