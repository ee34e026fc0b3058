//! HTTP server.
//!
//! Binds a TCP listener, serves HTTP/1.1 with hyper and hands every request
//! to [`App::dispatch`]. The whole request, body collection included, runs
//! under the configured request timeout.
//!
//! # Example
//!
//! ```rust,ignore
//! use waypoint_config::WaypointConfig;
//! use waypoint_server::{App, Server};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), waypoint_server::ServerError> {
//!     let config = WaypointConfig::development();
//!     let app = App::from_config(&config);
//!     Server::from_config(app, &config).run().await
//! }
//! ```

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use http_body_util::BodyExt;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use waypoint_config::{ServerConfig, WaypointConfig};
use waypoint_core::{HandlerError, RequestId, Response, REQUEST_ID_HEADER};

use crate::app::App;
use crate::error::ServerError;
use crate::shutdown::{ConnectionTracker, ShutdownSignal};

/// The Waypoint HTTP server.
pub struct Server {
    app: Arc<App>,
    config: ServerConfig,
}

impl Server {
    /// Creates a server for `app` with the given server settings.
    #[must_use]
    pub fn new(app: App, config: ServerConfig) -> Self {
        Self {
            app: Arc::new(app),
            config,
        }
    }

    /// Creates a server from a full configuration, logging the route tree
    /// first when `router.dump_routes` is set.
    #[must_use]
    pub fn from_config(app: App, config: &WaypointConfig) -> Self {
        if config.router.dump_routes {
            app.log_routes();
        }
        Self::new(app, config.server.clone())
    }

    /// The application being served.
    #[must_use]
    pub fn app(&self) -> &App {
        &self.app
    }

    /// The server settings.
    #[must_use]
    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Runs until SIGTERM or SIGINT.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn run(self) -> Result<(), ServerError> {
        let shutdown = ShutdownSignal::with_os_signals();
        self.run_with_shutdown(shutdown).await
    }

    /// Binds the configured address and runs until `shutdown` triggers.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is invalid or cannot be bound.
    pub async fn run_with_shutdown(self, shutdown: ShutdownSignal) -> Result<(), ServerError> {
        let addr: SocketAddr =
            self.config
                .http_addr
                .parse()
                .map_err(|source| ServerError::InvalidAddress {
                    addr: self.config.http_addr.clone(),
                    source,
                })?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        self.serve(listener, shutdown).await
    }

    /// Serves connections from an already bound listener until `shutdown`
    /// triggers, then waits for open connections up to the shutdown timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener's local address cannot be read.
    pub async fn serve(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let local_addr = listener.local_addr()?;
        tracing::info!(addr = %local_addr, routes = self.app.route_count(), "Server listening");

        let request_timeout = self.config.request_timeout();
        let shutdown_timeout = self.config.shutdown_timeout();
        let tracker = ConnectionTracker::new();

        loop {
            tokio::select! {
                result = listener.accept() => {
                    match result {
                        Ok((stream, remote_addr)) => {
                            let app = Arc::clone(&self.app);
                            let token = tracker.acquire();
                            let shutdown = shutdown.clone();

                            tokio::spawn(async move {
                                if let Err(e) = handle_connection(app, stream, request_timeout, shutdown).await {
                                    tracing::error!(remote_addr = %remote_addr, error = %e, "Connection error");
                                }
                                drop(token);
                            });
                        }
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to accept connection");
                        }
                    }
                }

                () = shutdown.recv() => {
                    tracing::info!("Shutdown signal received, stopping server");
                    break;
                }
            }
        }

        tracing::info!(
            timeout = ?shutdown_timeout,
            connections = tracker.active_connections(),
            "Waiting for connections to close"
        );

        tokio::select! {
            () = tracker.wait_for_idle() => {
                tracing::info!("All connections closed");
            }
            () = tokio::time::sleep(shutdown_timeout) => {
                tracing::warn!(
                    connections = tracker.active_connections(),
                    "Shutdown timeout reached with connections still open"
                );
            }
        }

        tracing::info!("Server stopped");
        Ok(())
    }
}

impl std::fmt::Debug for Server {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Server")
            .field("app", &self.app)
            .field("config", &self.config)
            .finish()
    }
}

async fn handle_connection(
    app: Arc<App>,
    stream: TcpStream,
    request_timeout: Duration,
    shutdown: ShutdownSignal,
) -> Result<(), hyper::Error> {
    let io = TokioIo::new(stream);

    let service = service_fn(move |request: http::Request<Incoming>| {
        let app = Arc::clone(&app);
        async move { Ok::<_, Infallible>(handle_request(&app, request, request_timeout).await) }
    });

    let conn = http1::Builder::new().serve_connection(io, service);
    tokio::pin!(conn);

    tokio::select! {
        result = conn.as_mut() => result,
        () = shutdown.recv() => {
            conn.as_mut().graceful_shutdown();
            conn.await
        }
    }
}

async fn handle_request(
    app: &App,
    request: http::Request<Incoming>,
    request_timeout: Duration,
) -> Response {
    let (mut parts, body) = request.into_parts();
    let request_id = RequestId::from_headers(&parts.headers);
    if let Ok(value) = http::HeaderValue::from_str(&request_id.to_string()) {
        parts.headers.insert(REQUEST_ID_HEADER, value);
    }

    let work = async {
        let body = match body.collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) => {
                tracing::warn!(request_id = %request_id, error = %e, "Failed to read request body");
                return HandlerError::bad_request(format!("failed to read request body: {e}"))
                    .into_response(Some(&request_id));
            }
        };
        app.dispatch(http::Request::from_parts(parts, body)).await
    };

    match tokio::time::timeout(request_timeout, work).await {
        Ok(response) => response,
        Err(_) => {
            tracing::warn!(request_id = %request_id, timeout = ?request_timeout, "Request timed out");
            HandlerError::timeout("request timed out").into_response(Some(&request_id))
        }
    }
}
