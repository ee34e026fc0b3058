//! End-to-end requests over a real socket.

use std::time::Duration;

use bytes::Bytes;
use http::{Method, StatusCode};
use http_body_util::{BodyExt, Full};
use hyper_util::rt::TokioIo;
use tokio::net::{TcpListener, TcpStream};
use waypoint_config::ServerConfig;
use waypoint_core::{handler_fn, HandlerError, REQUEST_ID_HEADER};
use waypoint_server::{App, Routes, Server, ShutdownSignal};

struct Running {
    addr: std::net::SocketAddr,
    shutdown: ShutdownSignal,
    handle: tokio::task::JoinHandle<Result<(), waypoint_server::ServerError>>,
}

async fn start(app: App, request_timeout_ms: u64) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let config = ServerConfig {
        http_addr: addr.to_string(),
        shutdown_timeout_secs: 1,
        request_timeout_ms,
    };

    let shutdown = ShutdownSignal::new();
    let server = Server::new(app, config);
    let handle = tokio::spawn(server.serve(listener, shutdown.clone()));

    Running {
        addr,
        shutdown,
        handle,
    }
}

async fn send(
    addr: std::net::SocketAddr,
    method: Method,
    path: &str,
    headers: &[(&str, &str)],
) -> (StatusCode, http::HeaderMap, String) {
    let stream = TcpStream::connect(addr).await.unwrap();
    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .unwrap();
    tokio::spawn(conn);

    let mut builder = http::Request::builder()
        .method(method)
        .uri(path)
        .header(http::header::HOST, addr.to_string());
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Full::new(Bytes::new())).unwrap();

    let response = sender.send_request(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

fn app() -> App {
    let app = App::new();
    app.get(
        "/1/users/:id",
        [handler_fn(|ctx| {
            Box::pin(async move {
                let id = ctx.param("id").unwrap_or_default().to_string();
                ctx.text(StatusCode::OK, id);
                Ok(())
            })
        })],
    )
    .unwrap();
    app.get(
        "/1/functions/*",
        [handler_fn(|ctx| {
            Box::pin(async move {
                let rest = ctx.wildcard().unwrap_or_default().to_string();
                ctx.text(StatusCode::OK, rest);
                Ok(())
            })
        })],
    )
    .unwrap();
    app.get(
        "/forbidden",
        [handler_fn(|_ctx| {
            Box::pin(async { Err(HandlerError::forbidden("no entry")) })
        })],
    )
    .unwrap();
    app.get(
        "/slow",
        [handler_fn(|ctx| {
            Box::pin(async move {
                tokio::time::sleep(Duration::from_secs(5)).await;
                ctx.text(StatusCode::OK, "too late");
                Ok(())
            })
        })],
    )
    .unwrap();
    app
}

#[tokio::test]
async fn test_serves_matched_routes() {
    let server = start(app(), 30_000).await;

    let (status, _, body) = send(server.addr, Method::GET, "/1/users/AbC", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "AbC");

    let (status, _, body) = send(server.addr, Method::GET, "/1/functions/foo/bar", &[]).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "foo/bar");

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_wrong_method_is_not_found() {
    let server = start(app(), 30_000).await;

    let (status, _, body) = send(server.addr, Method::DELETE, "/1/users/abc", &[]).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, "Not Found");

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_handler_error_carries_request_id() {
    let server = start(app(), 30_000).await;
    let id = "0190b5a8-7c2e-7d3f-8a4b-123456789abc";

    let (status, _, body) = send(
        server.addr,
        Method::GET,
        "/forbidden",
        &[(REQUEST_ID_HEADER, id)],
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["error"]["code"], "FORBIDDEN");
    assert_eq!(json["request_id"], id);

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_request_timeout() {
    let server = start(app(), 50).await;

    let (status, _, body) = send(server.addr, Method::GET, "/slow", &[]).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert!(body.contains("TIMEOUT"));

    server.shutdown.trigger();
    server.handle.await.unwrap().unwrap();
}
