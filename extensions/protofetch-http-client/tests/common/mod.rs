#![allow(dead_code)]

use axum::Router;
use example_protofetch_http_server::{DemoHttpServer, utils::bind_tcp_listener_on_random_port};

/// Starts `server` on a random local port and returns its base URL.
pub async fn spawn_demo_server(server: &DemoHttpServer) -> String {
    let (listener, addr) = bind_tcp_listener_on_random_port().await.unwrap();

    let server = server.clone();
    tokio::spawn(async move {
        let _ = server.serve_with_listener(listener).await;
    });

    format!("http://{}", addr)
}

/// Starts an arbitrary router on a random local port and returns its base URL.
pub async fn spawn_router(router: Router) -> String {
    let (listener, addr) = bind_tcp_listener_on_random_port().await.unwrap();

    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    format!("http://{}", addr)
}
