//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use todo_service::config::ServiceConfig;
use todo_service::http::HttpServer;
use todo_service::lifecycle::Shutdown;
use todo_service::store::{MemoryStore, TodoStore};

/// A running server on an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a server backed by a fresh in-memory store.
#[allow(dead_code)]
pub async fn start_server() -> TestServer {
    start_server_with(ServiceConfig::default(), Arc::new(MemoryStore::new())).await
}

/// Start a server with the given config and store.
pub async fn start_server_with(config: ServiceConfig, store: Arc<dyn TodoStore>) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, store);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer { addr, shutdown }
}

/// HTTP client that never pools or proxies, for test stability.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
