//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::Arc;

use employee_api::config::ServiceConfig;
use employee_api::http::HttpServer;
use employee_api::lifecycle::{startup, Shutdown};
use employees_sdk::EmployeeClient;
use tokio::net::TcpListener;

/// A running server on an ephemeral local port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    /// URL of the employee collection.
    pub fn collection_url(&self) -> String {
        format!("http://{}/employees", self.addr)
    }

    pub fn client(&self) -> EmployeeClient {
        EmployeeClient::new(&self.collection_url())
    }

    /// Stop the server and wait for it to drain.
    #[allow(dead_code)]
    pub async fn stop(self) {
        self.shutdown.trigger();
        let _ = self.handle.await;
    }
}

/// Start a server with the given configuration on an ephemeral port.
#[allow(dead_code)]
pub async fn start_server(mut config: ServiceConfig) -> TestServer {
    config.listener.bind_address = "127.0.0.1:0".to_string();
    let employees = startup::open_collection(&config.storage).unwrap();

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config, Arc::clone(&employees));

    let handle = tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestServer {
        addr,
        shutdown,
        handle,
    }
}

/// Start a server over a fresh in-memory collection.
#[allow(dead_code)]
pub async fn start_default_server() -> TestServer {
    start_server(ServiceConfig::default()).await
}
