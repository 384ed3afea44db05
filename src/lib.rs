//! Employee API library.

pub mod config;
pub mod employees;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod store;

pub use config::ServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
