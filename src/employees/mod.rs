//! Employee resource.
//!
//! # Data Flow
//! ```text
//! /employees[/...]
//!     → handlers.rs (parse id, call collection, map outcome to status)
//!     → store::Collection
//! ```
//!
//! # Design Decisions
//! - A malformed id on a read is reported as not found; on a write it is a
//!   bad request
//! - Logical no-ops get their own status (304 update, 404 delete)

pub mod handlers;
pub mod model;

use axum::{routing::get, Router};

use crate::http::server::AppState;

pub use model::{Employee, EmployeeFields, Level};

/// Default mount point.
pub const DEFAULT_BASE_PATH: &str = "/employees";

/// Routes for the employee collection mounted at `base_path`.
///
/// The collection root and item paths answer with and without a trailing
/// slash.
pub fn router(base_path: &str) -> Router<AppState> {
    let base = base_path.trim_end_matches('/');
    let item = format!("{}/{{id}}", base);

    let collection = || get(handlers::list_employees).post(handlers::create_employee);
    let member = || {
        get(handlers::get_employee)
            .put(handlers::update_employee)
            .delete(handlers::delete_employee)
    };

    let router = Router::new()
        .route(&item, member())
        .route(&format!("{}/", item), member());

    if base.is_empty() {
        router.route("/", collection())
    } else {
        router
            .route(base, collection())
            .route(&format!("{}/", base), collection())
    }
}
