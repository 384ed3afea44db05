//! Employee request handlers.
//!
//! Each handler makes exactly one collection call and maps its outcome to a
//! status code and a JSON or plain-text body.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;

use crate::employees::model::Level;
use crate::http::response::{message, DocumentBody};
use crate::http::server::AppState;
use crate::store::{DeleteResult, ObjectId, StoreError, UpdateResult};

fn not_found(id: &str) -> Response {
    message(
        StatusCode::NOT_FOUND,
        format!("Failed to find an employee: ID {}", id),
    )
}

/// `GET /` : every employee.
pub async fn list_employees(State(state): State<AppState>) -> Response {
    match state.employees.list().await {
        Ok(employees) => {
            tracing::debug!(count = employees.len(), "Listed employees");
            (StatusCode::OK, Json(employees)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to list employees");
            message(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// `GET /{id}` : one employee. Malformed ids and lookup failures are both 404.
pub async fn get_employee(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let object_id = match ObjectId::parse_str(&id) {
        Ok(oid) => oid,
        Err(e) => {
            tracing::debug!(id = %id, error = %e, "Lookup with malformed id");
            return not_found(&id);
        }
    };

    match state.employees.find_by_id(&object_id).await {
        Ok(Some(employee)) => (StatusCode::OK, Json(employee)).into_response(),
        Ok(None) => {
            tracing::debug!(id = %id, "Employee not found");
            not_found(&id)
        }
        Err(e) => {
            tracing::warn!(id = %id, error = %e, "Employee lookup failed");
            not_found(&id)
        }
    }
}

/// `POST /` : insert the body as a new employee.
pub async fn create_employee(
    State(state): State<AppState>,
    DocumentBody(employee): DocumentBody,
) -> Response {
    let level = employee
        .get("level")
        .and_then(Value::as_str)
        .and_then(Level::parse);

    match state.employees.insert(employee).await {
        Ok(result) if result.acknowledged => {
            tracing::info!(id = %result.inserted_id, level = ?level, "Created employee");
            message(
                StatusCode::CREATED,
                format!("Created a new employee: ID {}.", result.inserted_id),
            )
        }
        Ok(result) => {
            tracing::error!(id = %result.inserted_id, "Insert was not acknowledged");
            message(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create a new employee.",
            )
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to create employee");
            message(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// `PUT /{id}` : merge the body into an existing employee.
pub async fn update_employee(
    State(state): State<AppState>,
    Path(id): Path<String>,
    DocumentBody(fields): DocumentBody,
) -> Response {
    let result = match ObjectId::parse_str(&id) {
        Ok(oid) => state.employees.merge_by_id(&oid, fields).await,
        Err(e) => Err(StoreError::from(e)),
    };
    update_outcome(&id, result)
}

/// Map the result of a merge to a response.
pub fn update_outcome(id: &str, result: Result<Option<UpdateResult>, StoreError>) -> Response {
    match result {
        Ok(Some(r)) if r.matched_count > 0 => {
            tracing::info!(id = %id, modified = r.modified_count, "Updated employee");
            message(StatusCode::OK, format!("Updated an employee: ID {}.", id))
        }
        Ok(Some(_)) => not_found(id),
        Ok(None) => {
            tracing::warn!(id = %id, "Update reported no result");
            message(
                StatusCode::NOT_MODIFIED,
                format!("Failed to update an employee: ID {}", id),
            )
        }
        Err(e) => {
            tracing::error!(id = %id, error = %e, "Failed to update employee");
            message(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}

/// `DELETE /{id}` : remove an employee.
pub async fn delete_employee(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let result = match ObjectId::parse_str(&id) {
        Ok(oid) => state.employees.delete_by_id(&oid).await,
        Err(e) => Err(StoreError::from(e)),
    };
    delete_outcome(&id, result)
}

/// Map the result of a delete to a response.
pub fn delete_outcome(id: &str, result: Result<Option<DeleteResult>, StoreError>) -> Response {
    match result {
        Ok(Some(r)) if r.deleted_count > 0 => {
            tracing::info!(id = %id, "Removed employee");
            message(StatusCode::ACCEPTED, format!("Removed an employee: ID {}", id))
        }
        Ok(Some(_)) => not_found(id),
        Ok(None) => {
            tracing::warn!(id = %id, "Delete reported no result");
            message(
                StatusCode::BAD_REQUEST,
                format!("Failed to remove an employee: ID {}", id),
            )
        }
        Err(e) => {
            tracing::error!(id = %id, error = %e, "Failed to remove employee");
            message(StatusCode::BAD_REQUEST, e.to_string())
        }
    }
}
