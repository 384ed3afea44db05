//! Typed client for the Employee API.

pub mod client;

pub use client::{ClientError, EmployeeClient, NewEmployee};
