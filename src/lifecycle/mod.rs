//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Open collection → Bind listener → Serve
//!
//! Shutdown (shutdown.rs, signals.rs):
//!     SIGTERM/SIGINT or Shutdown::trigger → Stop accepting → Drain → Exit
//! ```
//!
//! # Design Decisions
//! - Ordered startup: config first, then storage, then listener
//! - Storage failure at startup is the only fatal runtime error

pub mod shutdown;
pub mod signals;
pub mod startup;

pub use shutdown::Shutdown;
