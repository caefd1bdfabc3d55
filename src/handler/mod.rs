//! Request handler module
//!
//! Route table, request dispatch and the three route behaviors: static file,
//! JSON blob and dummy challenge.

pub mod dummy;
pub mod json_blob;
pub mod route;
pub mod router;
pub mod static_files;

// Re-export main entry points
pub use route::{RouteBehavior, RouteDefinition};
pub use router::{handle_request, Router};
