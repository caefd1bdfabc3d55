//! HTTP protocol layer module
//!
//! Content-type inference, CORS header resolution and response builders,
//! decoupled from the route behaviors that use them.

pub mod cors;
pub mod mime;
pub mod response;

// Re-export commonly used items
pub use cors::CorsHeaders;
pub use response::{
    build_404_response, build_405_response, build_413_response, build_500_response,
    build_ok_response, build_preflight_response,
};
