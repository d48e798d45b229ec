pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

// Re-export the record handlers to make them easily accessible
// to the binary that will build the web server router.
pub use middleware::require_auth;
pub use rest::{insert_record_handler, list_records_handler};
