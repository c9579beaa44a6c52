//! rusty-fund/crates/rf-api/src/middleware.rs Middleware
//!
//! Request logging and CORS for the Rusty-Fund API.

use actix_cors::Cors;
use actix_web::middleware::Logger;

/// Access log line per request:
/// remote-ip "request-line" status-code response-size "referrer" "user-agent" time
pub fn standard_middleware() -> Logger {
    Logger::default()
}

/// The frontend is served from a different origin in development.
/// Every route is a read, so only GET is allowed.
pub fn cors_policy() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET"])
        .max_age(3600)
}
