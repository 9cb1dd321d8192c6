//! HTTP middleware for the server.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS (answers preflight before anything else runs)
//! 3. `TraceLayer` (request span with status and latency)
//! 4. Request ID (add unique ID to each request)
//! 5. Bearer token check (data routes only)

pub mod auth;
pub mod request_id;

pub use auth::require_bearer_token;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
