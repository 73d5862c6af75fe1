//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Security headers (CSP, frame and sniffing protection)
//! 5. Session lock (one request at a time per session cookie)
//! 6. Session layer (tower-sessions with in-memory store)

pub mod htmx;
pub mod request_id;
pub mod security_headers;
pub mod session;
pub mod session_lock;

pub use htmx::HxRequest;
pub use request_id::{RequestId, request_id_middleware};
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
pub use session_lock::{SessionLocks, session_lock_middleware};
