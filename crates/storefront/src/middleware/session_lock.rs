//! Per-session request serialization.
//!
//! Cart and wishlist handlers read the session record, dispatch one action
//! and write the whole record back, and the session layer persists it after
//! the handler returns. Two overlapping requests on one session would each
//! write back their own copy, losing the other's change. This layer sits
//! outside the session layer and holds a per-session mutex for the whole
//! load, dispatch and save.
//!
//! Requests without a session cookie are not serialized: each one starts a
//! fresh session no other request can see.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::Response,
};
use moka::future::Cache;
use tokio::sync::Mutex;
use tower_sessions::cookie::Cookie;

use crate::middleware::session::SESSION_COOKIE_NAME;
use crate::state::AppState;

/// Locks are dropped once a session has been quiet this long.
const LOCK_IDLE: Duration = Duration::from_secs(10 * 60);

/// One mutex per live session cookie.
#[derive(Clone)]
pub struct SessionLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self {
            locks: Cache::builder().time_to_idle(LOCK_IDLE).build(),
        }
    }
}

impl SessionLocks {
    /// The mutex guarding `session_id`, created on first use.
    pub async fn lock_for(&self, session_id: &str) -> Arc<Mutex<()>> {
        self.locks
            .get_with(session_id.to_owned(), async { Arc::new(Mutex::new(())) })
            .await
    }
}

/// Value of the session cookie, if the request carries one.
fn session_cookie(request: &Request) -> Option<String> {
    request
        .headers()
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
}

/// Middleware that runs requests sharing a session cookie one at a time.
pub async fn session_lock_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(session_id) = session_cookie(&request) else {
        return next.run(request).await;
    };

    let lock = state.session_locks().lock_for(&session_id).await;
    let _guard = lock.lock().await;
    next.run(request).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;

    use super::*;

    #[test]
    fn test_finds_session_cookie_among_others() {
        let request = Request::builder()
            .header(COOKIE, "theme=dark; lounge_session=abc123")
            .body(Body::empty())
            .unwrap();
        assert_eq!(session_cookie(&request).as_deref(), Some("abc123"));

        let anonymous = Request::builder()
            .header(COOKIE, "theme=dark")
            .body(Body::empty())
            .unwrap();
        assert!(session_cookie(&anonymous).is_none());
    }

    #[tokio::test]
    async fn test_same_session_shares_one_lock() {
        let locks = SessionLocks::default();
        let first = locks.lock_for("abc").await;
        let again = locks.lock_for("abc").await;
        let other = locks.lock_for("xyz").await;

        assert!(Arc::ptr_eq(&first, &again));
        assert!(!Arc::ptr_eq(&first, &other));

        let _held = first.lock().await;
        assert!(again.try_lock().is_err());
        assert!(other.try_lock().is_ok());
    }
}
