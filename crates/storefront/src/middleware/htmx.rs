//! HTMX request detection.
//!
//! Cart and wishlist actions answer HTMX requests with fragments and plain
//! form posts with a redirect.

use std::convert::Infallible;

use axum::{extract::FromRequestParts, http::request::Parts};

/// Header HTMX sets on every request it issues.
pub const HX_REQUEST_HEADER: &str = "hx-request";

/// Whether the request came from HTMX.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(HxRequest(is_htmx): HxRequest) -> Response {
///     if is_htmx { fragment.into_response() } else { Redirect::to("/cart").into_response() }
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HxRequest(pub bool);

impl<S> FromRequestParts<S> for HxRequest
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_htmx = parts
            .headers
            .get(HX_REQUEST_HEADER)
            .is_some_and(|value| value.as_bytes().eq_ignore_ascii_case(b"true"));
        Ok(Self(is_htmx))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::http::Request;

    use super::*;

    async fn detect(header: Option<&str>) -> bool {
        let mut builder = Request::builder().uri("/cart/add");
        if let Some(value) = header {
            builder = builder.header(HX_REQUEST_HEADER, value);
        }
        let (mut parts, ()) = builder.body(()).unwrap().into_parts();
        HxRequest::from_request_parts(&mut parts, &()).await.unwrap().0
    }

    #[tokio::test]
    async fn test_detects_htmx_header() {
        assert!(detect(Some("true")).await);
        assert!(!detect(Some("false")).await);
        assert!(!detect(None).await);
    }
}
