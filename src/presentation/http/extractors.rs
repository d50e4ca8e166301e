use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

const X_REQUESTED_WITH: &str = "x-requested-with";

/// Only lets `X-Requested-With: XMLHttpRequest` calls through; anything
/// else gets a plain 404, as if the route did not exist.
pub struct AjaxRequest;

#[axum::async_trait]
impl<S> FromRequestParts<S> for AjaxRequest
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let is_ajax = parts
            .headers
            .get(X_REQUESTED_WITH)
            .and_then(|v| v.to_str().ok())
            .map(|v| v == "XMLHttpRequest")
            .unwrap_or(false);
        if is_ajax {
            Ok(AjaxRequest)
        } else {
            Err(StatusCode::NOT_FOUND)
        }
    }
}
