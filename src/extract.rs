use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header,
    Json,
};
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::ApiError;

/// JSON body extractor whose failures render as `{"error": ...}`.
///
/// A request without `Content-Type` decodes as `{}`. An explicit non-JSON
/// content type is still rejected with 415.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !req.headers().contains_key(header::CONTENT_TYPE) {
            let value = serde_json::from_value(serde_json::Value::Object(Default::default()))
                .map_err(|e| {
                    warn!(error = %e, "empty body does not fit request type");
                    ApiError::BadRequest("Invalid request body".into())
                })?;
            return Ok(Self(value));
        }

        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|rejection| {
            warn!(error = %rejection.body_text(), "rejected json body");
            ApiError::from(rejection)
        })?;
        Ok(Self(value))
    }
}

#[cfg(test)]
mod tests {
    use crate::{app::build_app, state::AppState, test_support::send_raw};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn missing_content_type_reads_as_empty_object() {
        let app = build_app(AppState::fake());

        let (status, ct, body) = send_raw(&app, "POST", "/faqs", None, "{}").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(ct.as_deref(), Some("application/json"));
        assert!(body["_id"].is_string());

        let (status, ct, body) = send_raw(&app, "POST", "/api/register", None, "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(ct.as_deref(), Some("application/json"));
        assert_eq!(body["error"], "Email and password are required");
    }

    #[tokio::test]
    async fn malformed_json_is_a_json_bad_request() {
        let app = build_app(AppState::fake());
        let (status, ct, body) =
            send_raw(&app, "POST", "/faqs", Some("application/json"), "{\"fruitName\": ").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(ct.as_deref(), Some("application/json"));
        assert!(body["error"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn wrong_field_type_is_a_json_error() {
        let app = build_app(AppState::fake());
        let (status, ct, body) =
            send_raw(&app, "POST", "/api/login", Some("application/json"), r#"{"email": 5}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(ct.as_deref(), Some("application/json"));
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn non_json_content_type_is_unsupported() {
        let app = build_app(AppState::fake());
        let (status, ct, body) = send_raw(&app, "POST", "/faqs", Some("text/plain"), "{}").await;
        assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
        assert_eq!(ct.as_deref(), Some("application/json"));
        assert!(body["error"].is_string());
    }
}
