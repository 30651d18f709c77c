//! Validated JSON extractor
//!
//! Extracts and validates JSON request bodies using the validator crate.

use axum::{
    async_trait,
    body::Bytes,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::response::ApiError;

/// Validated JSON extractor
///
/// Extracts a JSON body and validates it using the `validator` crate.
/// The inner type must implement both `Deserialize` and `Validate`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(|e| {
            match e {
                JsonRejection::JsonDataError(e) => ApiError::invalid_body(e.body_text()),
                JsonRejection::JsonSyntaxError(e) => ApiError::invalid_body(e.body_text()),
                JsonRejection::MissingJsonContentType(e) => ApiError::invalid_body(e.body_text()),
                JsonRejection::BytesRejection(e) => ApiError::invalid_body(e.body_text()),
                _ => ApiError::invalid_body("Invalid JSON body"),
            }
        })?;

        value.validate()?;

        Ok(ValidatedJson(value))
    }
}

/// Validated JSON body that may be absent
///
/// An empty or whitespace-only body yields `None`; anything else must parse
/// and validate like [`ValidatedJson`]. Chunked bodies work since the length
/// header is not consulted.
#[derive(Debug, Clone)]
pub struct OptionalValidatedJson<T>(pub Option<T>);

#[async_trait]
impl<S, T> FromRequest<S> for OptionalValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(OptionalValidatedJson(None));
        }

        let value: T = serde_json::from_slice(&bytes)
            .map_err(|e| ApiError::invalid_body(e.to_string()))?;
        value.validate()?;

        Ok(OptionalValidatedJson(Some(value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;
    use conv_service::{LogoutRequest, ToggleRequest};

    fn request(body: &'static str) -> Request {
        Request::post("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_missing_optional_body_is_none() {
        let OptionalValidatedJson(value) =
            OptionalValidatedJson::<LogoutRequest>::from_request(request(""), &())
                .await
                .unwrap();
        assert!(value.is_none());

        let OptionalValidatedJson(value) =
            OptionalValidatedJson::<LogoutRequest>::from_request(request(" \n"), &())
                .await
                .unwrap();
        assert!(value.is_none());
    }

    #[tokio::test]
    async fn test_optional_body_is_parsed() {
        let OptionalValidatedJson(value) = OptionalValidatedJson::<LogoutRequest>::from_request(
            request(r#"{"refresh_token":"abc"}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(value.and_then(|v| v.refresh_token).as_deref(), Some("abc"));

        let err = OptionalValidatedJson::<LogoutRequest>::from_request(request("{oops"), &())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_BODY");
    }

    #[tokio::test]
    async fn test_wrong_field_type_is_invalid_body() {
        let err = ValidatedJson::<ToggleRequest>::from_request(request(r#"{"enabled":"yes"}"#), &())
            .await
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_BODY");
    }
}
