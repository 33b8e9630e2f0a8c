// src/response.rs

use axum::{
    Json,
    response::{IntoResponse, Response},
};
use serde::{
    Deserialize, Serialize, Serializer,
    de::DeserializeOwned,
    ser::SerializeMap,
};

use crate::error::{AppError, ErrorBody};

/// Discriminated result of a mock API call as seen by clients.
///
/// Serializes to exactly one of:
/// * `{"data": <value>, "error": null}`
/// * `{"error": null}` for calls with nothing to return
/// * `{"data": null, "error": {"kind": ..., "message": ...}}`
#[derive(Debug)]
pub enum ApiResponse<T> {
    Data(T),
    Done,
    Failed(AppError),
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<Option<T>, AppError> {
        match self {
            ApiResponse::Data(data) => Ok(Some(data)),
            ApiResponse::Done => Ok(None),
            ApiResponse::Failed(err) => Err(err),
        }
    }
}

impl<T> From<Result<T, AppError>> for ApiResponse<T> {
    fn from(result: Result<T, AppError>) -> Self {
        match result {
            Ok(data) => ApiResponse::Data(data),
            Err(err) => ApiResponse::Failed(err),
        }
    }
}

impl ApiResponse<()> {
    /// Maps a data-less outcome onto `Done` rather than `Data(())`.
    pub fn done(result: Result<(), AppError>) -> Self {
        match result {
            Ok(()) => ApiResponse::Done,
            Err(err) => ApiResponse::Failed(err),
        }
    }
}

impl<T: Serialize> Serialize for ApiResponse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ApiResponse::Data(data) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("data", data)?;
                map.serialize_entry("error", &Option::<ErrorBody>::None)?;
                map.end()
            }
            ApiResponse::Done => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", &Option::<ErrorBody>::None)?;
                map.end()
            }
            ApiResponse::Failed(err) => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("data", &Option::<()>::None)?;
                map.serialize_entry("error", &err.to_body())?;
                map.end()
            }
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        match self {
            ApiResponse::Failed(err) => err.into_response(),
            ok => Json(ok).into_response(),
        }
    }
}

/// Client-side view of the envelope, used when decoding provider replies.
#[derive(Debug, Deserialize)]
#[serde(bound = "T: DeserializeOwned")]
pub struct Envelope<T> {
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<ErrorBody>,
}

impl<T: DeserializeOwned> Envelope<T> {
    pub fn into_api_response(self) -> ApiResponse<T> {
        match (self.data, self.error) {
            (_, Some(body)) => ApiResponse::Failed(AppError::from_body(body)),
            (Some(data), None) => ApiResponse::Data(data),
            (None, None) => ApiResponse::Done,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn data_envelope_has_null_error() {
        let value = serde_json::to_value(ApiResponse::Data(json!({"id": "t1"}))).unwrap();
        assert_eq!(value, json!({"data": {"id": "t1"}, "error": null}));
    }

    #[test]
    fn done_envelope_only_carries_error() {
        let value = serde_json::to_value(ApiResponse::done(Ok(()))).unwrap();
        assert_eq!(value, json!({"error": null}));
    }

    #[test]
    fn failure_envelope_has_null_data() {
        let response: ApiResponse<u32> =
            Err(AppError::NotFound("Test not found".to_string())).into();
        let value = serde_json::to_value(response).unwrap();
        assert_eq!(
            value,
            json!({"data": null, "error": {"kind": "not_found", "message": "Test not found"}})
        );
    }

    #[test]
    fn envelope_decodes_back_into_error_kind() {
        let raw = json!({"data": null, "error": {"kind": "conflict", "message": "taken"}});
        let envelope: Envelope<u32> = serde_json::from_value(raw).unwrap();
        let err = envelope.into_api_response().into_result().unwrap_err();
        assert_eq!(err, AppError::Conflict("taken".to_string()));
    }
}
