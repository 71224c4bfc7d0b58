//! Envelope response format for all API responses.
//!
//! Every response is wrapped in a consistent envelope:
//! ```json
//! {
//!   "status": "success",
//!   "message": "Messages retrieved successfully",
//!   "data": [ ... ]
//! }
//! ```
//! Errors use the same shape with `"status": "error"` (see `http::error`).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

/// Envelope response wrapping all successful API data.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    status_code: StatusCode,

    /// Always `"success"` for this type.
    pub status: &'static str,

    /// Human-readable outcome description.
    pub message: String,

    /// The main response payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    /// 200 OK with data.
    pub fn success(message: &str, data: T) -> Self {
        Self {
            status_code: StatusCode::OK,
            status: "success",
            message: message.to_string(),
            data: Some(data),
        }
    }

    /// 201 Created with data.
    pub fn created(message: &str, data: T) -> Self {
        Self {
            status_code: StatusCode::CREATED,
            ..Self::success(message, data)
        }
    }
}

impl ApiResponse<()> {
    /// 200 OK with no payload (e.g. password changed).
    pub fn message_only(message: &str) -> Self {
        Self {
            status_code: StatusCode::OK,
            status: "success",
            message: message.to_string(),
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let body = serde_json::to_string(&self).unwrap_or_else(|_| {
            r#"{"status":"error","message":"Failed to serialize response"}"#.to_string()
        });

        (
            self.status_code,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_shape() {
        let resp = ApiResponse::success("Messages retrieved successfully", vec![1, 2]);
        let json = serde_json::to_string(&resp).unwrap();
        assert_eq!(
            json,
            r#"{"status":"success","message":"Messages retrieved successfully","data":[1,2]}"#
        );
    }

    #[test]
    fn message_only_omits_data() {
        let resp = ApiResponse::message_only("Password updated successfully");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(!json.contains("\"data\""));
    }
}
