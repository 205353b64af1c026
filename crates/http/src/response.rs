//! JSON envelope shared by every bookshelf response

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Outcome tag carried in the `status` field of the envelope
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    /// Request handled
    Success,
    /// Client-side problem (400/404)
    Fail,
    /// Server-side problem (500)
    Error,
}

/// `{ "status": ..., "message": ..., "data": ... }`; absent parts are omitted
#[derive(Debug, Serialize)]
pub struct ApiResponse<T = ()> {
    pub status: ResponseStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip)]
    code: StatusCode,
}

impl<T> ApiResponse<T> {
    /// Successful response carrying `data`
    pub fn success(data: T) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: None,
            data: Some(data),
            code: StatusCode::OK,
        }
    }

    /// Attach a human-readable message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Override the HTTP status code (defaults to 200)
    pub fn with_code(mut self, code: StatusCode) -> Self {
        self.code = code;
        self
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }
}

impl ApiResponse<()> {
    /// Successful response with only a message
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: ResponseStatus::Success,
            message: Some(message.into()),
            data: None,
            code: StatusCode::OK,
        }
    }

    /// Failure envelope for the given status code
    pub fn failure(code: StatusCode, message: impl Into<String>) -> Self {
        let status = if code.is_server_error() {
            ResponseStatus::Error
        } else {
            ResponseStatus::Fail
        };

        Self {
            status,
            message: Some(message.into()),
            data: None,
            code,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_envelope_omits_message() {
        let body = serde_json::to_value(ApiResponse::success(json!({"bookId": "abc"}))).unwrap();
        assert_eq!(
            body,
            json!({"status": "success", "data": {"bookId": "abc"}})
        );
    }

    #[test]
    fn message_envelope_omits_data() {
        let response = ApiResponse::message("done");
        assert_eq!(response.code(), StatusCode::OK);
        let body = serde_json::to_value(response).unwrap();
        assert_eq!(body, json!({"status": "success", "message": "done"}));
    }

    #[test]
    fn failure_status_follows_code() {
        let fail = ApiResponse::failure(StatusCode::NOT_FOUND, "missing");
        assert_eq!(fail.status, ResponseStatus::Fail);

        let error = ApiResponse::failure(StatusCode::INTERNAL_SERVER_ERROR, "broken");
        assert_eq!(error.status, ResponseStatus::Error);
    }

    #[test]
    fn created_code_is_applied() {
        let response = ApiResponse::success(1)
            .with_message("created")
            .with_code(StatusCode::CREATED)
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }
}
