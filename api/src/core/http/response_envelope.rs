//! JSON envelope shared by every route.
//!
//! Success: `{"success":true,"data":...}`.
//! Failure: `{"success":false,"error":{"code":"NOT_FOUND","message":"...","details":[...]}}`.
//! The HTTP status travels separately; `code` is what clients branch on.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    /// `AppError::error_code` value, e.g. `WEBHOOK_TIMEOUT`.
    pub code: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<ApiErrorDetail>,
}

/// Where a rejected request body went wrong, when serde says so.
#[derive(Debug, Default, Serialize)]
pub struct ApiErrorDetail {
    /// Offending field, e.g. `question_ids` or `edits`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ApiErrorDetail {
    fn is_empty(&self) -> bool {
        self.path.is_none() && self.hint.is_none()
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ApiError {
                code,
                message: message.into(),
                details: Vec::new(),
            }),
        }
    }

    /// Attaches `detail` to a failure; empty details are dropped.
    pub fn with_detail(mut self, detail: ApiErrorDetail) -> Self {
        if let Some(err) = self.error.as_mut().filter(|_| !detail.is_empty()) {
            err.details.push(detail);
        }
        self
    }

    pub fn reply(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// `Json(ApiResponse::success(data))`.
pub fn ok<T: Serialize>(data: T) -> Json<ApiResponse<T>> {
    Json(ApiResponse::success(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn success_has_no_error_key() {
        let v = serde_json::to_value(ApiResponse::success(vec!["q1"])).unwrap();
        assert_eq!(v, json!({"success": true, "data": ["q1"]}));
    }

    #[test]
    fn failure_keeps_only_useful_details() {
        let env = ApiResponse::<()>::failure("BAD_REQUEST", "missing field `edits`")
            .with_detail(ApiErrorDetail::default())
            .with_detail(ApiErrorDetail {
                path: Some("edits".into()),
                hint: None,
            });
        let v = serde_json::to_value(env).unwrap();
        assert_eq!(
            v,
            json!({
                "success": false,
                "error": {
                    "code": "BAD_REQUEST",
                    "message": "missing field `edits`",
                    "details": [{"path": "edits"}]
                }
            })
        );
    }

    #[test]
    fn detail_on_success_is_ignored() {
        let env = ApiResponse::success(1).with_detail(ApiErrorDetail {
            path: Some("x".into()),
            hint: None,
        });
        assert!(env.error.is_none());
    }
}
