use serde::Serialize;
use std::path::Path;

use crate::error::StoreError;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[derive(Serialize, Debug)]
#[serde(untagged)]
pub enum ApiResponse<T> {
    Ok { ok: bool, data: T },
    Err { ok: bool, error: ApiError },
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        ApiResponse::Ok { ok: true, data }
    }

    pub fn from_result(result: Result<T, StoreError>) -> Self {
        match result {
            Ok(data) => ApiResponse::ok(data),
            Err(err) => {
                let error = ApiError::from(err);
                ApiResponse::Err { ok: false, error }
            }
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        let details = match &err {
            StoreError::EmptyInput { field } => Some(serde_json::json!({ "field": field })),
            StoreError::DuplicateName { name } => Some(serde_json::json!({ "name": name })),
            StoreError::NotFound { entity, id } => {
                Some(serde_json::json!({ "entity": entity, "id": id }))
            }
            StoreError::NoCategorySelected | StoreError::Persistence(_) => None,
        };
        ApiError {
            code: err.code().to_string(),
            message: err.to_string(),
            details,
        }
    }
}

impl From<rusqlite::Error> for ApiError {
    fn from(err: rusqlite::Error) -> Self {
        ApiError {
            code: "DatabaseError".to_string(),
            message: "SQLite operation failed".to_string(),
            details: Some(serde_json::json!({ "error": err.to_string() })),
        }
    }
}

pub fn map_read_error(err: std::io::Error) -> ApiError {
    match err.kind() {
        std::io::ErrorKind::NotFound => ApiError {
            code: "NotFound".to_string(),
            message: "File not found".to_string(),
            details: Some(serde_json::json!({ "error": err.to_string() })),
        },
        std::io::ErrorKind::PermissionDenied => ApiError {
            code: "PermissionDenied".to_string(),
            message: "Permission denied".to_string(),
            details: Some(serde_json::json!({ "error": err.to_string() })),
        },
        _ => ApiError {
            code: "Unknown".to_string(),
            message: "Failed to read file".to_string(),
            details: Some(serde_json::json!({ "error": err.to_string() })),
        },
    }
}

pub fn map_write_error(message: &str, err: std::io::Error) -> ApiError {
    let code = match err.kind() {
        std::io::ErrorKind::PermissionDenied => "PermissionDenied",
        std::io::ErrorKind::NotFound => "NotFound",
        _ => "WriteFailed",
    };
    ApiError {
        code: code.to_string(),
        message: message.to_string(),
        details: Some(serde_json::json!({ "error": err.to_string() })),
    }
}

pub fn write_error_with_context(
    message: &str,
    err: std::io::Error,
    step: &str,
    path: &Path,
) -> ApiError {
    let code = match err.kind() {
        std::io::ErrorKind::PermissionDenied => "PermissionDenied",
        std::io::ErrorKind::NotFound => "NotFound",
        _ => "WriteFailed",
    };
    ApiError {
        code: code.to_string(),
        message: message.to_string(),
        details: Some(serde_json::json!({
            "step": step,
            "path": path.to_string_lossy().to_string(),
            "error": err.to_string()
        })),
    }
}

pub fn encode_error(message: &str, err: serde_json::Error) -> ApiError {
    ApiError {
        code: "WriteFailed".to_string(),
        message: message.to_string(),
        details: Some(serde_json::json!({ "error": err.to_string() })),
    }
}
