//! `{data, error}` response envelopes.
//!
//! # Invariants
//! - `error` is `None` exactly when the operation succeeded.
//! - A failed list carries empty `data`; only `error` signals the failure.

use crate::model::entry::Entry;
use crate::repo::entry_repo::RepoError;
use serde::Serialize;

/// Failure details carried by an envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorInfo {
    /// Stable snake_case error kind.
    pub code: String,
    pub message: String,
}

impl ErrorInfo {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&RepoError> for ErrorInfo {
    fn from(value: &RepoError) -> Self {
        Self::new(value.code(), value.to_string())
    }
}

/// Uniform result shape returned by every service call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceResponse<T> {
    pub data: T,
    pub error: Option<ErrorInfo>,
}

impl<T> ServiceResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { data, error: None }
    }

    /// Failure envelope carrying `data` as the empty placeholder.
    pub fn failed(data: T, error: ErrorInfo) -> Self {
        Self {
            data,
            error: Some(error),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    pub fn into_result(self) -> Result<T, ErrorInfo> {
        match self.error {
            None => Ok(self.data),
            Some(error) => Err(error),
        }
    }
}

pub type EntryResponse = ServiceResponse<Option<Entry>>;
pub type EntryListResponse = ServiceResponse<Vec<Entry>>;
pub type DeleteResponse = ServiceResponse<()>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn error_info_uses_repo_code_and_message() {
        let id = Uuid::nil();
        let info = ErrorInfo::from(&RepoError::NotFound(id));
        assert_eq!(info.code, "not_found");
        assert!(info.message.contains(&id.to_string()));
    }

    #[test]
    fn envelope_serializes_data_and_error() {
        let failed: EntryListResponse =
            ServiceResponse::failed(Vec::new(), ErrorInfo::new("unavailable", "offline"));
        let value = serde_json::to_value(&failed).unwrap();
        assert_eq!(value["data"], serde_json::json!([]));
        assert_eq!(value["error"]["code"], "unavailable");

        let ok: DeleteResponse = ServiceResponse::ok(());
        assert!(ok.is_ok());
        assert_eq!(serde_json::to_value(&ok).unwrap()["error"], serde_json::Value::Null);
    }

    #[test]
    fn into_result_splits_on_error() {
        assert_eq!(ServiceResponse::ok(3).into_result().unwrap(), 3);
        let err = ServiceResponse::failed(0, ErrorInfo::new("storage", "disk"))
            .into_result()
            .unwrap_err();
        assert_eq!(err.code, "storage");
    }
}
