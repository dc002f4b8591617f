//! Transport-neutral response envelope.
//!
//! Every catalog request produces exactly one [`CatalogResponse`]: `ok` with
//! an operation-shaped [`Payload`], or `error` with a user-facing message.
//! The transport decides how to serialize it.

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// Shown when a single directory level cannot be listed.
pub const MSG_DIRECTORY_ACCESS: &str = "Server is unable to access the directory.";
/// Shown when the store fails during a scan or search.
pub const MSG_NO_RESPONSE: &str = "Server not responding.";
/// Prefix of the short-query message; the minimum length follows.
pub const MSG_MIN_SEARCH: &str = "Minimum search characters: ";
/// Shown for an undecodable folder selection.
pub const MSG_INVALID_FOLDERS: &str = "Invalid folder data";
/// Shown for an unrecognized function name.
pub const MSG_UNKNOWN_FUNCTION: &str = "Unknown function";
/// Shown when a requested file does not exist.
pub const MSG_NOT_FOUND: &str = "Audio not found";
/// Shown when the request was abandoned before completion.
pub const MSG_CANCELLED: &str = "Request cancelled.";

/// Successful result, shaped per operation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Payload {
    /// One directory level.
    Listing {
        path: String,
        dirs: Vec<String>,
        files: Vec<String>,
    },
    /// Title search matches.
    Titles(Vec<String>),
    /// Directory paths (search matches or the full tree).
    Directories(Vec<String>),
    /// Audio file paths.
    Files(Vec<String>),
}

/// Outcome of one catalog request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CatalogResponse {
    Ok {
        callback: String,
        payload: Payload,
    },
    Error {
        callback: String,
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
}

impl CatalogResponse {
    pub fn ok(callback: impl Into<String>, payload: Payload) -> Self {
        Self::Ok {
            callback: callback.into(),
            payload,
        }
    }

    /// Project an error into a user-facing message.
    pub fn failure(callback: impl Into<String>, err: &CatalogError) -> Self {
        let (message, path) = match err {
            CatalogError::DirectoryAccess { path, .. } => {
                (MSG_DIRECTORY_ACCESS.to_string(), Some(path.clone()))
            }
            CatalogError::StoreUnavailable(_) => (MSG_NO_RESPONSE.to_string(), None),
            CatalogError::QueryTooShort { min } => (format!("{MSG_MIN_SEARCH}{min}"), None),
            CatalogError::InvalidRequestPayload(_) => (MSG_INVALID_FOLDERS.to_string(), None),
            CatalogError::FileNotFound(path) => (MSG_NOT_FOUND.to_string(), Some(path.clone())),
            CatalogError::UnknownFunction(_) => (MSG_UNKNOWN_FUNCTION.to_string(), None),
            CatalogError::Cancelled => (MSG_CANCELLED.to_string(), None),
        };
        Self::Error {
            callback: callback.into(),
            message,
            path,
        }
    }

    /// The envelope returned when a request runs out of time.
    pub fn timed_out(callback: impl Into<String>) -> Self {
        Self::Error {
            callback: callback.into(),
            message: MSG_NO_RESPONSE.to_string(),
            path: None,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }

    pub fn callback(&self) -> &str {
        match self {
            Self::Ok { callback, .. } | Self::Error { callback, .. } => callback,
        }
    }

    /// The payload of a successful response.
    pub fn payload(&self) -> Option<&Payload> {
        match self {
            Self::Ok { payload, .. } => Some(payload),
            Self::Error { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tunetree_store::StoreError;

    #[test]
    fn ok_listing_json_shape() {
        let response = CatalogResponse::ok(
            "getBrowserData",
            Payload::Listing {
                path: "jazz".into(),
                dirs: vec!["bebop".into()],
                files: vec!["miles.mp3".into()],
            },
        );
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "ok",
                "callback": "getBrowserData",
                "payload": {
                    "listing": {"path": "jazz", "dirs": ["bebop"], "files": ["miles.mp3"]}
                }
            })
        );
    }

    #[test]
    fn error_json_omits_missing_path() {
        let response = CatalogResponse::failure("getSearchTitle", &CatalogError::QueryTooShort { min: 1 });
        assert_eq!(
            serde_json::to_value(&response).unwrap(),
            json!({
                "status": "error",
                "callback": "getSearchTitle",
                "message": "Minimum search characters: 1"
            })
        );
    }

    #[test]
    fn directory_access_echoes_path() {
        let err = CatalogError::DirectoryAccess {
            path: "jazz".into(),
            source: StoreError::Unavailable("down".into()),
        };
        match CatalogResponse::failure("getBrowserData", &err) {
            CatalogResponse::Error { message, path, .. } => {
                assert_eq!(message, MSG_DIRECTORY_ACCESS);
                assert_eq!(path.as_deref(), Some("jazz"));
            }
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn store_failure_hides_details() {
        let err = CatalogError::StoreUnavailable(StoreError::Unavailable("secret-host:443".into()));
        let response = CatalogResponse::failure("getAllMp3Data", &err);
        let text = serde_json::to_string(&response).unwrap();
        assert!(text.contains(MSG_NO_RESPONSE));
        assert!(!text.contains("secret-host"));
    }

    #[test]
    fn envelope_deserializes() {
        let response = CatalogResponse::ok("getAllDirsData", Payload::Directories(vec!["".into(), "a".into()]));
        let text = serde_json::to_string(&response).unwrap();
        let back: CatalogResponse = serde_json::from_str(&text).unwrap();
        assert_eq!(back, response);
        assert_eq!(back.payload(), Some(&Payload::Directories(vec!["".into(), "a".into()])));
    }

    #[test]
    fn timed_out_is_error() {
        let response = CatalogResponse::timed_out("getAllMp3Data");
        assert!(response.is_error());
        assert_eq!(response.callback(), "getAllMp3Data");
        assert!(response.payload().is_none());
    }
}
