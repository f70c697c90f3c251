//! Error types for the Lacework SDK

use reqwest::{Method, StatusCode};
use thiserror::Error;

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type for the SDK
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unable to decode response from {path}: {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl Error {
    /// HTTP status code of the failed request, if the server answered
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Api(err) => err.status(),
            _ => None,
        }
    }

    /// Whether the server answered 404 Not Found
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

/// Errors raised while talking to the API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    #[error("[{method}] {url}: [{}] {message}", .status.as_u16())]
    Status {
        method: Method,
        url: String,
        path: String,
        status: StatusCode,
        message: String,
    },

    #[error("Invalid API response: {0}")]
    InvalidResponse(String),

    #[error("Upload failed ({status}): {body}")]
    Upload { status: StatusCode, body: String },

    #[error("Upload of {0} failed: no upload URL was assigned to this file")]
    MissingUploadUrl(String),

    #[error("Couldn't find a supported upload method in the upload request response")]
    UnsupportedUploadMethod,

    #[error("Expected the initial upload guid '{expected}' and the one returned on completion '{actual}' to match")]
    UploadGuidMismatch { expected: String, actual: String },

    #[error("Invalid URL type: ({0})")]
    InvalidUrlType(String),
}

impl ApiError {
    /// Build a status error, extracting the server message from the body when it is JSON
    pub(crate) fn from_response(
        method: Method,
        url: String,
        path: String,
        status: StatusCode,
        body: &[u8],
    ) -> Self {
        ApiError::Status {
            method,
            url,
            path,
            status,
            message: error_message(status, body),
        }
    }

    /// HTTP status code carried by this error
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } | ApiError::Upload { status, .. } => Some(*status),
            ApiError::Transport(err) => err.status(),
            _ => None,
        }
    }
}

/// Pull the most useful message out of an error body.
///
/// The API answers errors as `{"message": ...}` or `{"data": {"message": ...}}`;
/// anything else falls back to the raw body, then to the canonical reason.
fn error_message(status: StatusCode, body: &[u8]) -> String {
    if let Ok(value) = serde_json::from_slice::<serde_json::Value>(body) {
        let message = value
            .get("message")
            .or_else(|| value.get("data").and_then(|data| data.get("message")))
            .and_then(|message| message.as_str());
        if let Some(message) = message {
            return message.to_string();
        }
    }

    let text = String::from_utf8_lossy(body);
    let text = text.trim();
    if !text.is_empty() {
        return text.to_string();
    }

    status
        .canonical_reason()
        .unwrap_or("Unknown status")
        .to_string()
}

/// Errors detected locally, before any request is sent
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("specify a guid: {0} operations require a resource identifier")]
    MissingGuid(&'static str),

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("unable to generate access token: auth keys missing")]
    MissingApiKeys,

    #[error("account cannot be empty")]
    EmptyAccount,

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("invalid log level '{0}'")]
    InvalidLogLevel(String),

    #[error("invalid api version '{0}', expected v1 or v2")]
    InvalidApiVersion(String),

    #[error("invalid header '{0}'")]
    InvalidHeader(String),

    #[error("Configuration file not found: {0}")]
    NotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Profile '{0}' not found in configuration")]
    MissingProfile(String),
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn not_found() -> ApiError {
        ApiError::from_response(
            Method::GET,
            "https://demo.lacework.net/api/v2/AlertChannels/TECHALLY_000".to_string(),
            "/api/v2/AlertChannels/TECHALLY_000".to_string(),
            StatusCode::NOT_FOUND,
            br#"{"message": "Not Found"}"#,
        )
    }

    #[test]
    fn test_status_error_contains_path_and_code() {
        let msg = not_found().to_string();
        assert!(msg.contains("/api/v2/AlertChannels/TECHALLY_000"));
        assert!(msg.contains("404"));
        assert!(msg.contains("Not Found"));
        assert!(msg.contains("GET"));
    }

    #[test]
    fn test_error_message_from_nested_data() {
        let msg = error_message(
            StatusCode::BAD_REQUEST,
            br#"{"data": {"message": "invalid filter"}}"#,
        );
        assert_eq!(msg, "invalid filter");
    }

    #[test]
    fn test_error_message_falls_back_to_body_then_reason() {
        assert_eq!(
            error_message(StatusCode::BAD_GATEWAY, b"upstream gone"),
            "upstream gone"
        );
        assert_eq!(
            error_message(StatusCode::INTERNAL_SERVER_ERROR, b""),
            "Internal Server Error"
        );
    }

    #[test]
    fn test_not_found_helpers() {
        let err: Error = not_found().into();
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

        let err: Error = ConfigError::MissingApiKeys.into();
        assert!(!err.is_not_found());
        assert_eq!(err.status(), None);
    }

    #[test]
    fn test_config_error_missing_guid() {
        let err = ConfigError::MissingGuid("alert channel");
        let msg = err.to_string();
        assert!(msg.contains("specify a guid"));
        assert!(msg.contains("alert channel"));
    }

    #[test]
    fn test_config_error_missing_keys() {
        let err = ConfigError::MissingApiKeys;
        assert!(err.to_string().contains("auth keys missing"));
    }

    #[test]
    fn test_upload_guid_mismatch_message() {
        let err = ApiError::UploadGuidMismatch {
            expected: "G1".to_string(),
            actual: "G2".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("G1"));
        assert!(msg.contains("G2"));
    }

    #[test]
    fn test_error_from_config_error() {
        let err: Error = ConfigError::EmptyAccount.into();
        match err {
            Error::Config(ConfigError::EmptyAccount) => (),
            _ => panic!("Expected Error::Config(ConfigError::EmptyAccount)"),
        }
    }

    #[test]
    fn test_config_error_from_yaml_error() {
        let yaml_err = serde_yaml::from_str::<serde_yaml::Value>("invalid: [yaml: content")
            .unwrap_err();
        let config_err: ConfigError = yaml_err.into();
        match config_err {
            ConfigError::ParseError(_) => (),
            _ => panic!("Expected ConfigError::ParseError"),
        }
    }
}
