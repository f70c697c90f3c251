//! Bulk upload of component data (`v2/ComponentData`)

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{ApiError, Result};

/// The only upload method this client implements
pub const AWS_S3_UPLOAD_METHOD: &str = "AwsS3";

/// Where the uploaded documents are routed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UrlType {
    #[default]
    Default,
    SastTables,
}

impl UrlType {
    pub fn as_str(self) -> &'static str {
        match self {
            UrlType::Default => "Default",
            UrlType::SastTables => "SastTables",
        }
    }
}

impl fmt::Display for UrlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UrlType {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Default" => Ok(UrlType::Default),
            "SastTables" => Ok(UrlType::SastTables),
            other => Err(ApiError::InvalidUrlType(other.to_string()).into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSpec {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialUploadRequest {
    pub name: String,
    pub tags: Vec<String>,
    pub supported_methods: Vec<String>,
    pub documents: Vec<DocumentSpec>,
    pub url_type: UrlType,
}

impl InitialUploadRequest {
    /// Describe `paths` by base name and size; fails if a file can't be stat'ed
    pub fn from_paths<P: AsRef<Path>>(
        name: impl Into<String>,
        tags: Vec<String>,
        paths: &[P],
        url_type: UrlType,
    ) -> Result<Self> {
        let documents = paths
            .iter()
            .map(|path| -> Result<DocumentSpec> {
                let path = path.as_ref();
                let metadata = std::fs::symlink_metadata(path)?;
                Ok(DocumentSpec {
                    name: file_name(path),
                    size: metadata.len(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: name.into(),
            tags,
            supported_methods: vec![AWS_S3_UPLOAD_METHOD.to_string()],
            documents,
            url_type,
        })
    }
}

/// Base name under which a file is announced and uploaded
pub fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialUploadResponse {
    #[serde(default)]
    pub guid: String,
    #[serde(default)]
    pub upload_methods: Vec<UploadMethod>,
}

impl InitialUploadResponse {
    /// The last offered method named `method`
    pub fn method(&self, method: &str) -> Option<&UploadMethod> {
        self.upload_methods
            .iter()
            .rev()
            .find(|offered| offered.method == method)
    }
}

/// Upload method offered by the server: `info` maps file names to upload URLs
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UploadMethod {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub info: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteUploadRequest {
    pub upload_guid: String,
    pub url_type: UrlType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompleteUploadResponse {
    #[serde(default)]
    pub guid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_initial_request_from_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sast.db");
        std::fs::File::create(&path)
            .unwrap()
            .write_all(b"0123456789")
            .unwrap();

        let request =
            InitialUploadRequest::from_paths("scan", vec!["sast".to_string()], &[&path], UrlType::SastTables)
                .unwrap();
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "scan",
                "tags": ["sast"],
                "supportedMethods": ["AwsS3"],
                "documents": [{"name": "sast.db", "size": 10}],
                "urlType": "SastTables"
            })
        );
    }

    #[test]
    fn test_missing_file_fails() {
        let err = InitialUploadRequest::from_paths(
            "scan",
            vec![],
            &["/definitely/not/here.json"],
            UrlType::Default,
        )
        .unwrap_err();
        assert!(matches!(err, crate::error::Error::Io(_)));
    }

    #[test]
    fn test_url_type_parsing() {
        assert_eq!("SastTables".parse::<UrlType>().unwrap(), UrlType::SastTables);
        let err = "Bogus".parse::<UrlType>().unwrap_err();
        assert_eq!(err.to_string(), "Invalid URL type: (Bogus)");
    }

    #[test]
    fn test_pick_upload_method() {
        let response: InitialUploadResponse = serde_json::from_value(json!({
            "guid": "UPLOAD_1",
            "uploadMethods": [
                {"method": "GcpGcs", "info": {}},
                {"method": "AwsS3", "info": {"a.json": "https://s3/a"}}
            ]
        }))
        .unwrap();
        let method = response.method(AWS_S3_UPLOAD_METHOD).unwrap();
        assert_eq!(method.info["a.json"], "https://s3/a");
        assert!(response.method("AzureBlob").is_none());
    }
}
