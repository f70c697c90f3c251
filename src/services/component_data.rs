//! Bulk upload of component data
//!
//! An upload is three steps: announce the files, PUT each file to the
//! pre-signed URL the server hands out, then confirm completion. Every step
//! is retried under the service's backoff policy.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use log::{debug, info};
use reqwest::{Method, StatusCode};

use crate::client::{ExponentialBackoff, LaceworkClient, Sleeper, TokioSleeper, endpoints};
use crate::error::{ApiError, Result};
use crate::models::Response;
use crate::models::component_data::{
    AWS_S3_UPLOAD_METHOD, CompleteUploadRequest, CompleteUploadResponse, InitialUploadRequest,
    InitialUploadResponse, UrlType, file_name,
};

pub struct ComponentDataService<'a> {
    client: &'a LaceworkClient,
    backoff: ExponentialBackoff,
    sleeper: Arc<dyn Sleeper>,
}

impl<'a> ComponentDataService<'a> {
    pub(crate) fn new(client: &'a LaceworkClient) -> Self {
        Self {
            client,
            backoff: ExponentialBackoff::default(),
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Replace the retry schedule
    pub fn with_backoff(mut self, backoff: ExponentialBackoff) -> Self {
        self.backoff = backoff;
        self
    }

    /// Replace what waits between attempts
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Upload documents tagged with `tags`; returns the upload guid
    pub async fn upload_files<P: AsRef<Path>>(
        &self,
        name: &str,
        tags: &[String],
        paths: &[P],
    ) -> Result<String> {
        self.upload(name, tags.to_vec(), paths, UrlType::Default)
            .await
    }

    /// Upload SAST tables; returns the upload guid
    pub async fn upload_sast_tables<P: AsRef<Path>>(&self, name: &str, paths: &[P]) -> Result<String> {
        self.upload(name, vec!["sast".to_string()], paths, UrlType::SastTables)
            .await
    }

    async fn upload<P: AsRef<Path>>(
        &self,
        name: &str,
        tags: Vec<String>,
        paths: &[P],
        url_type: UrlType,
    ) -> Result<String> {
        let initial = InitialUploadRequest::from_paths(name, tags, paths, url_type)?;
        debug!(
            "requesting upload name={} documents={} url_type={}",
            name,
            initial.documents.len(),
            url_type
        );

        let requested: Response<InitialUploadResponse> = self
            .backoff
            .retry(self.sleeper.as_ref(), || {
                self.client.request_with_body(
                    Method::POST,
                    endpoints::COMPONENT_DATA_REQUEST,
                    &initial,
                )
            })
            .await?;
        let requested = requested.data;

        let method = requested
            .method(AWS_S3_UPLOAD_METHOD)
            .ok_or(ApiError::UnsupportedUploadMethod)?;

        for path in paths {
            let path = path.as_ref();
            self.backoff
                .retry(self.sleeper.as_ref(), || self.put_file(path, &method.info))
                .await?;
        }

        let complete = CompleteUploadRequest {
            upload_guid: requested.guid.clone(),
            url_type,
        };
        let completed: Response<CompleteUploadResponse> = self
            .backoff
            .retry(self.sleeper.as_ref(), || {
                self.client.request_with_body(
                    Method::POST,
                    endpoints::COMPONENT_DATA_COMPLETE,
                    &complete,
                )
            })
            .await?;

        if completed.data.guid != requested.guid {
            return Err(ApiError::UploadGuidMismatch {
                expected: requested.guid,
                actual: completed.data.guid,
            }
            .into());
        }

        info!("upload complete guid={}", requested.guid);
        Ok(requested.guid)
    }

    /// PUT one file to its pre-signed URL
    async fn put_file(&self, path: &Path, urls: &HashMap<String, String>) -> Result<()> {
        let name = file_name(path);
        let url = urls
            .get(&name)
            .ok_or_else(|| ApiError::MissingUploadUrl(name.clone()))?;
        let contents = tokio::fs::read(path).await?;

        debug!("uploading file={} bytes={}", name, contents.len());
        let response = self
            .client
            .http()
            .put(url.as_str())
            .body(contents)
            .send()
            .await
            .map_err(ApiError::from)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Upload { status, body }.into());
        }
        Ok(())
    }
}
