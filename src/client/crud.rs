//! Generic CRUD primitive shared by every resource service
//!
//! Each service describes its resource with an [`Endpoint`] and delegates the
//! five verbs to [`Crud`]; response envelopes (`{"data": ...}`) are unwrapped
//! here so services deal in resource types only.

use log::debug;
use reqwest::Method;
use serde::Serialize;
use serde::de::{DeserializeOwned, IgnoredAny};

use super::LaceworkClient;
use crate::error::{ConfigError, Result};
use crate::models::{ListResponse, Response};

/// Descriptor of a resource collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Endpoint {
    /// Collection path, e.g. `v2/AlertChannels`
    pub collection: &'static str,
    /// Human readable resource name used in errors and logs
    pub resource: &'static str,
}

impl Endpoint {
    pub const fn new(collection: &'static str, resource: &'static str) -> Self {
        Self {
            collection,
            resource,
        }
    }

    /// Path of one resource, or of a sub-collection selected by `param`.
    ///
    /// `param` is percent-encoded so it always stays a single path segment.
    pub fn item_path(&self, param: &str) -> String {
        format!("{}/{}", self.collection, urlencoding::encode(param))
    }
}

/// CRUD verbs over one [`Endpoint`]
#[derive(Debug, Clone, Copy)]
pub struct Crud<'a> {
    client: &'a LaceworkClient,
    endpoint: Endpoint,
}

impl<'a> Crud<'a> {
    pub fn new(client: &'a LaceworkClient, endpoint: Endpoint) -> Self {
        Self { client, endpoint }
    }

    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    pub fn client(&self) -> &'a LaceworkClient {
        self.client
    }

    pub(crate) fn require_guid(&self, guid: &str) -> Result<()> {
        if guid.trim().is_empty() {
            return Err(ConfigError::MissingGuid(self.endpoint.resource).into());
        }
        Ok(())
    }

    /// GET the whole collection
    pub async fn list<T: DeserializeOwned>(&self) -> Result<Vec<T>> {
        debug!("listing {}", self.endpoint.resource);
        let response: ListResponse<T> = self
            .client
            .request(Method::GET, self.endpoint.collection)
            .await?;
        Ok(response.data)
    }

    /// GET the collection filtered by a path parameter (e.g. a sub-type)
    pub async fn list_by<T: DeserializeOwned>(&self, param: &str) -> Result<Vec<T>> {
        let response: ListResponse<T> = self
            .client
            .request(Method::GET, &self.endpoint.item_path(param))
            .await?;
        Ok(response.data)
    }

    /// GET one resource by guid
    pub async fn get<T: DeserializeOwned>(&self, guid: &str) -> Result<T> {
        self.require_guid(guid)?;
        let response: Response<T> = self
            .client
            .request(Method::GET, &self.endpoint.item_path(guid))
            .await?;
        Ok(response.data)
    }

    /// POST a new resource
    pub async fn create<B, T>(&self, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        debug!("creating {}", self.endpoint.resource);
        let response: Response<T> = self
            .client
            .request_with_body(Method::POST, self.endpoint.collection, payload)
            .await?;
        Ok(response.data)
    }

    /// PATCH an existing resource
    pub async fn update<B, T>(&self, guid: &str, payload: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.require_guid(guid)?;
        debug!("updating {} guid={}", self.endpoint.resource, guid);
        let response: Response<T> = self
            .client
            .request_with_body(Method::PATCH, &self.endpoint.item_path(guid), payload)
            .await?;
        Ok(response.data)
    }

    /// DELETE a resource; the response body is ignored
    pub async fn delete(&self, guid: &str) -> Result<()> {
        self.require_guid(guid)?;
        debug!("deleting {} guid={}", self.endpoint.resource, guid);
        let _: IgnoredAny = self
            .client
            .request(Method::DELETE, &self.endpoint.item_path(guid))
            .await?;
        Ok(())
    }
}
