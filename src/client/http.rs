//! Request building, execution and response decoding

use log::debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Method, RequestBuilder, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::LaceworkClient;
use super::auth::SECRET_HEADER;
use crate::error::{ApiError, ConfigError, Error, Result};

const JSON: &str = "application/json";

impl LaceworkClient {
    /// Build the absolute API path for a resource path.
    ///
    /// Paths with an explicit `v1/` or `v2/` prefix keep their version;
    /// everything else uses the client's configured version.
    pub fn api_path(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        if path.starts_with("v1/") || path.starts_with("v2/") {
            format!("/api/{}", path)
        } else {
            format!("/api/{}/{}", self.api_version, path)
        }
    }

    fn endpoint_url(&self, path: &str) -> Result<Url> {
        let api_path = self.api_path(path);
        self.base_url
            .join(&api_path)
            .map_err(|e| ConfigError::InvalidUrl(format!("{}: {}", api_path, e)).into())
    }

    /// Perform an authenticated request without a body and decode the response
    pub async fn request<T: DeserializeOwned>(&self, method: Method, path: &str) -> Result<T> {
        self.execute::<(), T>(method, path, None).await
    }

    /// Encode `body` as JSON, perform an authenticated request and decode the response
    pub async fn request_with_body<B, T>(&self, method: Method, path: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.execute(method, path, Some(body)).await
    }

    async fn execute<B, T>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let token = self.valid_token().await?;
        let builder = self
            .build_request(method.clone(), path, body)?
            .bearer_auth(token);
        let bytes = self.send(builder, method, path).await?;
        decode(&self.api_path(path), &bytes)
    }

    /// Token exchange: authenticated by the secret instead of a bearer token
    pub(crate) async fn send_token_request<B, T>(
        &self,
        method: Method,
        path: &str,
        body: &B,
        secret: &str,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let builder = self
            .build_request(method.clone(), path, Some(body))?
            .header(SECRET_HEADER, secret);
        let bytes = self.send(builder, method, path).await?;
        decode(&self.api_path(path), &bytes)
    }

    fn build_request<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<RequestBuilder>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint_url(path)?;

        let mut builder = self
            .http
            .request(method.clone(), url.clone())
            .headers(self.headers.clone())
            .header(ACCEPT, JSON);

        let mut sniffed = String::new();
        if let Some(body) = body {
            let json = serde_json::to_vec(body)?;
            if self.debug_mode() {
                sniffed = String::from_utf8_lossy(&json).into_owned();
            }
            builder = builder.header(CONTENT_TYPE, JSON).body(json);
        }

        debug!(
            "request id={} method={} url={} endpoint={} body={}",
            self.id,
            method,
            self.base_url,
            url.path(),
            sniffed
        );

        Ok(builder)
    }

    /// Execute a request and return the body of a successful response
    async fn send(&self, builder: RequestBuilder, method: Method, path: &str) -> Result<Vec<u8>> {
        let response = builder.send().await.map_err(ApiError::from)?;

        let status = response.status();
        let url = response.url().to_string();
        self.callbacks.response(status, response.headers());

        let body = response.bytes().await.map_err(ApiError::from)?.to_vec();

        debug!(
            "response id={} from_req_url={} code={} body={}",
            self.id,
            url,
            status.as_u16(),
            if self.debug_mode() {
                String::from_utf8_lossy(&body).into_owned()
            } else {
                String::new()
            }
        );

        if !status.is_success() {
            return Err(
                ApiError::from_response(method, url, self.api_path(path), status, &body).into(),
            );
        }

        Ok(body)
    }
}

/// Decode a response body; empty bodies decode as JSON `null`
pub(crate) fn decode<T: DeserializeOwned>(path: &str, body: &[u8]) -> Result<T> {
    let body = if body.iter().all(u8::is_ascii_whitespace) {
        b"null".as_slice()
    } else {
        body
    };
    serde_json::from_slice(body).map_err(|source| Error::Decode {
        path: path.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ApiVersion;
    use serde::Deserialize;

    fn client(version: ApiVersion) -> LaceworkClient {
        LaceworkClient::builder("demo")
            .api_version(version)
            .build()
            .unwrap()
    }

    #[test]
    fn test_api_path_v1_access_tokens() {
        assert_eq!(
            client(ApiVersion::V1).api_path("access/tokens"),
            "/api/v1/access/tokens"
        );
    }

    #[test]
    fn test_api_path_v2_external_integrations() {
        assert_eq!(
            client(ApiVersion::V2).api_path("external/integrations"),
            "/api/v2/external/integrations"
        );
    }

    #[test]
    fn test_api_path_explicit_version_wins() {
        let client = client(ApiVersion::V1);
        assert_eq!(client.api_path("v2/AlertChannels"), "/api/v2/AlertChannels");
        assert_eq!(client.api_path("/v2/AlertChannels/ID"), "/api/v2/AlertChannels/ID");
    }

    #[test]
    fn test_endpoint_url() {
        let url = client(ApiVersion::V2).endpoint_url("v2/CloudAccounts").unwrap();
        assert_eq!(url.as_str(), "https://demo.lacework.net/api/v2/CloudAccounts");
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        name: String,
    }

    #[test]
    fn test_decode() {
        let payload: Payload = decode("/api/v2/x", br#"{"name": "demo"}"#).unwrap();
        assert_eq!(payload.name, "demo");

        let unit: () = decode("/api/v2/x", b"").unwrap();
        assert_eq!(unit, ());

        let none: Option<Payload> = decode("/api/v2/x", b"  \n").unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_decode_error_carries_path() {
        let err = decode::<Payload>("/api/v2/AlertChannels", b"{not json").unwrap_err();
        match &err {
            Error::Decode { path, .. } => assert_eq!(path, "/api/v2/AlertChannels"),
            other => panic!("Expected Error::Decode, got {:?}", other),
        }
        assert!(err.to_string().contains("/api/v2/AlertChannels"));
    }
}
