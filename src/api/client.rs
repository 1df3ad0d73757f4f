//! HTTP client for IONOS Cloud APIs

use anyhow::Result;
use reqwest::{header, Client, Method, RequestBuilder};
use serde_json::Value;
use tracing::{debug, trace};

use crate::api::product::Product;
use crate::api::query::ListRequest;
use crate::api::response::{ApiErrorBody, ApiResponse, ResponseMeta};
use crate::config::Credentials;
use crate::error::CliError;

pub const USER_AGENT: &str = concat!("ionosctl/", env!("CARGO_PKG_VERSION"));

/// Client for one product API
#[derive(Clone)]
pub struct IonosClient {
    http: Client,
    product: Product,
    base_url: String,
    credentials: Credentials,
}

impl IonosClient {
    pub fn new(http: Client, product: Product, base_url: String, credentials: Credentials) -> Self {
        Self {
            http,
            product,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
        }
    }

    pub fn product(&self) -> Product {
        self.product
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs (e.g. request-status links) are used untouched
    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            path.to_string()
        } else if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Build request with authentication headers
    fn build_request(&self, method: Method, url: &str) -> RequestBuilder {
        let req = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json");

        match &self.credentials {
            Credentials::Token(token) => req.bearer_auth(token),
            Credentials::Basic { username, password } => req.basic_auth(username, Some(password)),
        }
    }

    async fn execute(&self, method: Method, req: RequestBuilder, url: &str) -> Result<ApiResponse> {
        let response = req.send().await?;

        let status = response.status();
        let headers = response.headers();
        let meta = ResponseMeta {
            status: status.as_u16(),
            location: header_value(headers, header::LOCATION.as_str()),
            request_id: header_value(headers, "x-request-id"),
        };

        let text = response.text().await?;
        trace!("{} {} -> {}: {}", method, url, status, text);

        if !status.is_success() {
            let message = ApiErrorBody::summarize(&text).unwrap_or(text);
            return Err(CliError::Api {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let body = if text.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&text)?
        };

        Ok(ApiResponse { body, meta })
    }

    /// Make a GET request to the API
    pub async fn get(&self, path: &str) -> Result<ApiResponse> {
        let url = self.url(path);
        debug!("GET {}", url);
        let req = self.build_request(Method::GET, &url);
        self.execute(Method::GET, req, &url).await
    }

    /// GET a collection with its query parameters
    pub async fn list(&self, request: ListRequest) -> Result<ApiResponse> {
        let url = self.url(&request.path);
        debug!("GET {} {:?}", url, request.query);
        let req = self.build_request(Method::GET, &url).query(&request.query);
        self.execute(Method::GET, req, &url).await
    }

    /// Make a POST request to the API
    pub async fn post(&self, path: &str, body: Value) -> Result<ApiResponse> {
        self.send_json(Method::POST, path, body).await
    }

    /// Make a PUT request to the API
    pub async fn put(&self, path: &str, body: Value) -> Result<ApiResponse> {
        self.send_json(Method::PUT, path, body).await
    }

    /// Make a PATCH request to the API
    pub async fn patch(&self, path: &str, body: Value) -> Result<ApiResponse> {
        self.send_json(Method::PATCH, path, body).await
    }

    /// Make a DELETE request to the API
    pub async fn delete(&self, path: &str) -> Result<ApiResponse> {
        let url = self.url(path);
        debug!("DELETE {}", url);
        let req = self.build_request(Method::DELETE, &url);
        self.execute(Method::DELETE, req, &url).await
    }

    async fn send_json(&self, method: Method, path: &str, body: Value) -> Result<ApiResponse> {
        let url = self.url(path);
        debug!("{} {} with body: {}", method, url, body);
        let req = self.build_request(method.clone(), &url).json(&body);
        self.execute(method, req, &url).await
    }
}

fn header_value(headers: &header::HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> IonosClient {
        IonosClient::new(
            Client::new(),
            Product::Cdn,
            base.to_string(),
            Credentials::Token("t".into()),
        )
    }

    #[test]
    fn test_url_joining() {
        let c = client("https://cdn.de-fra.ionos.com/");
        assert_eq!(c.url("/distributions"), "https://cdn.de-fra.ionos.com/distributions");
        assert_eq!(c.url("distributions"), "https://cdn.de-fra.ionos.com/distributions");
        assert_eq!(
            c.url("https://api.ionos.com/cloudapi/v6/requests/1/status"),
            "https://api.ionos.com/cloudapi/v6/requests/1/status"
        );
    }
}
