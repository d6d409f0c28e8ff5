//! Low-level HTTP connector.
//!
//! Handles authentication and raw requests. API sections receive a clone
//! of the connector and build paths, query params and bodies on top of it.

use std::sync::Arc;

use reqwest::{multipart, Client, Response, StatusCode};
use serde::Serialize;
use url::Url;

use crate::client::Config;
use crate::common::Tag;
use crate::error::{ApiErrorView, CybsiError, Result, SemanticErrorCodes};

const USER_AGENT: &str = concat!("cybsi-rs/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP plumbing behind [`CybsiClient`](crate::CybsiClient).
///
/// Cheaply cloneable; clones reference the same underlying connection pool.
#[derive(Clone)]
pub(crate) struct Connector {
    http: Client,
    base_url: Arc<Url>,
    api_key: Arc<str>,
}

impl std::fmt::Debug for Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connector")
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl Connector {
    pub(crate) fn new(config: &Config) -> Result<Self> {
        // Ensure base URL ends with / so joins keep the path prefix
        let base_url_str = if config.api_url.ends_with('/') {
            config.api_url.clone()
        } else {
            format!("{}/", config.api_url)
        };
        let base_url = Url::parse(&base_url_str)?;

        let http = Client::builder()
            .user_agent(USER_AGENT)
            .brotli(true)
            .gzip(true)
            .deflate(true)
            .danger_accept_invalid_certs(!config.ssl_verify)
            .timeout(config.timeout)
            .build()
            .map_err(CybsiError::Http)?;

        Ok(Self {
            http,
            base_url: Arc::new(base_url),
            api_key: Arc::from(config.api_key.as_str()),
        })
    }

    pub(crate) fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an absolute API path against the base URL.
    ///
    /// Section paths start with `/`; joining them verbatim would drop the
    /// base URL path prefix (e.g. `/api`), so the leading slash is stripped.
    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    /// Make a GET request. Repeated keys in `params` become repeated
    /// query parameters.
    #[tracing::instrument(skip(self))]
    pub(crate) async fn do_get(&self, path: &str, params: &[(String, String)]) -> Result<Response> {
        let mut req = self.http.get(self.url(path)?).bearer_auth(&self.api_key);
        if !params.is_empty() {
            req = req.query(params);
        }
        let response = req.send().await.map_err(CybsiError::Http)?;
        Self::check_response(response).await
    }

    /// Make a POST request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub(crate) async fn do_post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response> {
        let response = self
            .http
            .post(self.url(path)?)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(CybsiError::Http)?;
        Self::check_response(response).await
    }

    /// Make a POST request with multipart body (artifact upload).
    #[tracing::instrument(skip(self, form))]
    pub(crate) async fn do_post_multipart(
        &self,
        path: &str,
        form: multipart::Form,
    ) -> Result<Response> {
        let response = self
            .http
            .post(self.url(path)?)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(CybsiError::Http)?;
        Self::check_response(response).await
    }

    /// Make a PUT request with JSON body.
    #[tracing::instrument(skip(self, body))]
    pub(crate) async fn do_put<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response> {
        let response = self
            .http
            .put(self.url(path)?)
            .bearer_auth(&self.api_key)
            .json(body)
            .send()
            .await
            .map_err(CybsiError::Http)?;
        Self::check_response(response).await
    }

    /// Make a PATCH request with JSON body.
    ///
    /// The tag must come from a fresh view of the resource; it is sent as
    /// `If-Match` and a stale value maps to
    /// [`CybsiError::ResourceModified`].
    #[tracing::instrument(skip(self, body))]
    pub(crate) async fn do_patch<B: Serialize + ?Sized>(
        &self,
        path: &str,
        tag: &Tag,
        body: &B,
    ) -> Result<Response> {
        let response = self
            .http
            .patch(self.url(path)?)
            .bearer_auth(&self.api_key)
            .header(reqwest::header::IF_MATCH, tag.as_str())
            .json(body)
            .send()
            .await
            .map_err(CybsiError::Http)?;
        Self::check_response(response).await
    }

    /// Make a DELETE request.
    #[tracing::instrument(skip(self))]
    pub(crate) async fn do_delete(&self, path: &str) -> Result<Response> {
        let response = self
            .http
            .delete(self.url(path)?)
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(CybsiError::Http)?;
        Self::check_response(response).await
    }

    /// GET a paginated list endpoint and wrap the response into a
    /// [`Page`](crate::pagination::Page).
    pub(crate) async fn get_page<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        params: Vec<(String, String)>,
    ) -> Result<crate::pagination::Page<T>> {
        let response = self.do_get(path, &params).await?;
        crate::pagination::Page::from_response(self.clone(), path.to_string(), params, response)
            .await
    }

    /// Check response status and convert protocol errors.
    async fn check_response(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let view = Self::extract_error_view(response, status).await;
        Err(match status {
            StatusCode::BAD_REQUEST => CybsiError::InvalidRequest(view),
            StatusCode::UNAUTHORIZED => CybsiError::Unauthorized(view),
            StatusCode::FORBIDDEN => CybsiError::Forbidden(view),
            StatusCode::NOT_FOUND => CybsiError::NotFound,
            StatusCode::CONFLICT => CybsiError::Conflict(view),
            StatusCode::PRECONDITION_FAILED => CybsiError::ResourceModified,
            StatusCode::UNPROCESSABLE_ENTITY => CybsiError::Semantic {
                code: Self::semantic_code(&view),
                view,
            },
            s if s.is_server_error() => CybsiError::Internal(view),
            s => CybsiError::UnexpectedStatus {
                status: s.as_u16(),
                message: view.message,
            },
        })
    }

    /// Extract the error body of a failed response.
    async fn extract_error_view(response: Response, status: StatusCode) -> ApiErrorView {
        let body = match response.text().await {
            Ok(b) => b,
            Err(_) => return ApiErrorView::from_text(status, String::new()),
        };
        match serde_json::from_str::<ApiErrorView>(&body) {
            Ok(view) => view,
            Err(_) => ApiErrorView::from_text(status, body),
        }
    }

    fn semantic_code(view: &ApiErrorView) -> SemanticErrorCodes {
        serde_json::from_value(serde_json::Value::String(view.code.clone()))
            .unwrap_or(SemanticErrorCodes::Unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connector(api_url: &str) -> Connector {
        Connector::new(&Config::new(api_url, "test-key")).unwrap()
    }

    #[test]
    fn debug_does_not_leak_key() {
        let c = connector("https://cybsi.example.com/api");
        let debug = format!("{:?}", c);
        assert!(debug.contains("base_url"));
        assert!(!debug.contains("test-key"));
    }

    #[test]
    fn base_url_trailing_slash() {
        let c1 = connector("https://cybsi.example.com/api");
        let c2 = connector("https://cybsi.example.com/api/");
        assert_eq!(c1.base_url().as_str(), c2.base_url().as_str());
    }

    #[test]
    fn url_keeps_base_path_prefix() {
        let c = connector("https://cybsi.example.com/api");
        let url = c.url("/observable/entities").unwrap();
        assert_eq!(
            url.as_str(),
            "https://cybsi.example.com/api/observable/entities"
        );
    }

    #[test]
    fn semantic_code_falls_back_to_unknown() {
        let view = ApiErrorView {
            code: "NotInThisCrateYet".to_string(),
            message: String::new(),
            details: None,
        };
        assert_eq!(Connector::semantic_code(&view), SemanticErrorCodes::Unknown);
    }
}
