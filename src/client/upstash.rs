//! HTTP client for the Upstash management API.
//!
//! Every call issues exactly one request. There are no retries: a failed
//! request surfaces immediately as an [`UpstashError`].

use crate::config::ClientConfig;
use crate::error::{UpstashError, UpstashResult};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use tracing::{debug, warn};
use url::Url;

/// Management API client authenticated with account email and API key.
#[derive(Debug, Clone)]
pub struct UpstashClient {
    http: Client,
    base_url: Url,
    email: String,
    api_key: String,
}

impl UpstashClient {
    pub fn new(config: ClientConfig) -> UpstashResult<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("upstash-mcp-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| UpstashError::internal(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: ensure_slash(&config.base_url),
            email: config.email,
            api_key: config.api_key,
        })
    }

    /// Build an API URL from path segments. Segments are percent-encoded,
    /// so caller-supplied ids cannot change the path shape. Empty and dot
    /// segments are refused since the url crate would drop or fold them.
    pub fn endpoint(&self, segments: &[&str]) -> UpstashResult<Url> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(UpstashError::invalid_input(
                "id",
                format!("'{bad}' is not a valid path segment"),
            ));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| UpstashError::internal(format!("API URL cannot be a base: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> UpstashResult<T> {
        let url = self.endpoint(segments)?;
        let response = self.send(self.request(Method::GET, url)).await?;
        decode_json(response).await
    }

    pub async fn get_with_query<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: &[(&str, &str)],
    ) -> UpstashResult<T> {
        let url = self.endpoint(segments)?;
        let response = self
            .send(self.request(Method::GET, url).query(query))
            .await?;
        decode_json(response).await
    }

    pub async fn post<B, T>(&self, segments: &[&str], body: &B) -> UpstashResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(segments)?;
        let response = self
            .send(self.request(Method::POST, url).json(body))
            .await?;
        decode_json(response).await
    }

    /// POST and return the provider's confirmation (usually `"OK"`).
    pub async fn post_text<B>(&self, segments: &[&str], body: &B) -> UpstashResult<String>
    where
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments)?;
        let response = self
            .send(self.request(Method::POST, url).json(body))
            .await?;
        decode_text(response).await
    }

    pub async fn patch_text(&self, segments: &[&str]) -> UpstashResult<String> {
        let url = self.endpoint(segments)?;
        let response = self.send(self.request(Method::PATCH, url)).await?;
        decode_text(response).await
    }

    pub async fn delete(&self, segments: &[&str]) -> UpstashResult<String> {
        let url = self.endpoint(segments)?;
        let response = self.send(self.request(Method::DELETE, url)).await?;
        decode_text(response).await
    }

    /// Run a command pipeline against a database's own REST endpoint.
    pub async fn pipeline(
        &self,
        rest_url: &Url,
        token: &str,
        commands: &[Vec<String>],
    ) -> UpstashResult<Vec<JsonValue>> {
        let mut url = ensure_slash(rest_url);
        url.path_segments_mut()
            .map_err(|_| UpstashError::invalid_input("database_rest_url", "URL cannot be a base"))?
            .pop_if_empty()
            .push("pipeline");

        debug!(method = "POST", url = %url, commands = commands.len(), "Sending pipeline");
        let response = self
            .send(self.http.post(url).bearer_auth(token).json(commands))
            .await?;
        decode_json(response).await
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(method = %method, path = %url.path(), "Sending Upstash API request");
        self.http
            .request(method, url)
            .basic_auth(&self.email, Some(&self.api_key))
    }

    async fn send(&self, request: RequestBuilder) -> UpstashResult<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        warn!(status = status.as_u16(), "Upstash request failed");
        Err(UpstashError::api(status.as_u16(), error_message(&body, status.as_str())))
    }
}

/// Makes sure a url has a trailing slash, so joining keeps the base path.
fn ensure_slash(url: &Url) -> Url {
    if url.path().ends_with('/') {
        url.clone()
    } else {
        let mut new_url = url.clone();
        let mut path = new_url.path().to_string();
        path.push('/');
        new_url.set_path(&path);
        new_url
    }
}

/// Pull a readable message out of an error body. The provider sends either a
/// JSON string, `{"error": "..."}`, or plain text.
fn error_message(body: &str, fallback: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return fallback.to_string();
    }
    match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(JsonValue::String(s)) => s,
        Ok(JsonValue::Object(obj)) => obj
            .get("error")
            .or_else(|| obj.get("message"))
            .and_then(JsonValue::as_str)
            .map(String::from)
            .unwrap_or_else(|| trimmed.to_string()),
        _ => trimmed.to_string(),
    }
}

async fn decode_json<T: DeserializeOwned>(response: Response) -> UpstashResult<T> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        debug!(error = %e, "Failed to parse Upstash response");
        UpstashError::invalid_response(format!("error decoding response body: {e}"))
    })
}

async fn decode_text(response: Response) -> UpstashResult<String> {
    let body = response.text().await?;
    Ok(match serde_json::from_str::<JsonValue>(&body) {
        Ok(JsonValue::String(s)) => s,
        _ => body.trim().to_string(),
    })
}
