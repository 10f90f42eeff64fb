//! # HttpClient
//!
//! Every peer call is a single attempt with a 10 second timeout. Only a 200
//! counts as success; any other status becomes a [`ClientError`]. When the
//! peer answered with JSON, its `{"message"}` envelope is decoded into
//! [`ClientError::Rpc`] so the status can be relayed.
//!
//! Caller-supplied values only reach a peer through
//! [`HttpClient::get_segments`], which percent-encodes each one as a single
//! path segment.
//!
//! Responses are always decoded into a concrete type, so a GET can never be
//! issued without a destination. Use [`HttpClient::post_empty`] to discard a
//! response body.

use std::time::Duration;

use domains::dto::ErrorBody;
use reqwest::header::CONTENT_TYPE;
use reqwest::{RequestBuilder, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ClientError;

pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct HttpClient {
    base_url: String,
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self::with_client(base_url, client))
    }

    pub fn with_client(base_url: &str, client: reqwest::Client) -> Self {
        let mut base_url = base_url.to_owned();
        if !base_url.is_empty() && !base_url.ends_with('/') {
            base_url.push('/');
        }

        Self { base_url, client }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.strip_prefix('/').unwrap_or(path))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ClientError> {
        let response = self.send(self.client.get(self.url(path))).await?;
        read_success(response).await
    }

    /// GETs the path made of `segments`. `/`, `?` and `%` inside a segment
    /// are encoded, and dot segments are refused.
    pub async fn get_segments<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, ClientError> {
        let response = self.send(self.client.get(self.segments_url(segments)?)).await?;
        read_success(response).await
    }

    fn segments_url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        if let Some(segment) = segments.iter().find(|segment| matches!(**segment, "" | "." | "..")) {
            return Err(ClientError::InvalidSegment((*segment).to_owned()));
        }

        let mut url = Url::parse(&self.base_url).map_err(|_| ClientError::BaseUrl(self.base_url.clone()))?;
        url.path_segments_mut()
            .map_err(|()| ClientError::BaseUrl(self.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let response = self.send(self.client.post(self.url(path)).json(body)).await?;
        read_success(response).await
    }

    /// Posts `body` and ignores whatever the peer answers with on success.
    pub async fn post_empty<B>(&self, path: &str, body: &B) -> Result<(), ClientError>
    where
        B: Serialize + ?Sized,
    {
        self.send(self.client.post(self.url(path)).json(body)).await?;
        Ok(())
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::OK {
            return Ok(response);
        }

        tracing::debug!(url = %response.url(), status = status.as_u16(), "peer returned an error");
        Err(read_error(response).await)
    }
}

async fn read_success<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    response.json::<T>().await.map_err(|_| ClientError::UnreadableSuccess)
}

async fn read_error(response: Response) -> ClientError {
    let status = response.status().as_u16();

    let is_json = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<mime::Mime>().ok())
        .is_some_and(|content_type| content_type.essence_str() == mime::APPLICATION_JSON.essence_str());

    if !is_json {
        return ClientError::UnexpectedStatus(status);
    }

    match response.json::<ErrorBody>().await {
        Ok(body) => ClientError::Rpc { status, message: body.message },
        Err(_) => ClientError::UnreadableError(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> HttpClient {
        HttpClient::with_client(base, reqwest::Client::new())
    }

    #[test]
    fn joins_with_exactly_one_slash() {
        assert_eq!(client("http://users").url("/users/id/1"), "http://users/users/id/1");
        assert_eq!(client("http://users/").url("users/id/1"), "http://users/users/id/1");
        assert_eq!(client("http://users/").url("/claims"), "http://users/claims");
    }

    #[test]
    fn segments_are_encoded_one_by_one() {
        let url = client("http://posts").segments_url(&["posts", "../users/id/REF?x=", "uid"]).unwrap();
        assert_eq!(url.as_str(), "http://posts/posts/..%2Fusers%2Fid%2FREF%3Fx=/uid");
        assert_eq!(url.query(), None);

        let url = client("http://media/").segments_url(&["media", "content", "a%2Fb#c"]).unwrap();
        assert_eq!(url.as_str(), "http://media/media/content/a%252Fb%23c");
    }

    #[test]
    fn dot_and_empty_segments_are_refused() {
        let http = client("http://users");
        for segment in ["..", ".", ""] {
            let err = http.segments_url(&["info", segment]).unwrap_err();
            assert!(matches!(err, ClientError::InvalidSegment(ref s) if s == segment));
        }
    }

    #[test]
    fn unparseable_base_is_reported() {
        let err = client("").segments_url(&["token"]).unwrap_err();
        assert!(matches!(err, ClientError::BaseUrl(_)));
    }

    #[test]
    fn empty_base_is_left_alone() {
        assert_eq!(client("").url("/token"), "token");
    }
}
