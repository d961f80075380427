use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use url::Url;

use super::models::ProfileData;
use crate::config::ApiConfig;
use crate::loading::RequestTracker;
use crate::{Error, Result};

/// Anything that can produce the profile aggregate
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch_profile(&self) -> Result<ProfileData>;
}

/// JSON client for the portfolio backend
///
/// Every call, read or write, is wrapped by the shared [`RequestTracker`], keyed
/// by the request path, so loading state is observable without polling. When an
/// admin token is configured it is sent as `Authorization: Token <token>`.
pub struct ApiClient {
    client: Client,
    base_url: String,
    user_id: AtomicU64,
    tracker: RequestTracker,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, tracker: RequestTracker) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();
        // Validate once up front so later joins cannot fail on the base
        Url::parse(&base_url)?;

        let client = Client::builder()
            .timeout(config.request_timeout())
            .default_headers(Self::default_headers(config.admin_token.as_deref())?)
            .build()
            .map_err(Error::Http)?;

        tracing::info!(
            base_url = %base_url,
            user_id = config.user_id,
            admin = config.admin_token.is_some(),
            "API client ready"
        );

        Ok(Self {
            client,
            base_url,
            user_id: AtomicU64::new(config.user_id),
            tracker,
        })
    }

    fn default_headers(admin_token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = admin_token {
            let mut value = HeaderValue::from_str(&format!("Token {}", token))
                .map_err(|_| Error::Config("admin token is not a valid header value".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }
        Ok(headers)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    pub fn user_id(&self) -> u64 {
        self.user_id.load(Ordering::Relaxed)
    }

    pub fn set_user_id(&self, user_id: u64) {
        self.user_id.store(user_id, Ordering::Relaxed);
    }

    /// Request path of the profile aggregate; also its endpoint key
    pub fn profile_endpoint(&self) -> String {
        format!("/api/users/{}/profile/", self.user_id())
    }

    pub async fn get_profile(&self) -> Result<ProfileData> {
        let endpoint = self.profile_endpoint();
        let profile: ProfileData = self.get_json(&endpoint).await?;
        tracing::info!(
            username = %profile.user.username,
            projects = profile.projects.len(),
            "Profile loaded"
        );
        Ok(profile)
    }

    /// GET `endpoint` and decode the JSON body
    ///
    /// The endpoint stays marked in flight until the call settles; errors are
    /// returned unchanged after the marker is released.
    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let body = self.send(Method::GET, endpoint, None::<&()>).await?;
        Ok(serde_json::from_slice(&body)?)
    }

    /// POST a JSON body and decode the JSON reply
    pub async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let reply = self.send(Method::POST, endpoint, Some(body)).await?;
        Ok(serde_json::from_slice(&reply)?)
    }

    pub async fn put_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let reply = self.send(Method::PUT, endpoint, Some(body)).await?;
        Ok(serde_json::from_slice(&reply)?)
    }

    pub async fn patch_json<B, T>(&self, endpoint: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let reply = self.send(Method::PATCH, endpoint, Some(body)).await?;
        Ok(serde_json::from_slice(&reply)?)
    }

    /// Send a JSON body with `method`, ignoring any reply body
    pub async fn submit<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: &B,
    ) -> Result<()> {
        self.send(method, endpoint, Some(body)).await?;
        Ok(())
    }

    /// DELETE `endpoint`; any reply body is ignored
    pub async fn delete(&self, endpoint: &str) -> Result<()> {
        self.send(Method::DELETE, endpoint, None::<&()>).await?;
        Ok(())
    }

    /// Issue one tracked request and return the body of a success reply
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>> {
        let url = Url::parse(&format!("{}{}", self.base_url, endpoint))?;
        self.tracker
            .track(endpoint, self.send_untracked(method, url, endpoint, body))
            .await
    }

    async fn send_untracked<B: Serialize + ?Sized>(
        &self,
        method: Method,
        url: Url,
        endpoint: &str,
        body: Option<&B>,
    ) -> Result<Vec<u8>> {
        tracing::debug!(%method, url = %url, "Request");
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.body(serde_json::to_vec(body)?);
        }
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), endpoint, "API request failed");
            return Err(Error::ApiStatus {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
                endpoint: endpoint.to_string(),
            });
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[async_trait]
impl ProfileSource for ApiClient {
    async fn fetch_profile(&self) -> Result<ProfileData> {
        self.get_profile().await
    }
}

#[cfg(test)]
pub(crate) mod test_server {
    use std::net::SocketAddr;

    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::sync::mpsc;

    /// Serve the same canned response to every connection, reporting each request
    /// (head and body) as text
    pub async fn serve(
        status_line: &'static str,
        body: &'static str,
    ) -> (SocketAddr, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (tx, rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let text = String::from_utf8_lossy(&head).to_string();
                let body_len = text
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                let head_len = head
                    .windows(4)
                    .position(|w| w == b"\r\n\r\n")
                    .map(|i| i + 4)
                    .unwrap_or(head.len());
                while head.len() < head_len + body_len {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => break,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let _ = tx.send(String::from_utf8_lossy(&head).to_string());

                let response = format!(
                    "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                    status_line,
                    body.len(),
                    body
                );
                let _ = socket.write_all(response.as_bytes()).await;
                let _ = socket.shutdown().await;
            }
        });

        (addr, rx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::fixtures::PROFILE_JSON;

    fn client_for(base_url: String, tracker: &RequestTracker) -> ApiClient {
        let config = ApiConfig {
            base_url,
            request_timeout_secs: 5,
            ..Default::default()
        };
        ApiClient::new(&config, tracker.clone()).unwrap()
    }

    fn drain(rx: &mut tokio::sync::broadcast::Receiver<crate::loading::LoadingEvent>) -> Vec<bool> {
        let mut seen = Vec::new();
        while let Ok(event) = rx.try_recv() {
            assert_eq!(event.endpoint, "/api/users/1/profile/");
            seen.push(event.loading);
        }
        seen
    }

    #[tokio::test]
    async fn test_get_profile_tracks_request() {
        let (addr, mut requests) = test_server::serve("200 OK", PROFILE_JSON).await;
        let tracker = RequestTracker::default();
        let mut events = tracker.subscribe();
        let client = client_for(format!("http://{}/", addr), &tracker);

        let profile = client.get_profile().await.unwrap();
        assert_eq!(profile.user.username, "jdoe");
        assert!(!tracker.is_loading());
        assert_eq!(drain(&mut events), vec![true, false]);

        let head = requests.recv().await.unwrap();
        assert!(head.starts_with("GET /api/users/1/profile/ HTTP/1.1"));
        assert!(head.to_ascii_lowercase().contains("content-type: application/json"));
    }

    #[tokio::test]
    async fn test_error_status_releases_marker() {
        let (addr, _requests) = test_server::serve("404 Not Found", "{}").await;
        let tracker = RequestTracker::default();
        let mut events = tracker.subscribe();
        let client = client_for(format!("http://{}", addr), &tracker);

        let err = client.get_profile().await.unwrap_err();
        assert!(matches!(err, Error::ApiStatus { status: 404, .. }));
        assert!(err.to_string().starts_with("API request failed: 404 Not Found"));
        assert!(!tracker.is_loading());
        assert_eq!(drain(&mut events), vec![true, false]);
    }

    #[tokio::test]
    async fn test_malformed_body_is_json_error() {
        let (addr, _requests) = test_server::serve("200 OK", "{\"user\": 42}").await;
        let tracker = RequestTracker::default();
        let client = client_for(format!("http://{}", addr), &tracker);

        let err = client.get_profile().await.unwrap_err();
        assert!(matches!(err, Error::Json(_)));
        assert!(!tracker.is_loading());
    }

    #[tokio::test]
    async fn test_connection_refused_releases_marker() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let tracker = RequestTracker::default();
        let mut events = tracker.subscribe();
        let client = client_for(format!("http://{}", addr), &tracker);

        let err = client.get_profile().await.unwrap_err();
        assert!(matches!(err, Error::Http(_)));
        assert!(err.is_transient());
        assert!(!tracker.is_loading());
        assert_eq!(drain(&mut events), vec![true, false]);
    }

    #[tokio::test]
    async fn test_user_id_changes_endpoint() {
        let tracker = RequestTracker::default();
        let client = client_for("http://localhost:8000".to_string(), &tracker);
        assert_eq!(client.profile_endpoint(), "/api/users/1/profile/");
        client.set_user_id(42);
        assert_eq!(client.user_id(), 42);
        assert_eq!(client.profile_endpoint(), "/api/users/42/profile/");
    }

    fn admin_client(base_url: String, tracker: &RequestTracker) -> ApiClient {
        let config = ApiConfig {
            base_url,
            admin_token: Some("s3cret".to_string()),
            ..Default::default()
        };
        ApiClient::new(&config, tracker.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_post_sends_body_and_token() {
        let (addr, mut requests) =
            test_server::serve("201 Created", r#"{"id": 9, "title": "New"}"#).await;
        let tracker = RequestTracker::default();
        let mut events = tracker.subscribe();
        let client = admin_client(format!("http://{}", addr), &tracker);

        let reply: serde_json::Value = client
            .post_json("/api/users/1/projects/", &serde_json::json!({ "title": "New" }))
            .await
            .unwrap();
        assert_eq!(reply["id"], 9);

        let request = requests.recv().await.unwrap();
        assert!(request.starts_with("POST /api/users/1/projects/ HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("authorization: token s3cret"));
        assert!(request.ends_with(r#"{"title":"New"}"#));

        let mut seen = Vec::new();
        while let Ok(event) = events.try_recv() {
            assert_eq!(event.endpoint, "/api/users/1/projects/");
            seen.push(event.loading);
        }
        assert_eq!(seen, vec![true, false]);
    }

    #[tokio::test]
    async fn test_put_and_patch_methods() {
        let (addr, mut requests) = test_server::serve("200 OK", "{}").await;
        let tracker = RequestTracker::default();
        let client = admin_client(format!("http://{}", addr), &tracker);

        let _: serde_json::Value = client
            .put_json("/api/users/1/projects/3/", &serde_json::json!({ "title": "Edited" }))
            .await
            .unwrap();
        let _: serde_json::Value = client
            .patch_json("/api/users/profile/", &serde_json::json!({ "bio": "Hi" }))
            .await
            .unwrap();

        assert!(requests.recv().await.unwrap().starts_with("PUT /api/users/1/projects/3/ "));
        assert!(requests.recv().await.unwrap().starts_with("PATCH /api/users/profile/ "));
    }

    #[tokio::test]
    async fn test_delete_accepts_empty_reply() {
        let (addr, mut requests) = test_server::serve("204 No Content", "").await;
        let tracker = RequestTracker::default();
        let client = admin_client(format!("http://{}", addr), &tracker);

        client.delete("/api/users/1/skills/4/").await.unwrap();
        assert!(!tracker.is_loading());
        assert!(requests.recv().await.unwrap().starts_with("DELETE /api/users/1/skills/4/ "));
    }

    #[tokio::test]
    async fn test_rejected_write_releases_marker() {
        let (addr, _requests) = test_server::serve("403 Forbidden", r#"{"detail": "no"}"#).await;
        let tracker = RequestTracker::default();
        let client = admin_client(format!("http://{}", addr), &tracker);

        let err = client.delete("/api/users/1/projects/3/").await.unwrap_err();
        assert!(matches!(err, Error::ApiStatus { status: 403, .. }));
        assert!(!err.is_transient());
        assert!(!tracker.is_loading());
    }

    #[tokio::test]
    async fn test_no_token_no_authorization_header() {
        let (addr, mut requests) = test_server::serve("200 OK", PROFILE_JSON).await;
        let tracker = RequestTracker::default();
        let client = client_for(format!("http://{}", addr), &tracker);

        client.get_profile().await.unwrap();
        let head = requests.recv().await.unwrap().to_ascii_lowercase();
        assert!(!head.contains("authorization"));
    }

    #[test]
    fn test_invalid_token_is_config_error() {
        let config = ApiConfig {
            admin_token: Some("bad\ntoken".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            ApiClient::new(&config, RequestTracker::default()),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_invalid_base_url() {
        let config = ApiConfig {
            base_url: "not a url".to_string(),
            ..Default::default()
        };
        assert!(matches!(
            ApiClient::new(&config, RequestTracker::default()),
            Err(Error::UrlParse(_))
        ));
    }
}
