//! Fetching posts from a running blog-list backend.

use super::normalize::records_from_value;
use anyhow::{Context, Result};
use futures::future::try_join_all;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

const BLOGS_PATH: &str = "/api/blogs";

/// Settings for the HTTP client.
#[derive(Debug, Clone)]
pub struct RemoteConfig {
    /// Bearer token sent with every request.
    pub token: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
    /// Whether to show a spinner while fetching.
    pub show_progress: bool,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            token: None,
            timeout_seconds: 30,
            show_progress: true,
        }
    }
}

/// Build the listing URL for a backend.
///
/// `http://host:3003` and `http://host:3003/` become
/// `http://host:3003/api/blogs`; a URL that already points at the listing is
/// used as-is.
pub fn blogs_endpoint(base: &str) -> String {
    let trimmed = base.trim_end_matches('/');
    if trimmed.ends_with(BLOGS_PATH) {
        trimmed.to_string()
    } else {
        format!("{}{}", trimmed, BLOGS_PATH)
    }
}

/// Client for the blog listing endpoint.
pub struct RemoteSource {
    config: RemoteConfig,
    http_client: reqwest::Client,
}

impl RemoteSource {
    /// Create a new client.
    pub fn new(config: RemoteConfig) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self::with_client(config, http_client))
    }

    /// Use an already configured client. Its own timeout applies.
    pub fn with_client(config: RemoteConfig, http_client: reqwest::Client) -> Self {
        Self {
            config,
            http_client,
        }
    }

    /// Fetch every backend concurrently. One batch per backend, in the
    /// order of `bases`.
    pub async fn fetch_all(&self, bases: &[String]) -> Result<Vec<Vec<Value>>> {
        let spinner = self.spinner(bases.len());

        let result = try_join_all(bases.iter().map(|base| self.fetch(base))).await;

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        result
    }

    /// Fetch the records served by one backend.
    pub async fn fetch(&self, base: &str) -> Result<Vec<Value>> {
        let url = blogs_endpoint(base);
        info!("Fetching blogs from {}", url);

        let mut request = self.http_client.get(&url);
        if let Some(ref token) = self.config.token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                anyhow::anyhow!(
                    "Request to {} timed out after {}s",
                    url,
                    self.config.timeout_seconds
                )
            } else if e.is_connect() {
                anyhow::anyhow!("Cannot connect to blog backend at {}", url)
            } else {
                anyhow::anyhow!("Failed to send request to {}: {}", url, e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Blog API error {} from {}: {}", status, url, body));
        }

        let body: Value = response
            .json()
            .await
            .with_context(|| format!("Failed to parse response from {}", url))?;

        let records = records_from_value(body)
            .with_context(|| format!("Unexpected response shape from {}", url))?;

        debug!("Received {} records from {}", records.len(), url);
        Ok(records)
    }

    fn spinner(&self, count: usize) -> Option<ProgressBar> {
        if !self.config.show_progress {
            return None;
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Fetching blogs from {} backend(s)...", count));
        pb.enable_steady_tick(Duration::from_millis(100));
        Some(pb)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer one request on a loopback port with a canned response.
    /// The handle yields the raw request head.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
        delay: Duration,
    ) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();

            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap_or(0);
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            tokio::time::sleep(delay).await;

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            // The client may already have given up on this request.
            let _ = socket.write_all(response.as_bytes()).await;
            let _ = socket.shutdown().await;

            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}", addr), handle)
    }

    fn local_source(token: Option<&str>) -> RemoteSource {
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        RemoteSource::with_client(
            RemoteConfig {
                token: token.map(String::from),
                timeout_seconds: 5,
                show_progress: false,
            },
            client,
        )
    }

    #[test]
    fn test_blogs_endpoint() {
        assert_eq!(
            blogs_endpoint("http://localhost:3003"),
            "http://localhost:3003/api/blogs"
        );
        assert_eq!(
            blogs_endpoint("http://localhost:3003/"),
            "http://localhost:3003/api/blogs"
        );
        assert_eq!(
            blogs_endpoint("https://blogs.example.com/api/blogs/"),
            "https://blogs.example.com/api/blogs"
        );
    }

    #[test]
    fn test_remote_config_default() {
        let config = RemoteConfig::default();
        assert!(config.token.is_none());
        assert_eq!(config.timeout_seconds, 30);
        assert!(config.show_progress);
    }

    #[tokio::test]
    async fn test_fetch_sends_bearer_token() {
        let (base, server) = serve_once(
            "200 OK",
            r#"[{"title": "React patterns", "author": "Michael Chan", "url": "https://reactpatterns.com/", "likes": 7}]"#,
            Duration::ZERO,
        )
        .await;

        let records = local_source(Some("secret")).fetch(&base).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["title"], "React patterns");

        let request = server.await.unwrap().to_lowercase();
        assert!(request.starts_with("get /api/blogs http/1.1"), "{}", request);
        assert!(request.contains("authorization: bearer secret"), "{}", request);
    }

    #[tokio::test]
    async fn test_fetch_without_token_sends_no_authorization() {
        let (base, server) =
            serve_once("200 OK", r#"{"blogs": []}"#, Duration::ZERO).await;

        let records = local_source(None).fetch(&base).await.unwrap();
        assert!(records.is_empty());

        let request = server.await.unwrap().to_lowercase();
        assert!(!request.contains("authorization:"), "{}", request);
    }

    #[tokio::test]
    async fn test_fetch_error_status_includes_body() {
        let (base, server) = serve_once(
            "401 Unauthorized",
            r#"{"error": "token invalid"}"#,
            Duration::ZERO,
        )
        .await;

        let err = local_source(Some("stale")).fetch(&base).await.unwrap_err();
        let message = err.to_string();
        assert!(message.starts_with("Blog API error 401"), "{}", message);
        assert!(message.contains("/api/blogs"), "{}", message);
        assert!(message.contains("token invalid"), "{}", message);
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_rejects_unexpected_shape() {
        let (base, server) = serve_once("200 OK", r#"{"count": 3}"#, Duration::ZERO).await;

        let err = local_source(None).fetch(&base).await.unwrap_err();
        assert!(err.to_string().contains("Unexpected response shape"));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_all_keeps_backend_order() {
        // The first backend answers last.
        let (slow, slow_server) = serve_once(
            "200 OK",
            r#"[{"title": "slow one"}, {"title": "slow two"}]"#,
            Duration::from_millis(200),
        )
        .await;
        let (fast, fast_server) =
            serve_once("200 OK", r#"[{"title": "fast"}]"#, Duration::ZERO).await;

        let batches = local_source(None).fetch_all(&[slow, fast]).await.unwrap();
        let titles: Vec<Vec<&str>> = batches
            .iter()
            .map(|batch| batch.iter().map(|r| r["title"].as_str().unwrap()).collect())
            .collect();

        assert_eq!(titles, vec![vec!["slow one", "slow two"], vec!["fast"]]);
        slow_server.await.unwrap();
        fast_server.await.unwrap();
    }

    #[tokio::test]
    async fn test_fetch_all_fails_if_any_backend_fails() {
        let (ok, _ok_server) = serve_once("200 OK", "[]", Duration::ZERO).await;
        let (broken, _broken_server) =
            serve_once("500 Internal Server Error", "boom", Duration::ZERO).await;

        let err = local_source(None).fetch_all(&[ok, broken]).await.unwrap_err();
        assert!(err.to_string().starts_with("Blog API error 500"), "{}", err);
    }

    #[test]
    fn test_fetch_unreachable_backend() {
        let result = tokio_test::block_on(async {
            let source = RemoteSource::new(RemoteConfig {
                token: Some("secret".to_string()),
                timeout_seconds: 2,
                show_progress: false,
            })?;
            // Nothing listens on the discard port on loopback.
            source.fetch("http://127.0.0.1:9").await
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_fetch_all_empty() {
        let batches = tokio_test::block_on(async {
            let source = RemoteSource::new(RemoteConfig {
                show_progress: false,
                ..Default::default()
            })?;
            source.fetch_all(&[]).await
        })
        .unwrap();
        assert!(batches.is_empty());
    }
}
