use async_trait::async_trait;
use serde_json::Value;
use std::time::Instant;

use crate::metrics::UPSTREAM_LATENCY;

// How a single lookup attempt can fail. One attempt per incoming
// request, never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamError {
    Timeout,
    NotFound,
    Http,
    Unknown,
}

// Account profile as reported by the lookup service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileSnapshot {
    pub nickname: String,
    pub likes: u64,
}

#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn fetch(&self, uid: &str) -> Result<ProfileSnapshot, UpstreamError>;
}

// reqwest-backed lookup against the templated upstream URL
pub struct HttpProfileLookup {
    client: reqwest::Client,
    url_template: String,
}

impl HttpProfileLookup {
    pub fn new(client: reqwest::Client, url_template: String) -> Self {
        Self {
            client,
            url_template,
        }
    }
}

#[async_trait]
impl ProfileLookup for HttpProfileLookup {
    async fn fetch(&self, uid: &str) -> Result<ProfileSnapshot, UpstreamError> {
        let url = self.url_template.replace("{}", uid);
        let start = Instant::now();

        let result = self.client.get(&url).send().await;
        UPSTREAM_LATENCY.observe(start.elapsed().as_secs_f64());

        let res = match result {
            Ok(res) => res,
            Err(e) if e.is_timeout() => return Err(UpstreamError::Timeout),
            Err(e) => {
                tracing::warn!("upstream request failed: {}", e);
                return Err(UpstreamError::Unknown);
            }
        };

        if let Some(err) = status_error(res.status()) {
            return Err(err);
        }

        let body: Value = res.json().await.map_err(|e| {
            tracing::warn!("upstream returned unparseable body: {}", e);
            UpstreamError::Unknown
        })?;

        Ok(extract_profile(&body))
    }
}

// Map a non-2xx status to its error; None means success
pub fn status_error(status: reqwest::StatusCode) -> Option<UpstreamError> {
    if status == reqwest::StatusCode::NOT_FOUND {
        Some(UpstreamError::NotFound)
    } else if !status.is_success() {
        Some(UpstreamError::Http)
    } else {
        None
    }
}

// Pull nickname + like count out of the upstream body. Missing or
// mistyped fields degrade to defaults instead of failing the request.
pub fn extract_profile(body: &Value) -> ProfileSnapshot {
    let info = &body["AccountInfo"];
    let nickname = info["AccountName"]
        .as_str()
        .unwrap_or("Unknown Player")
        .to_string();
    let likes = info["AccountLikes"].as_u64().unwrap_or(0);
    ProfileSnapshot { nickname, likes }
}

// Canned lookup used by orchestrator and handler tests
#[cfg(test)]
pub struct StaticLookup {
    queue: std::sync::Mutex<std::collections::VecDeque<Result<ProfileSnapshot, UpstreamError>>>,
    default: Result<ProfileSnapshot, UpstreamError>,
}

#[cfg(test)]
impl StaticLookup {
    pub fn ok(nickname: &str, likes: u64) -> Self {
        Self {
            queue: std::sync::Mutex::new(std::collections::VecDeque::new()),
            default: Ok(ProfileSnapshot {
                nickname: nickname.to_string(),
                likes,
            }),
        }
    }

    pub fn failing(err: UpstreamError) -> Self {
        Self {
            queue: std::sync::Mutex::new(std::collections::VecDeque::new()),
            default: Err(err),
        }
    }

    // Queue a one-shot response served before the default
    pub fn push(&self, response: Result<ProfileSnapshot, UpstreamError>) {
        self.queue.lock().unwrap().push_back(response);
    }
}

#[cfg(test)]
#[async_trait]
impl ProfileLookup for StaticLookup {
    async fn fetch(&self, _uid: &str) -> Result<ProfileSnapshot, UpstreamError> {
        self.queue
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.default.clone())
    }
}
