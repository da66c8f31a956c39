//! Telegram history gateway client with connection pooling and rate limiting
//!
//! This module wraps the HTTP gateway that exposes channel message history,
//! including session authentication, rate limiting, retry logic and the
//! mapping from the gateway's message schema into [`Post`] records.

use crate::error::{Result, TgStatError};
use crate::session::SessionToken;
use crate::types::{DateRange, Post};
use crate::utils::extract_channel_username;
use chrono::DateTime;
use governor::{DefaultDirectRateLimiter, Quota};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tokio::sync::mpsc;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, error, info, instrument, warn};

/// How many accepted posts between two progress events
const PROGRESS_EVERY: usize = 20;

/// Placeholder title for posts without text
const EMPTY_TITLE: &str = "(no text)";

/// Configuration for the Telegram gateway client
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Base URL of the history gateway (e.g., "http://localhost:8552")
    pub base_url: String,
    /// Request timeout in seconds (default: 30)
    pub timeout_secs: u64,
    /// Connection pool max idle connections per host (default: 10)
    pub max_idle_per_host: usize,
    /// Rate limit: requests per second (default: 5)
    pub rate_limit_per_sec: u32,
    /// Maximum number of retry attempts (default: 3)
    pub max_retries: usize,
    /// Messages fetched per history page (default: 100)
    pub page_size: usize,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8552".to_string(),
            timeout_secs: 30,
            max_idle_per_host: 10,
            rate_limit_per_sec: 5,
            max_retries: 3,
            page_size: 100,
        }
    }
}

impl TelegramConfig {
    /// Create a new configuration with the minimum required parameters
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the connection pool size
    pub fn with_pool_size(mut self, max_idle_per_host: usize) -> Self {
        self.max_idle_per_host = max_idle_per_host;
        self
    }

    /// Set the rate limit
    pub fn with_rate_limit(mut self, rate_limit_per_sec: u32) -> Self {
        self.rate_limit_per_sec = rate_limit_per_sec;
        self
    }

    /// Set the maximum retry attempts
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Set the history page size
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

/// Progress event emitted while a history fetch is running.
///
/// Sent on an unbounded channel every [`PROGRESS_EVERY`] accepted messages;
/// a closed receiver is ignored so progress reporting can never fail a fetch.
#[derive(Debug, Clone)]
pub struct FetchProgress {
    /// Messages accepted into the result so far
    pub fetched: usize,
    /// Human-readable status line
    pub message: String,
}

/// Telegram gateway client
#[derive(Debug, Clone)]
pub struct TelegramClient {
    client: Client,
    config: TelegramConfig,
    session: SessionToken,
    rate_limiter: Arc<DefaultDirectRateLimiter>,
}

impl TelegramClient {
    /// Create a new client with the given configuration and session
    pub fn new(config: TelegramConfig, session: SessionToken) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .pool_max_idle_per_host(config.max_idle_per_host)
            .build()
            .map_err(|e| TgStatError::network_with_source("Failed to create HTTP client", e))?;

        let quota = Quota::per_second(
            NonZeroU32::new(config.rate_limit_per_sec)
                .ok_or_else(|| TgStatError::config("Rate limit must be greater than 0"))?,
        );
        let rate_limiter = Arc::new(DefaultDirectRateLimiter::direct(quota));

        Ok(Self {
            client,
            config,
            session,
            rate_limiter,
        })
    }

    /// Build a request URL for a gateway endpoint
    fn build_url(&self, endpoint: &str) -> String {
        format!(
            "{}/api/v1/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// Make an authenticated request to the gateway with retry logic
    #[instrument(skip(self), fields(endpoint = %endpoint))]
    async fn make_request(&self, endpoint: &str, params: &[(&str, String)]) -> Result<Response> {
        self.rate_limiter.until_ready().await;

        let url = self.build_url(endpoint);
        debug!("Making request to: {}", url);

        let retry_strategy = ExponentialBackoff::from_millis(100)
            .max_delay(Duration::from_secs(10))
            .take(self.config.max_retries);

        let response = Retry::spawn(retry_strategy, || async {
            let request = self
                .client
                .get(&url)
                .header("X-Session", self.session.expose())
                .query(params);

            match request.send().await {
                Ok(response) => {
                    if response.status().is_success() {
                        debug!("Request successful: {}", response.status());
                        Ok(response)
                    } else if response.status().is_client_error() {
                        // Don't retry client errors (4xx)
                        error!("Client error: {}", response.status());
                        Err(TgStatError::telegram_with_status(
                            format!("Gateway returned client error: {}", response.status()),
                            response.status().as_u16(),
                        ))
                    } else {
                        // Retry server errors (5xx)
                        warn!("Server error, will retry: {}", response.status());
                        Err(TgStatError::telegram_with_status(
                            format!("Gateway returned server error: {}", response.status()),
                            response.status().as_u16(),
                        ))
                    }
                }
                Err(e) if e.is_timeout() => {
                    warn!("Request timeout, will retry: {}", e);
                    Err(TgStatError::network_with_source("Request timeout", e))
                }
                Err(e) if e.is_connect() => {
                    warn!("Connection error, will retry: {}", e);
                    Err(TgStatError::network_with_source("Connection error", e))
                }
                Err(e) => {
                    error!("Request failed: {}", e);
                    Err(TgStatError::network_with_source("Request failed", e))
                }
            }
        })
        .await?;

        Ok(response)
    }

    /// Make a request and parse the JSON envelope
    async fn request_json<T>(&self, endpoint: &str, params: &[(&str, String)]) -> Result<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self.make_request(endpoint, params).await?;
        let text = response
            .text()
            .await
            .map_err(|e| TgStatError::network_with_source("Failed to read response body", e))?;

        let envelope: ApiResponse<T> = serde_json::from_str(&text)?;
        if envelope.ok {
            envelope
                .result
                .ok_or_else(|| TgStatError::telegram("Response contained no data"))
        } else {
            Err(TgStatError::telegram(
                envelope.error.as_deref().unwrap_or("Unknown gateway error"),
            ))
        }
    }

    /// Verify that the session is authorized.
    ///
    /// Returns a descriptive auth error when the gateway rejects the session,
    /// pointing the operator at session regeneration.
    #[instrument(skip(self))]
    pub async fn check_authorization(&self) -> Result<()> {
        let status: AuthStatus = self.request_json("auth/status", &[]).await?;
        if status.authorized {
            Ok(())
        } else {
            Err(TgStatError::auth(
                "Client is not authorized. Check TG_SESSION or generate a new session.",
            ))
        }
    }

    /// Fetch channel posts within an inclusive date range.
    ///
    /// Pages through the channel history oldest-first, skipping service
    /// messages and messages without a timestamp, keeping only messages
    /// inside `range`, and scanning at most `limit` messages. Every 20
    /// accepted messages a [`FetchProgress`] event is sent on `progress_tx`.
    #[instrument(skip(self, progress_tx), fields(channel = %channel_link, limit = limit))]
    pub async fn fetch_channel_history(
        &self,
        channel_link: &str,
        range: DateRange,
        limit: usize,
        progress_tx: Option<mpsc::UnboundedSender<FetchProgress>>,
    ) -> Result<Vec<Post>> {
        let channel = extract_channel_username(channel_link);
        info!("Fetching history for channel {}", channel);

        self.check_authorization().await?;

        let mut posts = Vec::new();
        let mut scanned = 0usize;
        let mut offset_id = 0i64;

        loop {
            let page_size = self.config.page_size.min(limit - scanned);
            if page_size == 0 {
                break;
            }

            let params = [
                ("channel", channel.to_string()),
                ("offset_id", offset_id.to_string()),
                ("limit", page_size.to_string()),
            ];
            let page: HistoryPage = self.request_json("channels/history", &params).await?;
            if page.messages.is_empty() {
                break;
            }

            let mut past_range = false;
            for message in &page.messages {
                scanned += 1;
                offset_id = message.id;

                if message.is_service {
                    continue;
                }
                let Some(timestamp) = message.date else {
                    continue;
                };
                let Some(published_at) = DateTime::from_timestamp(timestamp, 0) else {
                    continue;
                };

                let date = published_at.date_naive();
                if date > range.end {
                    // Pages arrive oldest-first; everything after this is out of range
                    past_range = true;
                    break;
                }
                if date < range.start {
                    continue;
                }

                posts.push(map_message(message, published_at));

                if posts.len() % PROGRESS_EVERY == 0 {
                    if let Some(ref tx) = progress_tx {
                        let _ = tx.send(FetchProgress {
                            fetched: posts.len(),
                            message: format!("Fetched {} messages", posts.len()),
                        });
                    }
                }
            }

            if past_range || scanned >= limit {
                break;
            }
        }

        info!("Fetched {} posts ({} messages scanned)", posts.len(), scanned);
        Ok(posts)
    }
}

/// Map a gateway message into a post record
fn map_message(message: &ChannelMessage, published_at: crate::types::Timestamp) -> Post {
    let title = match message.text.as_deref() {
        Some(text) if !text.is_empty() => text.chars().take(70).collect(),
        _ => EMPTY_TITLE.to_string(),
    };

    let likes = message
        .reactions
        .as_ref()
        .map(|r| r.results.iter().map(|c| c.count).sum())
        .unwrap_or(0);
    let comments = message
        .replies
        .as_ref()
        .and_then(|r| r.replies)
        .unwrap_or(0);

    Post {
        id: message.id,
        date: Some(published_at.date_naive()),
        published_at: Some(published_at),
        title,
        views: message.views.unwrap_or(0),
        likes,
        comments,
        reposts: message.forwards.unwrap_or(0),
    }
}

// ============================================================================
// API Response Models
// ============================================================================

/// Base response envelope for all gateway calls
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the call succeeded
    pub ok: bool,
    /// Error description, present on failures
    pub error: Option<String>,
    /// The actual data payload
    pub result: Option<T>,
}

/// Authorization status payload
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthStatus {
    pub authorized: bool,
}

/// One page of channel history, ordered oldest-first
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HistoryPage {
    pub messages: Vec<ChannelMessage>,
}

/// A single message as exposed by the gateway
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChannelMessage {
    /// Message id, unique within the channel
    pub id: i64,
    /// Unix timestamp of publication
    pub date: Option<i64>,
    /// Message text, absent for media-only posts
    pub text: Option<String>,
    /// View counter
    pub views: Option<u64>,
    /// Forward counter
    pub forwards: Option<u64>,
    /// Reply thread information
    pub replies: Option<MessageReplies>,
    /// Reaction counters
    pub reactions: Option<MessageReactions>,
    /// Service messages (joins, pins, ...) carry no engagement data
    #[serde(default)]
    pub is_service: bool,
}

/// Reply thread counters
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageReplies {
    pub replies: Option<u64>,
}

/// Reaction counters grouped by emoji
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MessageReactions {
    pub results: Vec<ReactionCount>,
}

/// Count for a single reaction kind
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReactionCount {
    pub count: u64,
}
