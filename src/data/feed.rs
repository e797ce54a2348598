use crate::{
    constants::{DEFAULT_FEED_URL, USER_AGENT, USGS_SUMMARY_BASE},
    data::geojson::GeoJson,
    MapError, Result,
};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use std::{fmt, path::Path};

/// Shared HTTP client with a descriptive User-Agent. Building it once avoids
/// TLS and connection pool setup for every fetch.
static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|e| {
            log::warn!("falling back to default HTTP client: {}", e);
            Client::new()
        })
});

/// Anything that can produce an earthquake GeoJSON document
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetches the whole document. Every failure surfaces as
    /// [`MapError::FeedUnavailable`].
    async fn fetch(&self) -> Result<GeoJson>;

    /// Human-readable origin for logs and status messages
    fn describe(&self) -> String;
}

/// Time window of a USGS summary feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedPeriod {
    PastHour,
    PastDay,
    PastWeek,
    PastMonth,
}

impl FeedPeriod {
    fn slug(self) -> &'static str {
        match self {
            FeedPeriod::PastHour => "hour",
            FeedPeriod::PastDay => "day",
            FeedPeriod::PastWeek => "week",
            FeedPeriod::PastMonth => "month",
        }
    }
}

/// Magnitude filter of a USGS summary feed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedMagnitude {
    All,
    AtLeast1_0,
    AtLeast2_5,
    AtLeast4_5,
    Significant,
}

impl FeedMagnitude {
    fn slug(self) -> &'static str {
        match self {
            FeedMagnitude::All => "all",
            FeedMagnitude::AtLeast1_0 => "1.0",
            FeedMagnitude::AtLeast2_5 => "2.5",
            FeedMagnitude::AtLeast4_5 => "4.5",
            FeedMagnitude::Significant => "significant",
        }
    }
}

/// GeoJSON feed fetched over HTTP(S)
#[derive(Clone)]
pub struct HttpFeed {
    url: String,
    client: Client,
}

impl HttpFeed {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: HTTP_CLIENT.clone(),
        }
    }

    /// One of the USGS summary feeds, e.g. `all_week.geojson`
    pub fn usgs(magnitude: FeedMagnitude, period: FeedPeriod) -> Self {
        Self::new(format!(
            "{}/{}_{}.geojson",
            USGS_SUMMARY_BASE,
            magnitude.slug(),
            period.slug()
        ))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    fn unavailable(&self, detail: impl fmt::Display) -> MapError {
        MapError::FeedUnavailable(format!("{}: {}", self.url, detail))
    }
}

impl Default for HttpFeed {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_URL)
    }
}

impl fmt::Debug for HttpFeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpFeed").field("url", &self.url).finish()
    }
}

#[async_trait]
impl FeedSource for HttpFeed {
    async fn fetch(&self) -> Result<GeoJson> {
        log::debug!("fetching earthquake feed {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| self.unavailable(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(self.unavailable(format!("HTTP {}", status)));
        }

        let body = response.text().await.map_err(|e| self.unavailable(e))?;
        let geojson: GeoJson = serde_json::from_str(&body)
            .map_err(|e| self.unavailable(format!("invalid GeoJSON: {}", e)))?;

        log::info!(
            "fetched {} features ({} bytes) from {}",
            geojson.features().len(),
            body.len(),
            self.url
        );
        Ok(geojson)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// In-memory GeoJSON document, for tests and offline snapshots
#[derive(Debug, Clone)]
pub struct StaticFeed {
    name: String,
    document: String,
}

impl StaticFeed {
    pub fn new(document: impl Into<String>) -> Self {
        Self {
            name: "static feed".to_string(),
            document: document.into(),
        }
    }

    /// Reads a saved feed snapshot from disk
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let document = std::fs::read_to_string(path)?;
        Ok(Self {
            name: path.display().to_string(),
            document,
        })
    }
}

#[async_trait]
impl FeedSource for StaticFeed {
    async fn fetch(&self) -> Result<GeoJson> {
        serde_json::from_str(&self.document)
            .map_err(|e| MapError::FeedUnavailable(format!("{}: invalid GeoJSON: {}", self.name, e)))
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
