/// Domain models for the quake feed
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Time span the feed is queried over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Window {
    Hour,
    #[default]
    Day,
    Week,
}

impl Window {
    pub fn as_str(&self) -> &'static str {
        match self {
            Window::Hour => "hour",
            Window::Day => "day",
            Window::Week => "week",
        }
    }

    /// Label shown in the filter form
    pub fn label(&self) -> &'static str {
        match self {
            Window::Hour => "Past hour",
            Window::Day => "Past day",
            Window::Week => "Past week",
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Window {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hour" => Ok(Window::Hour),
            "day" => Ok(Window::Day),
            "week" => Ok(Window::Week),
            other => Err(format!("unknown window: {}", other)),
        }
    }
}

/// Filter parameters sent with every query.
///
/// `min_mag` and `limit` are not validated here; range enforcement belongs to the
/// remote service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QueryParams {
    pub window: Window,
    pub min_mag: f64,
    pub limit: i64,
}

impl QueryParams {
    pub fn new(window: Window, min_mag: f64, limit: i64) -> Self {
        Self {
            window,
            min_mag,
            limit,
        }
    }

    /// Query string pairs, mapped 1:1 onto the wire names
    pub fn to_query(&self) -> [(&'static str, String); 3] {
        [
            ("window", self.window.as_str().to_string()),
            ("minMag", self.min_mag.to_string()),
            ("limit", self.limit.to_string()),
        ]
    }
}

impl Default for QueryParams {
    fn default() -> Self {
        Self {
            window: Window::Day,
            min_mag: 4.5,
            limit: 50,
        }
    }
}

/// One seismic event as reported by the feed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quake {
    pub id: String,
    pub mag: f64,
    #[serde(default)]
    pub place: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub updated: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub depth_km: Option<f64>,
    #[serde(default)]
    pub sig: Option<i64>,
    #[serde(default)]
    pub felt: Option<i64>,
    #[serde(default)]
    pub tsunami: Option<i64>,
}

/// Server-reported statistics for one query.
///
/// `count` is reported independently of the item list and is never reconciled with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchMeta {
    pub count: i64,
    pub window: Window,
    #[serde(rename = "minMag")]
    pub min_mag: f64,
    /// ISO-8601 as sent; only parsed for display
    pub generated_at: String,
    #[serde(default)]
    pub source: Option<String>,
}

/// Successful `/quakes` response; `items` keep the feed's ordering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchResult {
    pub meta: FetchMeta,
    pub items: Vec<Quake>,
}

impl FetchResult {
    pub fn find(&self, id: &str) -> Option<&Quake> {
        self.items.iter().find(|q| q.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
