//! Broadcast start parsing and sources
//!
//! The broadcast start is the shared epoch timestamp from which every
//! listener computes the same on-air position. It usually lives in a remote
//! document store; this module only knows how to interpret the stored value
//! and defines the interface a fetcher implements.
//!
//! Accepted raw encodings:
//! - a timestamp-like value exposing milliseconds since epoch
//! - a number, treated as seconds when `<= 1e12` and milliseconds otherwise
//! - a numeric string in either of those encodings

use crate::error::SourceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Values at or below this magnitude are seconds, above it milliseconds
pub const SECONDS_MAGNITUDE_LIMIT: f64 = 1_000_000_000_000.0;

/// Environment variable read by [`EnvBroadcastStart::default`]
pub const DEMO_BROADCAST_START_VAR: &str = "SIGNAL_DEMO_BROADCAST_START_MS";

/// Epoch milliseconds at which the playlist started looping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BroadcastStart(i64);

impl BroadcastStart {
    /// Wrap an epoch-milliseconds value
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Epoch milliseconds
    pub const fn as_millis(self) -> i64 {
        self.0
    }

    /// Parse any accepted raw encoding
    pub fn parse(raw: &RawBroadcastStart) -> Result<Self, SourceError> {
        match raw {
            RawBroadcastStart::Timestamp { millis } => Ok(Self(normalize_timestamp_to_ms(*millis))),
            RawBroadcastStart::Number(value) => {
                if value.is_finite() {
                    Ok(Self(normalize_timestamp_to_ms(*value)))
                } else {
                    Err(SourceError::unparseable(value))
                }
            }
            RawBroadcastStart::Text(text) => Self::parse_text(text),
        }
    }

    /// Parse a numeric string (seconds or milliseconds)
    pub fn parse_text(text: &str) -> Result<Self, SourceError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(SourceError::unparseable("empty string"));
        }

        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self(normalize_timestamp_to_ms(value))),
            _ => Err(SourceError::unparseable(format!("{:?}", trimmed))),
        }
    }

    /// Parse a value read from a JSON document
    ///
    /// Numbers and strings map to their raw encodings. Objects are accepted
    /// when they look like a timestamp: `{ "millis": n }` or the
    /// `{ "seconds": s, "nanoseconds": n }` shape document stores export.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, SourceError> {
        let raw = RawBroadcastStart::from_json_value(value)
            .ok_or_else(|| SourceError::unparseable(value))?;
        Self::parse(&raw)
    }
}

impl fmt::Display for BroadcastStart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// A broadcast start as found in the wild, before interpretation
#[derive(Debug, Clone, PartialEq)]
pub enum RawBroadcastStart {
    /// Timestamp object exposing milliseconds since epoch
    Timestamp { millis: f64 },

    /// Bare number, seconds or milliseconds by magnitude
    Number(f64),

    /// Numeric string, seconds or milliseconds by magnitude
    Text(String),
}

impl RawBroadcastStart {
    /// Classify a JSON value; `None` for shapes that cannot hold a timestamp
    pub fn from_json_value(value: &serde_json::Value) -> Option<Self> {
        use serde_json::Value;

        match value {
            Value::Number(number) => number.as_f64().map(Self::Number),
            Value::String(text) => Some(Self::Text(text.clone())),
            Value::Object(fields) => {
                if let Some(millis) = fields.get("millis").and_then(Value::as_f64) {
                    return Some(Self::Timestamp { millis });
                }

                let seconds = fields.get("seconds").and_then(Value::as_f64)?;
                let nanoseconds = fields
                    .get("nanoseconds")
                    .and_then(Value::as_f64)
                    .unwrap_or(0.0);
                Some(Self::Timestamp {
                    millis: seconds * 1000.0 + (nanoseconds / 1_000_000.0).trunc(),
                })
            }
            _ => None,
        }
    }
}

/// Scale seconds to milliseconds by magnitude, truncating toward zero
///
/// Timestamp values pass through the same rule, so a timestamp that reports
/// a tiny millisecond count is read as seconds.
pub fn normalize_timestamp_to_ms(value: f64) -> i64 {
    if value > SECONDS_MAGNITUDE_LIMIT {
        value.trunc() as i64
    } else {
        (value * 1000.0).trunc() as i64
    }
}

/// Where the current broadcast start came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncSource {
    /// Fetched from the remote document store
    Remote,

    /// Local fallback (config or environment)
    Demo,

    /// No usable source
    Unconfigured,
}

impl fmt::Display for SyncSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SyncSource::Remote => "remote",
            SyncSource::Demo => "demo",
            SyncSource::Unconfigured => "unconfigured",
        };
        f.write_str(label)
    }
}

/// Something that can produce the broadcast start
///
/// Remote document-store fetchers live outside this workspace and implement
/// this trait; the sources below cover configuration and environment
/// fallbacks.
#[async_trait]
pub trait BroadcastStartSource: Send + Sync {
    /// Fetch and parse the broadcast start
    async fn fetch(&self) -> Result<BroadcastStart, SourceError>;

    /// Provenance reported when `fetch` succeeds
    fn kind(&self) -> SyncSource;
}

/// A fixed broadcast start, typically from configuration
#[derive(Debug, Clone)]
pub struct StaticBroadcastStart {
    start: BroadcastStart,
    kind: SyncSource,
}

impl StaticBroadcastStart {
    /// Wrap an already-parsed value
    pub fn new(start: BroadcastStart, kind: SyncSource) -> Self {
        Self { start, kind }
    }

    /// Parse a raw value eagerly so configuration errors surface at startup
    pub fn parse(raw: &RawBroadcastStart, kind: SyncSource) -> Result<Self, SourceError> {
        Ok(Self::new(BroadcastStart::parse(raw)?, kind))
    }
}

#[async_trait]
impl BroadcastStartSource for StaticBroadcastStart {
    async fn fetch(&self) -> Result<BroadcastStart, SourceError> {
        Ok(self.start)
    }

    fn kind(&self) -> SyncSource {
        self.kind
    }
}

/// Reads the broadcast start from an environment variable on every fetch
#[derive(Debug, Clone)]
pub struct EnvBroadcastStart {
    var: String,
}

impl EnvBroadcastStart {
    /// Read from the named variable
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }

    /// Variable name
    pub fn var(&self) -> &str {
        &self.var
    }
}

impl Default for EnvBroadcastStart {
    fn default() -> Self {
        Self::new(DEMO_BROADCAST_START_VAR)
    }
}

#[async_trait]
impl BroadcastStartSource for EnvBroadcastStart {
    async fn fetch(&self) -> Result<BroadcastStart, SourceError> {
        match std::env::var(&self.var) {
            Ok(raw) if !raw.trim().is_empty() => BroadcastStart::parse_text(&raw),
            _ => Err(SourceError::Unconfigured),
        }
    }

    fn kind(&self) -> SyncSource {
        SyncSource::Demo
    }
}
