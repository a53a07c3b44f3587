//! Live feed samples and the rolling window they are charted from

use std::collections::VecDeque;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Deserializer, Serialize};

use crate::{DashboardError, Result};

/// Most recent samples kept for the chart
pub const FEED_CAPACITY: usize = 1000;

/// Legend of the single chart series
pub const SERIES_LABEL: &str = "Random Numbers";

/// One reading pushed by the feed server
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds since the Unix epoch
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: i64,
    pub value: f64,
}

impl Sample {
    pub fn new(timestamp: i64, value: f64) -> Self {
        Self { timestamp, value }
    }

    /// Decode one feed message
    pub fn decode(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| DashboardError::Feed(format!("{}: {}", e, text)))
    }

    /// Local wall-clock time of the sample, `HH:MM:SS`
    pub fn time_of_day(&self) -> String {
        Local
            .timestamp_millis_opt(self.timestamp)
            .single()
            .map(|t| t.format("%H:%M:%S").to_string())
            .unwrap_or_default()
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(f64),
    Text(String),
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Millis(ms) => Ok(ms as i64),
        RawTimestamp::Text(text) => parse_timestamp(&text).ok_or_else(|| {
            serde::de::Error::custom(format!("invalid timestamp '{}'", text))
        }),
    }
}

/// RFC 3339, or a naive ISO-8601 date-time taken as local time
fn parse_timestamp(text: &str) -> Option<i64> {
    if let Ok(t) = DateTime::parse_from_rfc3339(text) {
        return Some(t.timestamp_millis());
    }
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|t| t.timestamp_millis())
}

/// Fixed-capacity FIFO: pushing into a full buffer evicts the oldest item
#[derive(Debug, Clone)]
pub struct RollingBuffer<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> RollingBuffer<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an item, returning the one evicted to make room
    pub fn push(&mut self, item: T) -> Option<T> {
        if self.capacity == 0 {
            return Some(item);
        }
        let evicted = if self.items.len() >= self.capacity {
            self.items.pop_front()
        } else {
            None
        };
        self.items.push_back(item);
        evicted
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest first
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    pub fn latest(&self) -> Option<&T> {
        self.items.back()
    }
}

/// Rolling window of feed samples
#[derive(Debug, Clone)]
pub struct LiveFeed {
    buffer: RollingBuffer<Sample>,
    received: u64,
    dropped: u64,
}

impl Default for LiveFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl LiveFeed {
    pub fn new() -> Self {
        Self {
            buffer: RollingBuffer::new(FEED_CAPACITY),
            received: 0,
            dropped: 0,
        }
    }

    /// Decode and buffer a raw message. Undecodable messages are dropped.
    pub fn ingest_text(&mut self, text: &str) -> Option<Sample> {
        match Sample::decode(text) {
            Ok(sample) => {
                self.push(sample);
                Some(sample)
            }
            Err(e) => {
                self.dropped += 1;
                tracing::warn!("Dropping feed message: {}", e);
                None
            }
        }
    }

    pub fn push(&mut self, sample: Sample) {
        self.received += 1;
        self.buffer.push(sample);
    }

    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.buffer.iter()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.buffer.latest()
    }

    /// Samples accepted since mount, including evicted ones
    pub fn received(&self) -> u64 {
        self.received
    }

    /// Messages that failed to decode
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn series(&self) -> ChartSeries {
        ChartSeries {
            label: SERIES_LABEL,
            points: self
                .samples()
                .map(|s| ChartPoint {
                    label: s.time_of_day(),
                    value: s.value,
                })
                .collect(),
        }
    }
}

/// One chart point: time-of-day on X, value on Y
#[derive(Debug, Clone, PartialEq)]
pub struct ChartPoint {
    pub label: String,
    pub value: f64,
}

/// Single line series ready for a chart widget
#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub label: &'static str,
    pub points: Vec<ChartPoint>,
}

impl ChartSeries {
    /// Y axis bounds; the axis always includes zero
    pub fn y_range(&self) -> (f64, f64) {
        let (lo, hi) = self
            .points
            .iter()
            .fold((0.0_f64, 0.0_f64), |(lo, hi), p| (lo.min(p.value), hi.max(p.value)));
        if hi > lo {
            (lo, hi)
        } else {
            (lo, lo + 1.0)
        }
    }
}
