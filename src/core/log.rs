use crate::core::render::render_bytes;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Direction of a logged payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Sent,
    Received,
}

impl Direction {
    /// Fixed display label for this direction
    pub fn label(&self) -> &'static str {
        match self {
            Direction::Sent => "TRANSMIT DATA",
            Direction::Received => "RECEIVE DATA",
        }
    }

    /// Presentation channel for this direction
    pub fn channel_tag(&self) -> ChannelTag {
        match self {
            Direction::Sent => ChannelTag::Transmit,
            Direction::Received => ChannelTag::Receive,
        }
    }
}

/// Presentation-only marker separating the two directions at a glance
///
/// Rendered as a color class in the reference UI; the core only guarantees
/// the two tags are distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChannelTag {
    Transmit,
    Receive,
}

impl std::fmt::Display for ChannelTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChannelTag::Transmit => write!(f, "transmit"),
            ChannelTag::Receive => write!(f, "receive"),
        }
    }
}

/// One immutable log record
///
/// `byte_count` is the length of the original raw payload; rewriting
/// control characters changes the displayed text but never the count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEntry {
    pub timestamp: DateTime<Local>,
    pub direction: Direction,
    pub text: String,
    pub byte_count: usize,
}

impl LogEntry {
    /// Build an entry from a direction, a raw payload, and a clock reading
    pub fn format(direction: Direction, raw: &[u8], now: DateTime<Local>) -> Self {
        Self {
            timestamp: now,
            direction,
            text: render_bytes(raw),
            byte_count: raw.len(),
        }
    }

    /// Build a transmit entry
    pub fn sent(raw: &[u8], now: DateTime<Local>) -> Self {
        Self::format(Direction::Sent, raw, now)
    }

    /// Build a receive entry
    pub fn received(raw: &[u8], now: DateTime<Local>) -> Self {
        Self::format(Direction::Received, raw, now)
    }

    pub fn channel_tag(&self) -> ChannelTag {
        self.direction.channel_tag()
    }

    /// Render the full log line
    ///
    /// The unit suffix stays singular regardless of count; existing
    /// consumers match on the exact shape.
    pub fn line(&self) -> String {
        format!(
            "[{}] {}: \"{}\", Total: {} byte",
            self.timestamp.format("%H:%M:%S"),
            self.direction.label(),
            self.text,
            self.byte_count
        )
    }
}

/// Append-only shared log sequence
///
/// Entries are never mutated or removed except by `clear`, which empties
/// the whole sequence without touching session state. Oldest entries are
/// dropped once the history limit is reached.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: Arc<RwLock<VecDeque<LogEntry>>>,
    history_limit: usize,
}

impl EventLog {
    pub fn new(history_limit: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::new())),
            history_limit,
        }
    }

    pub async fn push(&self, entry: LogEntry) {
        let mut entries = self.entries.write().await;
        entries.push_back(entry);
        while entries.len() > self.history_limit {
            entries.pop_front();
        }
    }

    /// Ordered copy of the current entries
    pub async fn snapshot(&self) -> Vec<LogEntry> {
        self.entries.read().await.iter().cloned().collect()
    }

    pub async fn clear(&self) {
        self.entries.write().await.clear();
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(crate::domain::config::MonitorConfig::default().history_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at_10_30_00() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 5, 1, 10, 30, 0).unwrap()
    }

    #[test]
    fn test_line_shape() {
        let entry = LogEntry::sent(b"ping", at_10_30_00());
        assert_eq!(
            entry.line(),
            "[10:30:00] TRANSMIT DATA: \"ping\", Total: 4 byte"
        );
    }

    #[test]
    fn test_received_line_with_control_chars() {
        let entry = LogEntry::received(b"abcd\r\n", at_10_30_00());
        assert_eq!(
            entry.line(),
            "[10:30:00] RECEIVE DATA: \"abcd[0x0D][0x0A]\", Total: 6 byte"
        );
    }

    #[test]
    fn test_byte_count_is_raw_length() {
        let entry = LogEntry::received(b"\r\n\r\n", at_10_30_00());
        assert_eq!(entry.byte_count, 4);
        assert_eq!(entry.text, "[0x0D][0x0A][0x0D][0x0A]");
    }

    #[test]
    fn test_unit_suffix_stays_singular() {
        let one = LogEntry::sent(b"x", at_10_30_00());
        let many = LogEntry::sent(b"xyz", at_10_30_00());
        assert!(one.line().ends_with("1 byte"));
        assert!(many.line().ends_with("3 byte"));
    }

    #[test]
    fn test_channel_tags_are_distinct() {
        assert_ne!(
            Direction::Sent.channel_tag(),
            Direction::Received.channel_tag()
        );
        assert_eq!(Direction::Sent.label(), "TRANSMIT DATA");
        assert_eq!(Direction::Received.label(), "RECEIVE DATA");
    }

    #[tokio::test]
    async fn test_event_log_append_and_clear() {
        let log = EventLog::new(10);
        assert!(log.is_empty().await);

        log.push(LogEntry::sent(b"a", at_10_30_00())).await;
        log.push(LogEntry::received(b"b", at_10_30_00())).await;
        assert_eq!(log.len().await, 2);

        let entries = log.snapshot().await;
        assert_eq!(entries[0].direction, Direction::Sent);
        assert_eq!(entries[1].direction, Direction::Received);

        log.clear().await;
        assert!(log.is_empty().await);
    }

    #[tokio::test]
    async fn test_event_log_trims_oldest() {
        let log = EventLog::new(2);
        log.push(LogEntry::sent(b"1", at_10_30_00())).await;
        log.push(LogEntry::sent(b"2", at_10_30_00())).await;
        log.push(LogEntry::sent(b"3", at_10_30_00())).await;

        let entries = log.snapshot().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "2");
        assert_eq!(entries[1].text, "3");
    }
}
