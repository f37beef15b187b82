use crate::domain::config::FramingConfig;
use tokio::time::Instant;

/// Idle-timeout byte framer
///
/// Serial transports deliver bytes in arbitrary-sized chunks uncorrelated
/// with the sender's logical message boundaries. The framer accumulates
/// arriving bytes and treats a configurable quiet period as the end of one
/// message: once no new bytes have arrived for the idle threshold, the
/// buffered run is swapped out and returned as a completed frame.
///
/// Performs no I/O and has no error conditions. Callers are responsible
/// for serializing `on_bytes` and `tick`; the session holds the framer
/// behind a mutex so an append can never race a flush.
#[derive(Debug)]
pub struct QuiescenceFramer {
    config: FramingConfig,
    buffer: Vec<u8>,
    last_arrival: Option<Instant>,
}

impl QuiescenceFramer {
    pub fn new(config: FramingConfig) -> Self {
        Self {
            config,
            buffer: Vec::new(),
            last_arrival: None,
        }
    }

    /// Append a chunk and record its arrival time
    pub fn on_bytes(&mut self, bytes: &[u8], now: Instant) {
        if bytes.is_empty() {
            return;
        }
        self.buffer.extend_from_slice(bytes);
        self.last_arrival = Some(now);
    }

    /// Flush the accumulator if it has been quiet long enough
    ///
    /// Returns the accumulated bytes in arrival order when the accumulator
    /// is non-empty and at least the idle threshold has elapsed since the
    /// last append; otherwise `None`. A tick on an empty accumulator is a
    /// no-op.
    pub fn tick(&mut self, now: Instant) -> Option<Vec<u8>> {
        let last = self.last_arrival?;
        if self.buffer.is_empty() {
            return None;
        }
        if now.duration_since(last) < self.config.idle_threshold() {
            return None;
        }
        self.last_arrival = None;
        Some(std::mem::take(&mut self.buffer))
    }

    /// Number of bytes waiting for the next quiet period
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Drop any accumulated bytes without emitting a frame
    pub fn discard(&mut self) -> usize {
        self.last_arrival = None;
        let dropped = self.buffer.len();
        self.buffer.clear();
        dropped
    }
}
