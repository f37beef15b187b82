use crate::domain::error::{MonitorError, MonitorResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Baud rates offered to the user, in presentation order
pub const BAUD_RATES: [u32; 5] = [9600, 19200, 38400, 57600, 115200];

/// Baud rate selected when no prior choice exists
pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Connection parameters for one serial session
///
/// Immutable once a session is opened; changing either field requires a
/// new session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Platform-specific device name (e.g. "COM3", "/dev/ttyUSB0")
    pub port: String,
    /// Line speed in baud
    pub baud_rate: u32,
}

impl ConnectionConfig {
    pub fn new(port: impl Into<String>, baud_rate: u32) -> Self {
        Self {
            port: port.into(),
            baud_rate,
        }
    }

    pub fn validate(&self) -> MonitorResult<()> {
        if self.port.is_empty() {
            return Err(MonitorError::Config {
                message: "Port name must not be empty".to_string(),
            });
        }
        if self.baud_rate == 0 {
            return Err(MonitorError::Config {
                message: "Baud rate must be positive".to_string(),
            });
        }
        Ok(())
    }
}

/// Idle-timeout framing policy
///
/// A received burst is flushed as one frame once no new bytes have arrived
/// for `idle_threshold_ms`. The check runs every `poll_interval_ms`, so a
/// frame is flushed between 1x and 2x the threshold after its last byte.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FramingConfig {
    /// Minimum quiet time before the accumulator is flushed
    #[serde(default = "default_idle_threshold_ms")]
    pub idle_threshold_ms: u64,
    /// How often the quiescence check runs
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl FramingConfig {
    pub fn idle_threshold(&self) -> Duration {
        Duration::from_millis(self.idle_threshold_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// PortMon configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Framing policy
    #[serde(default)]
    pub framing: FramingConfig,
    /// Default log level
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Maximum retained log entries
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Baud rate preselected in the directory
    #[serde(default = "default_baud_rate")]
    pub default_baud_rate: u32,
}

// Default value functions
fn default_idle_threshold_ms() -> u64 {
    100
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_history_limit() -> usize {
    1000
}

fn default_baud_rate() -> u32 {
    DEFAULT_BAUD_RATE
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            idle_threshold_ms: default_idle_threshold_ms(),
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            framing: FramingConfig::default(),
            log_level: default_log_level(),
            history_limit: default_history_limit(),
            default_baud_rate: default_baud_rate(),
        }
    }
}
