//! PortMon Library
//!
//! Single-port serial line monitor core: accumulates bytes arriving in
//! unpredictable chunks and frames them into logical messages using an
//! idle-timeout heuristic, with a deterministic log-formatting contract
//! applied uniformly to sent and received data.

pub mod core;
pub mod domain;
pub mod infrastructure;

pub use self::core::log::{ChannelTag, Direction, EventLog, LogEntry};
pub use self::core::monitor::Monitor;
pub use self::core::session::{ConnectionStatus, MonitorSession};
pub use self::core::transport::{ByteLink, OpenLink, SerialTransport};
pub use self::core::{PortDirectory, PortRefresh, QuiescenceFramer};
pub use self::domain::config::{ConnectionConfig, FramingConfig, MonitorConfig, BAUD_RATES};
pub use self::domain::error::{MonitorError, MonitorResult};
pub use self::infrastructure::serial::SystemTransport;
