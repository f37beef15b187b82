// Core module - Framing, logging, and session logic
pub mod directory;
pub mod framing;
pub mod log;
pub mod monitor;
pub mod render;
pub mod session;
pub mod transport;

pub use directory::{PortDirectory, PortRefresh};
pub use framing::QuiescenceFramer;
pub use log::{ChannelTag, Direction, EventLog, LogEntry};
pub use monitor::Monitor;
pub use session::{ConnectionStatus, MonitorSession};
pub use transport::{ByteLink, OpenLink, SerialTransport};
