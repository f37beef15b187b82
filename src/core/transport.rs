use crate::domain::{config::ConnectionConfig, error::MonitorResult};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::mpsc;

/// An opened connection: a writable link plus the asynchronous
/// byte-arrival stream feeding the framer
pub struct OpenLink {
    pub link: Arc<dyn ByteLink>,
    pub bytes: mpsc::UnboundedReceiver<Vec<u8>>,
}

/// Writable half of an open connection
#[async_trait]
pub trait ByteLink: Send + Sync {
    /// Write the full payload; bounded by the transport's write timeout
    async fn write(&self, bytes: &[u8]) -> MonitorResult<()>;

    /// Release the underlying device
    async fn close(&self) -> MonitorResult<()>;
}

/// Platform transport boundary
///
/// Exclusive device ownership is enforced here, not by the session: a
/// second `open` of a port already held fails at this boundary.
#[async_trait]
pub trait SerialTransport: Send + Sync {
    /// Enumerate currently available port identifiers, in platform order
    fn list_ports(&self) -> MonitorResult<Vec<String>>;

    /// Open a port at the configured baud rate
    async fn open(&self, config: &ConnectionConfig) -> MonitorResult<OpenLink>;
}
