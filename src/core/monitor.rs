use crate::core::directory::{PortDirectory, PortRefresh};
use crate::core::log::{EventLog, LogEntry};
use crate::core::session::{ConnectionStatus, MonitorSession};
use crate::core::transport::SerialTransport;
use crate::domain::config::{ConnectionConfig, MonitorConfig};
use crate::domain::error::{MonitorError, MonitorResult};
use std::sync::Arc;
use tracing::info;

/// Presentation boundary for a single-port monitor
///
/// Owns at most one open session, the shared event log, and the port
/// directory. A UI collaborator drives it with connect/disconnect/send
/// and renders `entries` and `status`.
pub struct Monitor {
    transport: Arc<dyn SerialTransport>,
    config: MonitorConfig,
    directory: PortDirectory,
    log: EventLog,
    session: Option<MonitorSession>,
}

impl Monitor {
    pub fn new(transport: Arc<dyn SerialTransport>, config: MonitorConfig) -> Self {
        let directory =
            PortDirectory::new(Arc::clone(&transport)).with_default_baud(config.default_baud_rate);
        let log = EventLog::new(config.history_limit);

        Self {
            transport,
            config,
            directory,
            log,
            session: None,
        }
    }

    /// Open a session; fails if one is already open
    pub async fn connect(&mut self, config: ConnectionConfig) -> MonitorResult<()> {
        if let Some(session) = &self.session {
            return Err(MonitorError::AlreadyConnected {
                port: session.config().port.clone(),
            });
        }

        let session = MonitorSession::connect(
            self.transport.as_ref(),
            config,
            self.config.framing.clone(),
            self.log.clone(),
        )
        .await?;

        self.session = Some(session);
        Ok(())
    }

    /// Close the open session
    ///
    /// The session is taken out before closing, so the monitor reports
    /// `Disconnected` even when the transport close fails.
    pub async fn disconnect(&mut self) -> MonitorResult<()> {
        let session = self.session.take().ok_or(MonitorError::NotConnected)?;
        session.disconnect().await
    }

    /// Send a payload on the open session
    pub async fn send(&self, text: &str) -> MonitorResult<()> {
        let session = self.session.as_ref().ok_or(MonitorError::NotConnected)?;
        session.send(text).await
    }

    pub fn status(&self) -> ConnectionStatus {
        match &self.session {
            Some(session) => session.status(),
            None => ConnectionStatus::Disconnected,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.session.is_some()
    }

    /// Ordered copy of the log for rendering
    pub async fn entries(&self) -> Vec<LogEntry> {
        self.log.snapshot().await
    }

    /// Empty the log; session state and any in-flight accumulator are
    /// untouched
    pub async fn clear(&self) {
        self.log.clear().await;
        info!("Event log cleared");
    }

    /// Re-enumerate ports for the selection UI
    pub fn refresh_ports(&self, current_selection: Option<&str>) -> MonitorResult<PortRefresh> {
        self.directory.refresh(current_selection)
    }

    pub fn directory(&self) -> &PortDirectory {
        &self.directory
    }
}
