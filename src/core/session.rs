use crate::core::framing::QuiescenceFramer;
use crate::core::log::{EventLog, LogEntry};
use crate::core::transport::{ByteLink, SerialTransport};
use crate::domain::config::{ConnectionConfig, FramingConfig};
use crate::domain::error::{MonitorError, MonitorResult};
use chrono::Local;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::time::{self, Instant};
use tracing::{debug, info};

/// Connection status exposed at the presentation boundary
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connected { port: String, baud_rate: u32 },
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConnectionStatus::Disconnected => write!(f, "Disconnected"),
            ConnectionStatus::Connected { port, baud_rate } => {
                write!(f, "Connected: {} @ {}", port, baud_rate)
            }
        }
    }
}

/// One open serial connection
///
/// Exists only while open: `connect` is the `Closed -> Open` transition
/// and consuming the value via `disconnect` is `Open -> Closed`, so the
/// state machine state is always explicit in the type. Byte arrival feeds
/// the owned framer; completed frames land in the shared event log as
/// receive entries.
pub struct MonitorSession {
    id: String,
    config: ConnectionConfig,
    link: Arc<dyn ByteLink>,
    framer: Arc<Mutex<QuiescenceFramer>>,
    log: EventLog,
    pump_task: tokio::task::JoinHandle<()>,
    tick_task: tokio::task::JoinHandle<()>,
}

impl MonitorSession {
    /// Open the configured port and start the framing tasks
    ///
    /// On failure nothing is left running and the caller remains
    /// logically `Closed`.
    pub async fn connect(
        transport: &dyn SerialTransport,
        config: ConnectionConfig,
        framing: FramingConfig,
        log: EventLog,
    ) -> MonitorResult<Self> {
        config.validate()?;

        let opened = transport.open(&config).await.map_err(|e| match e {
            MonitorError::PortUnavailable { .. } => e,
            other => MonitorError::PortUnavailable {
                port: config.port.clone(),
                message: other.to_string(),
            },
        })?;

        let id = format!("serial_{}", uuid::Uuid::new_v4().simple());
        let framer = Arc::new(Mutex::new(QuiescenceFramer::new(framing.clone())));

        // Pump task - serializes asynchronous byte arrival into the framer
        let pump_framer = Arc::clone(&framer);
        let mut bytes = opened.bytes;
        let pump_task = tokio::spawn(async move {
            while let Some(chunk) = bytes.recv().await {
                debug!("Received {} bytes from transport", chunk.len());
                pump_framer.lock().await.on_bytes(&chunk, Instant::now());
            }
        });

        // Tick task - flushes a frame once the line has gone quiet
        let tick_framer = Arc::clone(&framer);
        let tick_log = log.clone();
        let tick_task = tokio::spawn(async move {
            let mut interval = time::interval(framing.poll_interval());
            loop {
                interval.tick().await;
                let frame = tick_framer.lock().await.tick(Instant::now());
                if let Some(frame) = frame {
                    tick_log.push(LogEntry::received(&frame, Local::now())).await;
                }
            }
        });

        info!(
            "Opened session '{}' on '{}' at {} baud",
            id, config.port, config.baud_rate
        );

        Ok(Self {
            id,
            config,
            link: opened.link,
            framer,
            log,
            pump_task,
            tick_task,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn status(&self) -> ConnectionStatus {
        ConnectionStatus::Connected {
            port: self.config.port.clone(),
            baud_rate: self.config.baud_rate,
        }
    }

    /// Send a payload and log the echo entry
    ///
    /// A send is already one atomic unit, so the echo entry is written
    /// directly without framing. Empty or whitespace-only payloads are
    /// silently ignored. On transport failure the session stays open and
    /// the error is surfaced; no retry.
    pub async fn send(&self, text: &str) -> MonitorResult<()> {
        if text.trim().is_empty() {
            debug!("Ignoring empty send on session '{}'", self.id);
            return Ok(());
        }

        self.link.write(text.as_bytes()).await.map_err(|e| match e {
            MonitorError::WriteFailure(_) => e,
            other => MonitorError::WriteFailure(other.to_string()),
        })?;

        self.log.push(LogEntry::sent(text.as_bytes(), Local::now())).await;
        Ok(())
    }

    /// Stop framing and release the device
    ///
    /// Both tasks stop before the framer is touched, so the final discard
    /// cannot race an in-flight append. Partially accumulated bytes are
    /// dropped without a log entry. The session value is consumed even
    /// when the transport close fails, so the resulting state is
    /// unambiguously `Closed` with the failure surfaced.
    pub async fn disconnect(self) -> MonitorResult<()> {
        self.pump_task.abort();
        self.tick_task.abort();

        let dropped = self.framer.lock().await.discard();
        if dropped > 0 {
            debug!(
                "Discarded {} partially accumulated bytes on session '{}'",
                dropped, self.id
            );
        }

        self.link.close().await.map_err(|e| match e {
            MonitorError::CloseFailure(_) => e,
            other => MonitorError::CloseFailure(other.to_string()),
        })?;

        info!("Closed session '{}'", self.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transport::OpenLink;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;
    use tokio::sync::mpsc;

    struct MockLink {
        written: Mutex<Vec<Vec<u8>>>,
        fail_writes: AtomicBool,
        fail_close: AtomicBool,
    }

    impl MockLink {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                written: Mutex::new(Vec::new()),
                fail_writes: AtomicBool::new(false),
                fail_close: AtomicBool::new(false),
            })
        }
    }

    #[async_trait]
    impl ByteLink for MockLink {
        async fn write(&self, bytes: &[u8]) -> MonitorResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(MonitorError::WriteFailure("mock write failure".to_string()));
            }
            self.written.lock().await.push(bytes.to_vec());
            Ok(())
        }

        async fn close(&self) -> MonitorResult<()> {
            if self.fail_close.load(Ordering::SeqCst) {
                return Err(MonitorError::CloseFailure("mock close failure".to_string()));
            }
            Ok(())
        }
    }

    struct MockTransport {
        link: Arc<MockLink>,
        feed: Mutex<Option<mpsc::UnboundedSender<Vec<u8>>>>,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                link: MockLink::new(),
                feed: Mutex::new(None),
            }
        }

        async fn feeder(&self) -> mpsc::UnboundedSender<Vec<u8>> {
            self.feed.lock().await.clone().expect("transport not opened")
        }
    }

    #[async_trait]
    impl SerialTransport for MockTransport {
        fn list_ports(&self) -> MonitorResult<Vec<String>> {
            Ok(vec!["COM3".to_string()])
        }

        async fn open(&self, _config: &ConnectionConfig) -> MonitorResult<OpenLink> {
            let (tx, rx) = mpsc::unbounded_channel();
            *self.feed.lock().await = Some(tx);
            Ok(OpenLink {
                link: self.link.clone(),
                bytes: rx,
            })
        }
    }

    async fn open_session(transport: &MockTransport, log: EventLog) -> MonitorSession {
        MonitorSession::connect(
            transport,
            ConnectionConfig::new("COM3", 9600),
            FramingConfig::default(),
            log,
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_status_reports_connection() {
        let transport = MockTransport::new();
        let session = open_session(&transport, EventLog::default()).await;

        assert_eq!(
            session.status(),
            ConnectionStatus::Connected {
                port: "COM3".to_string(),
                baud_rate: 9600,
            }
        );
        session.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_send_writes_and_logs() {
        let transport = MockTransport::new();
        let log = EventLog::default();
        let session = open_session(&transport, log.clone()).await;

        session.send("ping").await.unwrap();

        assert_eq!(*transport.link.written.lock().await, vec![b"ping".to_vec()]);
        let entries = log.snapshot().await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0].line().contains("TRANSMIT DATA: \"ping\", Total: 4 byte"));
        session.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_empty_send_is_silently_ignored() {
        let transport = MockTransport::new();
        let log = EventLog::default();
        let session = open_session(&transport, log.clone()).await;

        session.send("").await.unwrap();
        session.send("   \t ").await.unwrap();

        assert!(transport.link.written.lock().await.is_empty());
        assert!(log.is_empty().await);
        session.disconnect().await.unwrap();
    }

    #[tokio::test]
    async fn test_write_failure_surfaced_and_session_stays_open() {
        let transport = MockTransport::new();
        let log = EventLog::default();
        let session = open_session(&transport, log.clone()).await;

        transport.link.fail_writes.store(true, Ordering::SeqCst);
        let err = session.send("ping").await.unwrap_err();
        assert!(matches!(err, MonitorError::WriteFailure(_)));
        assert!(log.is_empty().await);

        // Still open and usable once the transport recovers
        transport.link.fail_writes.store(false, Ordering::SeqCst);
        session.send("pong").await.unwrap();
        assert_eq!(log.len().await, 1);
        session.disconnect().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_received_burst_framed_into_one_entry() {
        let transport = MockTransport::new();
        let log = EventLog::default();
        let session = open_session(&transport, log.clone()).await;
        let feeder = transport.feeder().await;

        feeder.send(b"ab".to_vec()).unwrap();
        time::sleep(Duration::from_millis(20)).await;
        feeder.send(b"cd\r\n".to_vec()).unwrap();

        // Both chunks under the idle threshold: still one pending frame
        time::sleep(Duration::from_millis(250)).await;

        let entries = log.snapshot().await;
        assert_eq!(entries.len(), 1);
        assert!(entries[0]
            .line()
            .contains("RECEIVE DATA: \"abcd[0x0D][0x0A]\", Total: 6 byte"));
        session.disconnect().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_quiet_gaps_split_frames() {
        let transport = MockTransport::new();
        let log = EventLog::default();
        let session = open_session(&transport, log.clone()).await;
        let feeder = transport.feeder().await;

        feeder.send(b"first".to_vec()).unwrap();
        time::sleep(Duration::from_millis(250)).await;
        feeder.send(b"second".to_vec()).unwrap();
        time::sleep(Duration::from_millis(250)).await;

        let entries = log.snapshot().await;
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "first");
        assert_eq!(entries[1].text, "second");
        session.disconnect().await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_disconnect_discards_partial_bytes() {
        let transport = MockTransport::new();
        let log = EventLog::default();
        let session = open_session(&transport, log.clone()).await;
        let feeder = transport.feeder().await;

        feeder.send(b"partial".to_vec()).unwrap();
        time::sleep(Duration::from_millis(10)).await;
        session.disconnect().await.unwrap();

        // Bytes never reached quiescence; no entry appears afterwards
        time::sleep(Duration::from_millis(500)).await;
        assert!(log.is_empty().await);
    }

    #[tokio::test]
    async fn test_close_failure_surfaced() {
        let transport = MockTransport::new();
        let session = open_session(&transport, EventLog::default()).await;

        transport.link.fail_close.store(true, Ordering::SeqCst);
        let err = session.disconnect().await.unwrap_err();
        assert!(matches!(err, MonitorError::CloseFailure(_)));
    }

    #[tokio::test]
    async fn test_connect_rejects_invalid_config() {
        let transport = MockTransport::new();
        let result = MonitorSession::connect(
            &transport,
            ConnectionConfig::new("COM3", 0),
            FramingConfig::default(),
            EventLog::default(),
        )
        .await;
        assert!(result.is_err());
    }
}
