use crate::core::transport::{ByteLink, OpenLink, SerialTransport};
use crate::domain::config::ConnectionConfig;
use crate::domain::error::{MonitorError, MonitorResult};
use async_trait::async_trait;
use serialport::SerialPort;
use std::io::{Read, Write};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tracing::{debug, error, info};

const READ_TIMEOUT: Duration = Duration::from_millis(100);
const READ_BUFFER_SIZE: usize = 1024;
const READ_POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Serial connection backed by the platform port
///
/// Writes go straight to the locked port so `send` is synchronous from
/// the caller's point of view. A background task polls reads and forwards
/// each chunk on an unbounded channel; framing happens upstream.
pub struct SerialClient {
    port: Arc<Mutex<Box<dyn SerialPort + Send>>>,
    rx_handle: Mutex<Option<tokio::task::JoinHandle<()>>>,
}

impl std::fmt::Debug for SerialClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SerialClient").finish_non_exhaustive()
    }
}

impl SerialClient {
    /// Open the port and start the read task
    pub fn open(config: &ConnectionConfig) -> MonitorResult<(Arc<Self>, mpsc::UnboundedReceiver<Vec<u8>>)> {
        let port = serialport::new(&config.port, config.baud_rate)
            .data_bits(serialport::DataBits::Eight)
            .stop_bits(serialport::StopBits::One)
            .parity(serialport::Parity::None)
            .flow_control(serialport::FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| MonitorError::PortUnavailable {
                port: config.port.clone(),
                message: e.to_string(),
            })?;

        info!("Serial port '{}' opened at {} baud", config.port, config.baud_rate);

        let port: Arc<Mutex<Box<dyn SerialPort + Send>>> = Arc::new(Mutex::new(port));
        let (chunk_sender, chunk_receiver) = mpsc::unbounded_channel::<Vec<u8>>();

        // RX task - polls the port and forwards raw chunks
        let port_rx = Arc::clone(&port);
        let rx_handle = tokio::spawn(async move {
            let mut buffer = vec![0u8; READ_BUFFER_SIZE];

            loop {
                tokio::time::sleep(READ_POLL_INTERVAL).await;

                let mut port = port_rx.lock().await;
                match port.read(&mut buffer) {
                    Ok(0) => continue,
                    Ok(n) => {
                        debug!("Read {} bytes from serial port", n);
                        if chunk_sender.send(buffer[..n].to_vec()).is_err() {
                            // Receiver dropped; the session is gone
                            break;
                        }
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::TimedOut => continue,
                    Err(e) => {
                        error!("Failed to read from serial port: {}", e);
                        break;
                    }
                }
            }
        });

        let client = Arc::new(Self {
            port,
            rx_handle: Mutex::new(Some(rx_handle)),
        });

        Ok((client, chunk_receiver))
    }
}

#[async_trait]
impl ByteLink for SerialClient {
    async fn write(&self, bytes: &[u8]) -> MonitorResult<()> {
        let mut port = self.port.lock().await;
        port.write_all(bytes)
            .map_err(|e| MonitorError::WriteFailure(e.to_string()))?;
        debug!("Wrote {} bytes to serial port", bytes.len());
        Ok(())
    }

    async fn close(&self) -> MonitorResult<()> {
        if let Some(handle) = self.rx_handle.lock().await.take() {
            handle.abort();
        }
        // Dropping the last port reference releases the device; flush
        // first so buffered output is not lost
        let mut port = self.port.lock().await;
        port.flush()
            .map_err(|e| MonitorError::CloseFailure(e.to_string()))?;
        info!("Serial client closed");
        Ok(())
    }
}

/// Platform transport over the system serial enumeration
pub struct SystemTransport;

#[async_trait]
impl SerialTransport for SystemTransport {
    fn list_ports(&self) -> MonitorResult<Vec<String>> {
        let ports = serialport::available_ports()?;
        Ok(ports.into_iter().map(|p| p.port_name).collect())
    }

    async fn open(&self, config: &ConnectionConfig) -> MonitorResult<OpenLink> {
        let (client, bytes) = SerialClient::open(config)?;
        Ok(OpenLink {
            link: client,
            bytes,
        })
    }
}
