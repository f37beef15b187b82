use crate::core::transport::SerialTransport;
use crate::domain::config::{BAUD_RATES, DEFAULT_BAUD_RATE};
use crate::domain::error::MonitorResult;
use std::sync::Arc;
use tracing::debug;

/// Result of one directory refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortRefresh {
    /// Currently available ports, in platform enumeration order
    pub ports: Vec<String>,
    /// Selection after the identity-preserving policy was applied
    pub selection: Option<String>,
}

/// Enumerates ports and baud rates for the selection UI
///
/// Refresh is re-run every time the selection is about to be presented
/// rather than cached, because ports hot-plug between interactions.
pub struct PortDirectory {
    transport: Arc<dyn SerialTransport>,
    default_baud: u32,
}

impl PortDirectory {
    pub fn new(transport: Arc<dyn SerialTransport>) -> Self {
        Self {
            transport,
            default_baud: DEFAULT_BAUD_RATE,
        }
    }

    pub fn with_default_baud(mut self, baud: u32) -> Self {
        self.default_baud = baud;
        self
    }

    /// Re-enumerate ports, preserving the current selection when it is
    /// still present; otherwise the first available port is selected, or
    /// none if the list is empty.
    pub fn refresh(&self, current_selection: Option<&str>) -> MonitorResult<PortRefresh> {
        let ports = self.transport.list_ports()?;
        debug!("Enumerated {} serial ports", ports.len());

        let selection = match current_selection {
            Some(current) if ports.iter().any(|p| p == current) => Some(current.to_string()),
            _ => ports.first().cloned(),
        };

        Ok(PortRefresh { ports, selection })
    }

    /// The fixed baud-rate choices, in presentation order
    pub fn baud_rates(&self) -> &'static [u32] {
        &BAUD_RATES
    }

    pub fn default_baud(&self) -> u32 {
        self.default_baud
    }
}
