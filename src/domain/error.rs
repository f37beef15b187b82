use thiserror::Error;

/// PortMon unified error type
#[derive(Error, Debug)]
pub enum MonitorError {
    #[error("Port unavailable: '{port}': {message}")]
    PortUnavailable { port: String, message: String },

    #[error("Write failed: {0}")]
    WriteFailure(String),

    #[error("Close failed: {0}")]
    CloseFailure(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Already connected to '{port}'")]
    AlreadyConnected { port: String },

    #[error("Serial port error: {0}")]
    Serial(#[from] serialport::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },
}

pub type MonitorResult<T> = Result<T, MonitorError>;
