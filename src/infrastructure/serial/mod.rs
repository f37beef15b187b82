// Serial module - Platform serial port implementation
pub mod client;

pub use client::{SerialClient, SystemTransport};
