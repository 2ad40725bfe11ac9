//! nmctl - Typed wrapper over the nmcli NetworkManager CLI
//!
//! Builds escaped nmcli commands, invokes the tool, reconstructs its
//! `--mode multiline` output into ordered records, and exposes typed
//! views over those records:
//! - Connection management (show, up/down, add, modify, clone, delete,
//!   import/export, reload)
//! - Device management (status, details, connect/disconnect)
//! - WiFi (scan, connect, hotspot)
//!
//! Interactive operations (`con edit`, `con monitor`) are returned as
//! ready-to-run command strings, never executed.
//!
//! Query methods swallow tool failure into empty results and mutation
//! methods into `false`; the raw output and exit code of the most
//! recent invocation stay inspectable on the wrapper.

pub mod command;
pub mod connection;
pub mod device;
pub mod error;
pub mod nmcli;
pub mod parser;
pub mod wifi;

// Re-export commonly used types
pub use command::CommandBuilder;
pub use connection::Connection;
pub use device::Device;
pub use error::{NmctlError, NmctlResult};
pub use nmcli::Nmcli;
pub use parser::{parse_multiline, Record};
pub use wifi::{SignalQuality, WifiNetwork};
