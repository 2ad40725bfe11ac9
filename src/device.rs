//! Device view
//!
//! Read-only snapshot of one NetworkManager device record. WiFi-only
//! operations short-circuit on non-wifi devices without invoking the
//! tool at all.

use crate::nmcli::Nmcli;
use crate::parser::Record;
use crate::wifi::WifiNetwork;
use std::fmt;

const CONNECTED_STATES: &[&str] = &["connected", "activated", "up"];
const UNAVAILABLE_STATES: &[&str] = &["unavailable", "unmanaged"];

pub struct Device<'a> {
    data: Record,
    nmcli: &'a Nmcli,
}

impl<'a> Device<'a> {
    pub(crate) fn new(data: Record, nmcli: &'a Nmcli) -> Self {
        Self { data, nmcli }
    }

    /// Device name (`DEVICE`), empty when absent
    pub fn name(&self) -> &str {
        self.data.get("DEVICE").unwrap_or("")
    }

    /// Device type (`TYPE`), e.g. `wifi` or `ethernet`
    pub fn device_type(&self) -> &str {
        self.data.get("TYPE").unwrap_or("")
    }

    /// Device state (`STATE`)
    pub fn state(&self) -> &str {
        self.data.get("STATE").unwrap_or("")
    }

    /// Name of the active connection on this device (`CONNECTION`)
    pub fn connection(&self) -> &str {
        self.data.get("CONNECTION").unwrap_or("")
    }

    pub fn is_connected(&self) -> bool {
        let state = self.state().to_lowercase();
        CONNECTED_STATES.contains(&state.as_str())
    }

    pub fn is_available(&self) -> bool {
        let state = self.state().to_lowercase();
        !UNAVAILABLE_STATES.contains(&state.as_str())
    }

    pub fn is_wifi(&self) -> bool {
        self.device_type().eq_ignore_ascii_case("wifi")
    }

    pub fn is_ethernet(&self) -> bool {
        self.device_type().eq_ignore_ascii_case("ethernet")
    }

    /// Look up any field by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(key)
    }

    pub fn has(&self, key: &str) -> bool {
        self.data.has(key)
    }

    /// The underlying record snapshot
    pub fn record(&self) -> &Record {
        &self.data
    }

    /// Connect this device, optionally activating a specific connection
    pub async fn connect(&self, connection: Option<&str>) -> bool {
        self.nmcli.connect_device(self.name(), connection).await
    }

    /// Disconnect this device
    pub async fn disconnect(&self) -> bool {
        self.nmcli.disconnect_device(self.name()).await
    }

    /// Detail records for this device
    pub async fn details(&self) -> Vec<Record> {
        self.nmcli.device_details(Some(self.name())).await
    }

    /// Wireless networks visible through this device. Empty without
    /// invoking the tool when the device is not wifi.
    pub async fn wifi_networks(&self) -> Vec<WifiNetwork<'a>> {
        if !self.is_wifi() {
            return Vec::new();
        }
        self.nmcli.wifi_networks(Some(self.name())).await
    }

    /// Connect this device to a wireless network. `false` without
    /// invoking the tool when the device is not wifi.
    pub async fn connect_wifi(&self, ssid: &str, password: Option<&str>) -> bool {
        if !self.is_wifi() {
            return false;
        }
        self.nmcli.connect_wifi(ssid, password, Some(self.name())).await
    }

    /// Create a hotspot on this device. `false` without invoking the
    /// tool when the device is not wifi.
    pub async fn create_hotspot(&self, ssid: &str, password: Option<&str>) -> bool {
        if !self.is_wifi() {
            return false;
        }
        self.nmcli.create_hotspot(ssid, password, Some(self.name())).await
    }

    /// Replace this snapshot with the newest status record for the same
    /// device name. Leaves the data unchanged when no record matches.
    pub async fn refresh(&mut self) -> &mut Self {
        let devices = self.nmcli.devices().await;
        if let Some(newest) = devices.into_iter().find(|d| d.name() == self.name()) {
            self.data = newest.data;
        }
        self
    }
}

impl fmt::Display for Device<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let connection = self.connection();
        write!(
            f,
            "Device[{}] Type: {}, State: {}, Connection: {}",
            self.name(),
            self.device_type(),
            self.state(),
            if connection.is_empty() { "None" } else { connection }
        )
    }
}
