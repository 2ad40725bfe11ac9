//! Wireless network view
//!
//! Read-only snapshot of one scanned wireless network, plus the device
//! name that discovered it when known.

use crate::nmcli::Nmcli;
use crate::parser::Record;
use std::cmp::Ordering;
use std::fmt;

/// Bucketed signal-strength label, evaluated top-down with inclusive
/// lower bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalQuality {
    Excellent,
    VeryGood,
    Good,
    Fair,
    Weak,
    VeryWeak,
}

impl SignalQuality {
    pub fn from_strength(strength: i32) -> Self {
        if strength >= 80 {
            SignalQuality::Excellent
        } else if strength >= 70 {
            SignalQuality::VeryGood
        } else if strength >= 60 {
            SignalQuality::Good
        } else if strength >= 50 {
            SignalQuality::Fair
        } else if strength >= 30 {
            SignalQuality::Weak
        } else {
            SignalQuality::VeryWeak
        }
    }
}

impl fmt::Display for SignalQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SignalQuality::Excellent => "Excellent",
            SignalQuality::VeryGood => "Very Good",
            SignalQuality::Good => "Good",
            SignalQuality::Fair => "Fair",
            SignalQuality::Weak => "Weak",
            SignalQuality::VeryWeak => "Very Weak",
        };
        f.write_str(label)
    }
}

pub struct WifiNetwork<'a> {
    data: Record,
    nmcli: &'a Nmcli,
    device: Option<String>,
}

impl<'a> WifiNetwork<'a> {
    pub(crate) fn new(data: Record, nmcli: &'a Nmcli, device: Option<String>) -> Self {
        Self { data, nmcli, device }
    }

    /// Network SSID (`SSID`), empty when absent
    pub fn ssid(&self) -> &str {
        self.data.get("SSID").unwrap_or("")
    }

    /// Access point MAC address (`BSSID`)
    pub fn bssid(&self) -> &str {
        self.data.get("BSSID").unwrap_or("")
    }

    /// Raw signal field (`SIGNAL`)
    pub fn signal(&self) -> &str {
        self.data.get("SIGNAL").unwrap_or("")
    }

    /// Security descriptor (`SECURITY`), e.g. `WPA2`
    pub fn security(&self) -> &str {
        self.data.get("SECURITY").unwrap_or("")
    }

    /// Network mode (`MODE`), e.g. `Infra`
    pub fn mode(&self) -> &str {
        self.data.get("MODE").unwrap_or("")
    }

    /// Channel number (`CHAN`)
    pub fn channel(&self) -> &str {
        self.data.get("CHAN").unwrap_or("")
    }

    /// Frequency (`FREQ`)
    pub fn frequency(&self) -> &str {
        self.data.get("FREQ").unwrap_or("")
    }

    /// Data rate (`RATE`)
    pub fn rate(&self) -> &str {
        self.data.get("RATE").unwrap_or("")
    }

    /// Device name this network was discovered through, when known
    pub fn device(&self) -> Option<&str> {
        self.device.as_deref()
    }

    /// Signal strength as an integer. Falls back to the first run of
    /// digits when the field is not purely numeric, and to 0 when no
    /// digits are present.
    pub fn signal_strength(&self) -> i32 {
        let signal = self.signal().trim();
        if let Ok(strength) = signal.parse::<i32>() {
            return strength;
        }
        let digits: String = signal
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(char::is_ascii_digit)
            .collect();
        digits.parse().unwrap_or(0)
    }

    pub fn signal_quality(&self) -> SignalQuality {
        SignalQuality::from_strength(self.signal_strength())
    }

    /// Secured when the security field is non-empty and neither `--`
    /// nor `none` (any case)
    pub fn is_secured(&self) -> bool {
        let security = self.security().to_lowercase();
        !security.is_empty() && security != "--" && security != "none"
    }

    pub fn is_open(&self) -> bool {
        !self.is_secured()
    }

    pub fn is_wpa(&self) -> bool {
        self.security().to_lowercase().contains("wpa")
    }

    pub fn is_wep(&self) -> bool {
        self.security().to_lowercase().contains("wep")
    }

    pub fn has_strong_signal(&self) -> bool {
        self.signal_strength() >= 70
    }

    pub fn has_good_signal(&self) -> bool {
        self.signal_strength() >= 50
    }

    pub fn has_weak_signal(&self) -> bool {
        self.signal_strength() < 30
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

    /// Connect to this network. An explicit device overrides the one
    /// that discovered the network.
    pub async fn connect(&self, password: Option<&str>, device: Option<&str>) -> bool {
        let device = device.or(self.device.as_deref());
        self.nmcli.connect_wifi(self.ssid(), password, device).await
    }

    /// Whether some connected wifi device carries a connection whose
    /// name contains this SSID
    pub async fn is_connected(&self) -> bool {
        let ssid = self.ssid();
        if ssid.is_empty() {
            return false;
        }
        self.nmcli
            .devices()
            .await
            .iter()
            .any(|d| d.is_wifi() && d.is_connected() && d.connection().contains(ssid))
    }

    /// Descending by signal strength, for sorting scan results
    pub fn cmp_by_signal(&self, other: &WifiNetwork<'_>) -> Ordering {
        other.signal_strength().cmp(&self.signal_strength())
    }

    /// Lexicographic by SSID
    pub fn cmp_by_ssid(&self, other: &WifiNetwork<'_>) -> Ordering {
        self.ssid().cmp(other.ssid())
    }
}

impl fmt::Display for WifiNetwork<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let security = self.security();
        write!(
            f,
            "WiFi[{}] Signal: {}%, Security: {}, Quality: {}",
            self.ssid(),
            self.signal_strength(),
            if security.is_empty() { "Open" } else { security },
            self.signal_quality()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn network<'a>(nmcli: &'a Nmcli, signal: &str, security: &str) -> WifiNetwork<'a> {
        let data: Record = [
            ("SSID", "CoffeeShop"),
            ("BSSID", "AA:BB:CC:DD:EE:FF"),
            ("SIGNAL", signal),
            ("SECURITY", security),
            ("MODE", "Infra"),
            ("CHAN", "6"),
            ("FREQ", "2437 MHz"),
            ("RATE", "270 Mbit/s"),
        ]
        .into_iter()
        .collect();
        WifiNetwork::new(data, nmcli, Some("wlan0".to_string()))
    }

    #[test]
    fn test_signal_quality_boundaries() {
        let cases = [
            (79, SignalQuality::VeryGood),
            (80, SignalQuality::Excellent),
            (69, SignalQuality::Good),
            (70, SignalQuality::VeryGood),
            (59, SignalQuality::Fair),
            (60, SignalQuality::Good),
            (49, SignalQuality::Weak),
            (50, SignalQuality::Fair),
            (29, SignalQuality::VeryWeak),
            (30, SignalQuality::Weak),
        ];
        for (strength, expected) in cases {
            assert_eq!(SignalQuality::from_strength(strength), expected, "{strength}");
        }
    }

    #[test]
    fn test_signal_quality_labels() {
        assert_eq!(SignalQuality::VeryGood.to_string(), "Very Good");
        assert_eq!(SignalQuality::VeryWeak.to_string(), "Very Weak");
        assert_eq!(SignalQuality::Excellent.to_string(), "Excellent");
    }

    #[test]
    fn test_signal_strength_extraction() {
        let nmcli = Nmcli::new(false);
        assert_eq!(network(&nmcli, "72", "WPA2").signal_strength(), 72);
        assert_eq!(network(&nmcli, "72%", "WPA2").signal_strength(), 72);
        assert_eq!(network(&nmcli, " 55 ", "WPA2").signal_strength(), 55);
        assert_eq!(network(&nmcli, "garbage", "WPA2").signal_strength(), 0);
        assert_eq!(network(&nmcli, "", "WPA2").signal_strength(), 0);
    }

    #[test]
    fn test_is_secured() {
        let nmcli = Nmcli::new(false);
        for security in ["", "--", "none", "NONE", "None"] {
            let net = network(&nmcli, "50", security);
            assert!(!net.is_secured(), "{security:?}");
            assert!(net.is_open(), "{security:?}");
        }
        assert!(network(&nmcli, "50", "WPA2").is_secured());
        assert!(network(&nmcli, "50", "WEP").is_secured());
    }

    #[test]
    fn test_security_family_predicates() {
        let nmcli = Nmcli::new(false);
        let wpa = network(&nmcli, "50", "WPA1 WPA2");
        assert!(wpa.is_wpa());
        assert!(!wpa.is_wep());
        let wep = network(&nmcli, "50", "WEP");
        assert!(wep.is_wep());
        assert!(!wep.is_wpa());
    }

    #[test]
    fn test_signal_band_predicates() {
        let nmcli = Nmcli::new(false);
        let strong = network(&nmcli, "71", "WPA2");
        assert!(strong.has_strong_signal());
        assert!(strong.has_good_signal());
        assert!(!strong.has_weak_signal());
        let weak = network(&nmcli, "29", "WPA2");
        assert!(!weak.has_good_signal());
        assert!(weak.has_weak_signal());
    }

    #[test]
    fn test_sort_helpers() {
        let nmcli = Nmcli::new(false);
        let stronger = network(&nmcli, "90", "WPA2");
        let weaker = network(&nmcli, "40", "WPA2");
        assert_eq!(stronger.cmp_by_signal(&weaker), Ordering::Less);
        assert_eq!(stronger.cmp_by_ssid(&weaker), Ordering::Equal);
    }

    #[test]
    fn test_display_summary() {
        let nmcli = Nmcli::new(false);
        let net = network(&nmcli, "72", "WPA2");
        assert_eq!(
            net.to_string(),
            "WiFi[CoffeeShop] Signal: 72%, Security: WPA2, Quality: Very Good"
        );
        let open = network(&nmcli, "85", "");
        assert_eq!(
            open.to_string(),
            "WiFi[CoffeeShop] Signal: 85%, Security: Open, Quality: Excellent"
        );
    }
}
