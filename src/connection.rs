//! Connection view
//!
//! Read-only snapshot of one NetworkManager connection record, with
//! mutation pass-throughs to the owning [`Nmcli`] wrapper. The snapshot
//! never updates on its own; call `refresh` to pull the newest state.

use crate::nmcli::Nmcli;
use crate::parser::Record;
use std::fmt;

/// States that count as active, matched case-insensitively
const ACTIVE_STATES: &[&str] = &["activated", "connected", "active"];

pub struct Connection<'a> {
    data: Record,
    nmcli: &'a Nmcli,
}

impl<'a> Connection<'a> {
    pub(crate) fn new(data: Record, nmcli: &'a Nmcli) -> Self {
        Self { data, nmcli }
    }

    /// Connection name (`NAME`), empty when absent
    pub fn name(&self) -> &str {
        self.data.get("NAME").unwrap_or("")
    }

    /// Connection UUID (`UUID`)
    pub fn uuid(&self) -> &str {
        self.data.get("UUID").unwrap_or("")
    }

    /// Connection type (`TYPE`), e.g. `wifi` or `ethernet`
    pub fn connection_type(&self) -> &str {
        self.data.get("TYPE").unwrap_or("")
    }

    /// Device the connection is bound to (`DEVICE`)
    pub fn device(&self) -> &str {
        self.data.get("DEVICE").unwrap_or("")
    }

    /// Connection state (`STATE`)
    pub fn state(&self) -> &str {
        self.data.get("STATE").unwrap_or("")
    }

    pub fn is_active(&self) -> bool {
        let state = self.state().to_lowercase();
        ACTIVE_STATES.contains(&state.as_str())
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

    /// Bring this connection up
    pub async fn up(&self) -> bool {
        self.nmcli.up(self.name()).await
    }

    /// Bring this connection down
    pub async fn down(&self) -> bool {
        self.nmcli.down(self.name()).await
    }

    /// Modify this connection with `setting value` options
    pub async fn modify(&self, options: &[(&str, &str)]) -> bool {
        self.nmcli.modify(self.name(), options).await
    }

    /// Delete this connection
    pub async fn delete(&self) -> bool {
        self.nmcli.delete(self.name()).await
    }

    /// Clone this connection under a new name
    pub async fn clone_to(&self, new_name: &str) -> bool {
        self.nmcli.clone_connection(self.name(), new_name).await
    }

    /// Export this connection to a file
    pub async fn export(&self, filename: &str) -> bool {
        self.nmcli.export(self.name(), filename).await
    }

    /// Ready-to-run command string for interactive editing
    pub fn edit_command(&self) -> String {
        self.nmcli.edit(self.name())
    }

    /// Detail records for this connection
    pub async fn show(&self) -> Vec<Record> {
        self.nmcli.show(Some(self.name())).await
    }

    /// Reload all connection files, then refresh this snapshot
    pub async fn reload(&mut self) -> bool {
        let reloaded = self.nmcli.reload().await;
        if reloaded {
            self.refresh().await;
        }
        reloaded
    }

    /// Merge the newest detail record into this snapshot. Leaves the
    /// data unchanged when the query returns nothing.
    pub async fn refresh(&mut self) -> &mut Self {
        let details = self.nmcli.show(Some(self.name())).await;
        if let Some(newest) = details.first() {
            self.data.merge(newest);
        }
        self
    }
}

impl fmt::Display for Connection<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Connection[{}] Type: {}, Device: {}, State: {}",
            self.name(),
            self.connection_type(),
            self.device(),
            self.state()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(state: &str) -> Record {
        [
            ("NAME", "Home"),
            ("UUID", "aaa-bbb"),
            ("TYPE", "wifi"),
            ("DEVICE", "wlan0"),
            ("STATE", state),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_getters_default_to_empty() {
        let nmcli = Nmcli::new(false);
        let conn = Connection::new(Record::new(), &nmcli);
        assert_eq!(conn.name(), "");
        assert_eq!(conn.uuid(), "");
        assert_eq!(conn.state(), "");
        assert_eq!(conn.get("NAME"), None);
        assert!(!conn.has("NAME"));
    }

    #[test]
    fn test_is_active_case_insensitive() {
        let nmcli = Nmcli::new(false);
        for state in ["activated", "ACTIVATED", "Connected", "active"] {
            assert!(Connection::new(record(state), &nmcli).is_active(), "{state}");
        }
        for state in ["disconnected", "deactivating", ""] {
            assert!(!Connection::new(record(state), &nmcli).is_active(), "{state}");
        }
    }

    #[test]
    fn test_display_summary() {
        let nmcli = Nmcli::new(false);
        let conn = Connection::new(record("activated"), &nmcli);
        assert_eq!(
            conn.to_string(),
            "Connection[Home] Type: wifi, Device: wlan0, State: activated"
        );
    }
}
