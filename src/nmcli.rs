//! nmcli process invocation and the caller-facing operation surface
//!
//! `Nmcli` owns the invocation policy (sudo prefix, tool path, optional
//! timeout) and retains the raw output and exit code of the most recent
//! invocation for callers that need to distinguish "no items" from a
//! failed invocation. Query methods swallow tool failure and return an
//! empty result; mutation methods return a success flag. One wrapper
//! instance is meant for one logical session; it spawns one child
//! process per call and blocks until it exits.

use crate::command::CommandBuilder;
use crate::connection::Connection;
use crate::device::Device;
use crate::error::{NmctlError, NmctlResult};
use crate::parser::{parse_multiline, Record};
use crate::wifi::WifiNetwork;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Raw result of the most recent invocation
#[derive(Debug, Clone, Default)]
struct LastInvocation {
    output: Vec<String>,
    code: Option<i32>,
}

/// Wrapper over the nmcli command-line tool
pub struct Nmcli {
    /// Prefix invocations with sudo
    use_sudo: bool,
    /// Path to the nmcli binary
    nmcli_bin: PathBuf,
    /// Optional bound on how long one invocation may run
    timeout: Option<Duration>,
    /// Most recent raw stdout lines and exit code, overwritten per call
    last: Mutex<LastInvocation>,
}

impl Nmcli {
    pub fn new(use_sudo: bool) -> Self {
        Self {
            use_sudo,
            nmcli_bin: PathBuf::from("nmcli"),
            timeout: None,
            last: Mutex::new(LastInvocation::default()),
        }
    }

    /// Use a different nmcli binary path
    pub fn with_nmcli_bin(mut self, bin: impl Into<PathBuf>) -> Self {
        self.nmcli_bin = bin.into();
        self
    }

    /// Bound every invocation to the given duration
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn set_timeout(&mut self, timeout: Option<Duration>) {
        self.timeout = timeout;
    }

    /// Enable or disable the sudo prefix for subsequent invocations
    pub fn set_use_sudo(&mut self, use_sudo: bool) {
        self.use_sudo = use_sudo;
    }

    pub fn use_sudo(&self) -> bool {
        self.use_sudo
    }

    /// Raw stdout lines of the most recent invocation
    pub fn last_output(&self) -> Vec<String> {
        self.last_state().output.clone()
    }

    /// Exit code of the most recent invocation, `None` when the tool
    /// was killed or could not be spawned
    pub fn last_return_code(&self) -> Option<i32> {
        self.last_state().code
    }

    fn last_state(&self) -> MutexGuard<'_, LastInvocation> {
        self.last.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Spawn `[sudo] nmcli <args...>`, capture stdout lines, and fail
    /// with the captured diagnostic text on non-zero exit.
    pub(crate) async fn execute(&self, builder: &CommandBuilder) -> NmctlResult<Vec<String>> {
        let rendered = builder.render(self.use_sudo);
        debug!(command = %rendered, "invoking nmcli");

        let mut cmd = if self.use_sudo {
            let mut cmd = Command::new("sudo");
            cmd.arg(&self.nmcli_bin);
            cmd
        } else {
            Command::new(&self.nmcli_bin)
        };
        cmd.args(builder.argv());
        cmd.kill_on_drop(true);

        let result = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, cmd.output()).await {
                Ok(result) => result,
                Err(_) => {
                    *self.last_state() = LastInvocation::default();
                    warn!(command = %rendered, timeout = ?limit, "nmcli invocation timed out");
                    return Err(NmctlError::Timeout(rendered));
                }
            },
            None => cmd.output().await,
        };

        let output = match result {
            Ok(output) => output,
            Err(e) => {
                *self.last_state() = LastInvocation::default();
                return Err(NmctlError::CommandFailed {
                    cmd: rendered,
                    code: None,
                    output: e.to_string(),
                });
            }
        };

        let lines: Vec<String> = String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect();
        let code = output.status.code();

        *self.last_state() = LastInvocation { output: lines.clone(), code };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diagnostic = if stderr.trim().is_empty() {
                lines.join("\n")
            } else {
                stderr.trim().to_string()
            };
            warn!(command = %rendered, code = ?code, "nmcli invocation failed");
            return Err(NmctlError::CommandFailed { cmd: rendered, code, output: diagnostic });
        }

        Ok(lines)
    }

    /// Run a query whose output feeds the record parser, swallowing
    /// tool failure into an empty sequence.
    async fn query(&self, builder: &CommandBuilder) -> Vec<Record> {
        match self.execute(builder).await {
            Ok(lines) => parse_multiline(&lines),
            Err(_) => Vec::new(),
        }
    }

    /// Run a mutation, translating tool failure into `false`.
    async fn mutate(&self, builder: &CommandBuilder) -> bool {
        self.execute(builder).await.is_ok()
    }

    // === Connections ===

    /// All connections known to NetworkManager
    pub async fn connections(&self) -> Vec<Connection<'_>> {
        let builder = CommandBuilder::multiline().args(["con", "show"]);
        self.query(&builder)
            .await
            .into_iter()
            .map(|record| Connection::new(record, self))
            .collect()
    }

    /// One connection by name, `None` when absent or on tool failure
    pub async fn connection(&self, name: &str) -> Option<Connection<'_>> {
        let builder = CommandBuilder::multiline().args(["con", "show"]).arg(name);
        self.query(&builder)
            .await
            .into_iter()
            .next()
            .map(|record| Connection::new(record, self))
    }

    /// Connection details as raw records, all connections or one by name
    pub async fn show(&self, connection: Option<&str>) -> Vec<Record> {
        let mut builder = CommandBuilder::multiline().args(["con", "show"]);
        if let Some(name) = connection {
            builder = builder.arg(name);
        }
        self.query(&builder).await
    }

    /// Bring a named connection up
    pub async fn up(&self, connection: &str) -> bool {
        self.mutate(&CommandBuilder::new().args(["con", "up"]).arg(connection)).await
    }

    /// Bring a named connection down
    pub async fn down(&self, connection: &str) -> bool {
        self.mutate(&CommandBuilder::new().args(["con", "down"]).arg(connection)).await
    }

    /// Add a connection of the given type with `setting value` options
    pub async fn add(&self, conn_type: &str, con_name: &str, options: &[(&str, &str)]) -> bool {
        let builder = CommandBuilder::new()
            .args(["con", "add", "type"])
            .arg(conn_type)
            .arg("con-name")
            .arg(con_name)
            .options(options.iter().copied());
        self.mutate(&builder).await
    }

    /// Modify a connection with `setting value` options
    pub async fn modify(&self, connection: &str, options: &[(&str, &str)]) -> bool {
        let builder = CommandBuilder::new()
            .args(["con", "modify"])
            .arg(connection)
            .options(options.iter().copied());
        self.mutate(&builder).await
    }

    /// Clone a connection under a new name
    pub async fn clone_connection(&self, connection: &str, new_name: &str) -> bool {
        let builder = CommandBuilder::new()
            .args(["con", "clone"])
            .arg(connection)
            .arg(new_name);
        self.mutate(&builder).await
    }

    /// Delete a connection
    pub async fn delete(&self, connection: &str) -> bool {
        self.mutate(&CommandBuilder::new().args(["con", "delete"]).arg(connection)).await
    }

    /// Reload all connection files from disk
    pub async fn reload(&self) -> bool {
        self.mutate(&CommandBuilder::new().args(["con", "reload"])).await
    }

    /// Load one connection file from disk
    pub async fn load(&self, filename: &str) -> bool {
        self.mutate(&CommandBuilder::new().args(["con", "load"]).arg(filename)).await
    }

    /// Import a connection (e.g. a VPN profile) from a file
    pub async fn import(&self, conn_type: &str, filename: &str) -> bool {
        let builder = CommandBuilder::new()
            .args(["con", "import", "type"])
            .arg(conn_type)
            .arg("file")
            .arg(filename);
        self.mutate(&builder).await
    }

    /// Export a connection to a file
    pub async fn export(&self, connection: &str, filename: &str) -> bool {
        let builder = CommandBuilder::new()
            .args(["con", "export"])
            .arg(connection)
            .arg(filename);
        self.mutate(&builder).await
    }

    /// Ready-to-run command string for interactive connection editing.
    /// Never executed here; editing needs a terminal.
    pub fn edit(&self, connection: &str) -> String {
        CommandBuilder::new()
            .args(["con", "edit"])
            .arg(connection)
            .render(self.use_sudo)
    }

    /// Ready-to-run command string for interactive connection monitoring
    pub fn monitor(&self) -> String {
        CommandBuilder::new().args(["con", "monitor"]).render(self.use_sudo)
    }

    // === Devices ===

    /// All devices known to NetworkManager
    pub async fn devices(&self) -> Vec<Device<'_>> {
        let builder = CommandBuilder::multiline().args(["dev", "status"]);
        self.query(&builder)
            .await
            .into_iter()
            .map(|record| Device::new(record, self))
            .collect()
    }

    /// One device by name, `None` when absent or on tool failure
    pub async fn device(&self, name: &str) -> Option<Device<'_>> {
        self.devices().await.into_iter().find(|d| d.name() == name)
    }

    /// Device details as raw records, all devices or one by name
    pub async fn device_details(&self, device: Option<&str>) -> Vec<Record> {
        let mut builder = CommandBuilder::multiline().args(["dev", "show"]);
        if let Some(name) = device {
            builder = builder.arg(name);
        }
        self.query(&builder).await
    }

    /// Connect a device, optionally activating a specific connection
    pub async fn connect_device(&self, device: &str, connection: Option<&str>) -> bool {
        let mut builder = CommandBuilder::new().args(["dev", "connect"]).arg(device);
        if let Some(name) = connection {
            builder = builder.arg(name);
        }
        self.mutate(&builder).await
    }

    /// Disconnect a device
    pub async fn disconnect_device(&self, device: &str) -> bool {
        self.mutate(&CommandBuilder::new().args(["dev", "disconnect"]).arg(device)).await
    }

    // === WiFi ===

    /// Visible wireless networks, optionally scanned through one device
    pub async fn wifi_networks(&self, device: Option<&str>) -> Vec<WifiNetwork<'_>> {
        let mut builder = CommandBuilder::multiline().args(["dev", "wifi", "list"]);
        if let Some(name) = device {
            builder = builder.arg("ifname").arg(name);
        }
        self.query(&builder)
            .await
            .into_iter()
            .map(|record| WifiNetwork::new(record, self, device.map(str::to_string)))
            .collect()
    }

    /// Connect to a wireless network by SSID
    pub async fn connect_wifi(
        &self,
        ssid: &str,
        password: Option<&str>,
        device: Option<&str>,
    ) -> bool {
        let mut builder = CommandBuilder::new().args(["dev", "wifi", "connect"]).arg(ssid);
        if let Some(password) = password {
            builder = builder.arg("password").arg(password);
        }
        if let Some(name) = device {
            builder = builder.arg("ifname").arg(name);
        }
        self.mutate(&builder).await
    }

    /// Create a wireless hotspot. The SSID doubles as the connection
    /// profile name.
    pub async fn create_hotspot(
        &self,
        ssid: &str,
        password: Option<&str>,
        device: Option<&str>,
    ) -> bool {
        let mut builder = CommandBuilder::new().args(["dev", "wifi", "hotspot"]);
        if let Some(name) = device {
            builder = builder.arg("ifname").arg(name);
        }
        builder = builder.arg("con-name").arg(ssid);
        if let Some(password) = password {
            builder = builder.arg("password").arg(password);
        }
        self.mutate(&builder).await
    }
}

impl Default for Nmcli {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::os::unix::fs::PermissionsExt;

    /// Write an executable shell script standing in for nmcli
    fn fake_nmcli(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("fake-nmcli");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "#!/bin/sh").unwrap();
        file.write_all(body.as_bytes()).unwrap();
        drop(file);
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    fn client(dir: &tempfile::TempDir, body: &str) -> Nmcli {
        Nmcli::new(false).with_nmcli_bin(fake_nmcli(dir, body))
    }

    #[tokio::test]
    async fn test_connections_from_canned_output() {
        let dir = tempfile::tempdir().unwrap();
        let nmcli = client(
            &dir,
            concat!(
                "printf 'NAME: Home\\nUUID: aaa\\nTYPE: wifi\\nDEVICE: wlan0\\nSTATE: activated\\n'\n",
                "printf 'NAME: Office\\nUUID: bbb\\nTYPE: ethernet\\nDEVICE: eth0\\nSTATE: disconnected\\n'\n",
            ),
        );

        let connections = nmcli.connections().await;
        assert_eq!(connections.len(), 2);
        assert_eq!(connections[0].name(), "Home");
        assert!(connections[0].is_active());
        assert_eq!(connections[1].name(), "Office");
        assert!(!connections[1].is_active());
        assert_eq!(nmcli.last_return_code(), Some(0));
    }

    #[tokio::test]
    async fn test_failure_swallowed_but_inspectable() {
        let dir = tempfile::tempdir().unwrap();
        let nmcli = client(&dir, "echo 'ERROR: no such connection'\nexit 1\n");

        assert!(nmcli.connections().await.is_empty());
        assert!(!nmcli.up("nope").await);
        assert_eq!(nmcli.last_return_code(), Some(1));
        assert_eq!(nmcli.last_output(), vec!["ERROR: no such connection".to_string()]);
    }

    #[tokio::test]
    async fn test_command_failed_carries_diagnostic() {
        let dir = tempfile::tempdir().unwrap();
        let nmcli = client(&dir, "echo 'ERROR: no such connection'\nexit 1\n");

        let err = nmcli
            .execute(&CommandBuilder::new().args(["con", "up", "nope"]))
            .await
            .unwrap_err();
        match err {
            NmctlError::CommandFailed { code, output, .. } => {
                assert_eq!(code, Some(1));
                assert!(output.contains("no such connection"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_missing_binary_yields_empty_and_false() {
        let nmcli = Nmcli::new(false).with_nmcli_bin("/nonexistent/nmcli");
        assert!(nmcli.devices().await.is_empty());
        assert!(!nmcli.reload().await);
        assert_eq!(nmcli.last_return_code(), None);
    }

    #[tokio::test]
    async fn test_timeout_bounds_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let nmcli = client(&dir, "sleep 10\n").with_timeout(Duration::from_millis(100));

        let start = std::time::Instant::now();
        assert!(!nmcli.up("Home").await);
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(nmcli.last_return_code(), None);
    }

    #[tokio::test]
    async fn test_device_lookup_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let nmcli = client(
            &dir,
            concat!(
                "printf 'DEVICE: wlan0\\nTYPE: wifi\\nSTATE: connected\\nCONNECTION: Home\\n'\n",
                "printf 'DEVICE: eth0\\nTYPE: ethernet\\nSTATE: unavailable\\nCONNECTION: \\n'\n",
            ),
        );

        let device = nmcli.device("eth0").await.expect("device should exist");
        assert!(device.is_ethernet());
        assert!(!device.is_available());
        assert!(nmcli.device("wlan9").await.is_none());
    }

    #[tokio::test]
    async fn test_wifi_networks_carry_origin_device() {
        let dir = tempfile::tempdir().unwrap();
        let nmcli = client(
            &dir,
            "printf 'SSID: CoffeeShop\\nSIGNAL: 72\\nSECURITY: WPA2\\nMODE: Infra\\n'\n",
        );

        let networks = nmcli.wifi_networks(Some("wlan0")).await;
        assert_eq!(networks.len(), 1);
        assert_eq!(networks[0].ssid(), "CoffeeShop");
        assert_eq!(networks[0].device(), Some("wlan0"));
    }

    #[test]
    fn test_edit_and_monitor_are_formatted_not_executed() {
        let mut nmcli = Nmcli::new(true);
        assert_eq!(nmcli.edit("Home"), "sudo nmcli con edit Home");
        assert_eq!(nmcli.monitor(), "sudo nmcli con monitor");

        nmcli.set_use_sudo(false);
        assert!(!nmcli.use_sudo());
        let edit = nmcli.edit("My Home's Network");
        let words = shlex::split(&edit).expect("must re-split");
        assert_eq!(words, ["nmcli", "con", "edit", "My Home's Network"]);
    }
}
