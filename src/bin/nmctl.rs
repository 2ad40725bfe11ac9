//! nmctl - command-line frontend for the nmcli wrapper library
//!
//! Thin dispatch over the library surface: queries print one summary
//! line per item (or raw records as JSON with --json), mutations map
//! their success flag to the process exit code, and the interactive
//! nmcli operations print a ready-to-run command string.

use clap::{Parser, Subcommand};
use libnmctl::{Nmcli, Record};
use std::process;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "nmctl")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Typed nmcli wrapper - manage connections, devices, and WiFi", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Invoke nmcli without the sudo prefix
    #[arg(long)]
    no_sudo: bool,

    /// Bound each nmcli invocation to this many seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Emit raw records as JSON instead of summary lines
    #[arg(short, long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage connections
    #[command(subcommand)]
    Connection(ConnectionCommands),
    /// Manage devices
    #[command(subcommand)]
    Device(DeviceCommands),
    /// Scan and join wireless networks
    #[command(subcommand)]
    Wifi(WifiCommands),
}

#[derive(Subcommand)]
enum ConnectionCommands {
    /// List all connections
    List,
    /// Show connection details, all connections or one by name
    Show { name: Option<String> },
    /// Bring a connection up
    Up { name: String },
    /// Bring a connection down
    Down { name: String },
    /// Delete a connection
    Delete { name: String },
    /// Clone a connection under a new name
    Clone { name: String, new_name: String },
    /// Reload all connection files from disk
    Reload,
    /// Load one connection file from disk
    Load { filename: String },
    /// Import a connection from a file
    Import {
        #[arg(long = "type")]
        conn_type: String,
        filename: String,
    },
    /// Export a connection to a file
    Export { name: String, filename: String },
    /// Print the command for interactive editing
    Edit { name: String },
    /// Print the command for interactive monitoring
    Monitor,
}

#[derive(Subcommand)]
enum DeviceCommands {
    /// List all devices
    Status,
    /// Show device details, all devices or one by name
    Show { device: Option<String> },
    /// Connect a device, optionally with a specific connection
    Connect {
        device: String,
        connection: Option<String>,
    },
    /// Disconnect a device
    Disconnect { device: String },
}

#[derive(Subcommand)]
enum WifiCommands {
    /// List visible wireless networks
    List {
        /// Scan through a specific device
        #[arg(long)]
        ifname: Option<String>,
    },
    /// Connect to a wireless network
    Connect {
        ssid: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        ifname: Option<String>,
    },
    /// Create a wireless hotspot
    Hotspot {
        ssid: String,
        #[arg(long)]
        password: Option<String>,
        #[arg(long)]
        ifname: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let mut nmcli = Nmcli::new(!cli.no_sudo);
    if let Some(secs) = cli.timeout {
        nmcli.set_timeout(Some(Duration::from_secs(secs)));
    }

    let ok = match &cli.command {
        Commands::Connection(cmd) => handle_connection(cmd, &nmcli, cli.json).await,
        Commands::Device(cmd) => handle_device(cmd, &nmcli, cli.json).await,
        Commands::Wifi(cmd) => handle_wifi(cmd, &nmcli, cli.json).await,
    };

    if !ok {
        report_failure(&nmcli);
        process::exit(1);
    }
}

fn report_failure(nmcli: &Nmcli) {
    let output = nmcli.last_output();
    if output.is_empty() {
        eprintln!("Error: nmcli invocation failed");
    } else {
        eprintln!("Error: {}", output.join("\n"));
    }
}

fn print_records(records: &[&Record], json: bool) {
    if json {
        match serde_json::to_string_pretty(records) {
            Ok(rendered) => println!("{rendered}"),
            Err(e) => eprintln!("Error: {e}"),
        }
        return;
    }
    for (n, record) in records.iter().enumerate() {
        if n > 0 {
            println!();
        }
        for (key, value) in record.iter() {
            println!("{key}: {value}");
        }
    }
}

async fn handle_connection(cmd: &ConnectionCommands, nmcli: &Nmcli, json: bool) -> bool {
    match cmd {
        ConnectionCommands::List => {
            let connections = nmcli.connections().await;
            if json {
                let records: Vec<&Record> = connections.iter().map(|c| c.record()).collect();
                print_records(&records, true);
            } else {
                for connection in &connections {
                    println!("{connection}");
                }
            }
            true
        }
        ConnectionCommands::Show { name } => {
            let records = nmcli.show(name.as_deref()).await;
            let records: Vec<&Record> = records.iter().collect();
            print_records(&records, json);
            true
        }
        ConnectionCommands::Up { name } => nmcli.up(name).await,
        ConnectionCommands::Down { name } => nmcli.down(name).await,
        ConnectionCommands::Delete { name } => nmcli.delete(name).await,
        ConnectionCommands::Clone { name, new_name } => {
            nmcli.clone_connection(name, new_name).await
        }
        ConnectionCommands::Reload => nmcli.reload().await,
        ConnectionCommands::Load { filename } => nmcli.load(filename).await,
        ConnectionCommands::Import { conn_type, filename } => {
            nmcli.import(conn_type, filename).await
        }
        ConnectionCommands::Export { name, filename } => nmcli.export(name, filename).await,
        ConnectionCommands::Edit { name } => {
            println!("{}", nmcli.edit(name));
            true
        }
        ConnectionCommands::Monitor => {
            println!("{}", nmcli.monitor());
            true
        }
    }
}

async fn handle_device(cmd: &DeviceCommands, nmcli: &Nmcli, json: bool) -> bool {
    match cmd {
        DeviceCommands::Status => {
            let devices = nmcli.devices().await;
            if json {
                let records: Vec<&Record> = devices.iter().map(|d| d.record()).collect();
                print_records(&records, true);
            } else {
                for device in &devices {
                    println!("{device}");
                }
            }
            true
        }
        DeviceCommands::Show { device } => {
            let records = nmcli.device_details(device.as_deref()).await;
            let records: Vec<&Record> = records.iter().collect();
            print_records(&records, json);
            true
        }
        DeviceCommands::Connect { device, connection } => {
            nmcli.connect_device(device, connection.as_deref()).await
        }
        DeviceCommands::Disconnect { device } => nmcli.disconnect_device(device).await,
    }
}

async fn handle_wifi(cmd: &WifiCommands, nmcli: &Nmcli, json: bool) -> bool {
    match cmd {
        WifiCommands::List { ifname } => {
            let networks = nmcli.wifi_networks(ifname.as_deref()).await;
            if json {
                let records: Vec<&Record> = networks.iter().map(|n| n.record()).collect();
                print_records(&records, true);
            } else {
                for network in &networks {
                    println!("{network}");
                }
            }
            true
        }
        WifiCommands::Connect { ssid, password, ifname } => {
            nmcli.connect_wifi(ssid, password.as_deref(), ifname.as_deref()).await
        }
        WifiCommands::Hotspot { ssid, password, ifname } => {
            nmcli.create_hotspot(ssid, password.as_deref(), ifname.as_deref()).await
        }
    }
}
