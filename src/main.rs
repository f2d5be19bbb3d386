use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use log::{info, warn};
use std::io::Write;
use std::path::Path;

use ftpvita::{Config, FtpServer};

/// Devices exposed when none are named on the command line. Only the ones
/// whose backing directory exists under the base directory are registered.
const DEFAULT_DEVICES: &[&str] = &[
    "ux0:", "ur0:", "uma0:", "imc0:", "gro0:", "grw0:", "os0:", "pd0:", "sa0:", "tm0:", "ud0:",
    "vd0:", "vs0:", "app0:", "savedata0:",
];

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "ftpvitad", about = "A multi-device FTP server.")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "")]
    config: String,

    /// Listen port, overriding the configuration file
    #[arg(short, long)]
    port: Option<u16>,

    /// Base directory the virtual devices live under
    #[arg(short, long)]
    base_dir: Option<String>,

    /// Device to expose (repeatable); defaults to the standard set
    #[arg(short, long = "device")]
    devices: Vec<String>,

    /// Enable verbose mode
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize the logger with a custom format
    let default_level = if args.verbose { "debug" } else { "info" };
    Builder::from_env(Env::default().default_filter_or(default_level))
        .format(|buf, record| {
            let timestamp = buf.timestamp();
            writeln!(
                buf,
                "[{}] [{}] {}",
                timestamp,
                record.level(),
                record.args()
            )
        })
        .init();

    let mut config = if args.config.is_empty() {
        Config::default()
    } else {
        Config::load_from_file(&args.config)
            .with_context(|| format!("cannot load configuration from {}", args.config))?
    };
    if let Some(port) = args.port {
        config.server.listen_port = port;
    }
    if let Some(base_dir) = args.base_dir {
        config.server.base_dir = base_dir;
    }
    let base_dir = config.server.base_dir.clone();

    let server = FtpServer::new(config);

    if args.devices.is_empty() {
        for name in DEFAULT_DEVICES {
            if Path::new(&base_dir).join(name).is_dir() && !server.add_device(name) {
                warn!("device {} not registered", name);
            }
        }
    } else {
        for name in &args.devices {
            if !server.add_device(name) {
                warn!("device {} not registered", name);
            }
        }
    }

    let addr = server
        .init()
        .await
        .context("failed to start the FTP server")?;
    info!("FTPVita ready at {}", addr);

    tokio::signal::ctrl_c()
        .await
        .context("cannot listen for shutdown signal")?;
    info!("shutting down");
    server.shutdown().await;

    Ok(())
}
