pub mod cleanup;
pub mod config;
pub mod constants;
pub mod core_ftpcommand;
pub mod core_log;
pub mod core_network;
pub mod devices;
pub mod error;
pub mod helpers;
pub mod server;
pub mod session;

pub use config::{Config, ServerConfig};
pub use core_ftpcommand::ftpcommand::FtpCommand;
pub use core_ftpcommand::handlers::CommandHandler;
pub use core_log::LogSink;
pub use error::FtpError;
pub use helpers::{send_response, ControlWriter};
pub use server::FtpServer;
pub use session::Session;
