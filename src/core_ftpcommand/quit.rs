use log::info;

use crate::helpers::{send_response, ControlWriter};

/// Handles the QUIT FTP command.
///
/// Only the farewell is sent here; the client closes the control connection
/// afterwards and the session loop ends on the resulting zero-byte read.
pub async fn handle_quit_command(writer: ControlWriter) -> Result<(), std::io::Error> {
    info!("Received QUIT command.");
    send_response(&writer, b"221 Goodbye senpai :'(\r\n").await
}
