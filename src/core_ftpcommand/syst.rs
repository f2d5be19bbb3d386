use crate::helpers::{send_response, ControlWriter};

/// Handles the SYST (System) FTP command.
///
/// # Arguments
///
/// * `writer` - A shared, locked write half for responses to the client.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_syst_command(writer: ControlWriter) -> Result<(), std::io::Error> {
    send_response(&writer, b"215 UNIX Type: L8\r\n").await
}
