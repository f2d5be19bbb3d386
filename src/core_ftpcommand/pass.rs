use crate::helpers::{send_response, ControlWriter};

/// Any password is accepted.
pub async fn handle_pass_command(writer: ControlWriter) -> Result<(), std::io::Error> {
    send_response(&writer, b"230 User logged in!\r\n").await
}
