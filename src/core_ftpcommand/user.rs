use crate::helpers::{send_response, ControlWriter};

/// Any username is accepted; there is no account database.
pub async fn handle_user_command(writer: ControlWriter) -> Result<(), std::io::Error> {
    send_response(&writer, b"331 Username OK, need password b0ss.\r\n").await
}
