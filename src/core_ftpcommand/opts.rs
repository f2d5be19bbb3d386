use crate::helpers::{send_response, ControlWriter};

/// No options are negotiable.
pub async fn handle_opts_command(writer: ControlWriter) -> Result<(), std::io::Error> {
    send_response(&writer, b"501 bad OPTS\r\n").await
}
