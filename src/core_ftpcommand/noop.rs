use crate::helpers::{send_response, ControlWriter};

pub async fn handle_noop_command(writer: ControlWriter) -> Result<(), std::io::Error> {
    send_response(&writer, b"200 No operation ;)\r\n").await
}
