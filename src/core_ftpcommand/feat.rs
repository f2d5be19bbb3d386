use crate::helpers::{send_response, ControlWriter};

/// Advertises resume (REST STREAM) and UTF-8 support.
pub async fn handle_feat_command(writer: ControlWriter) -> Result<(), std::io::Error> {
    send_response(&writer, b"211-extensions\r\n").await?;
    send_response(&writer, b" REST STREAM\r\n").await?;
    send_response(&writer, b" UTF8\r\n").await?;
    send_response(&writer, b"211 end\r\n").await
}
