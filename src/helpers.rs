use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::Mutex;

/// Shared write half of a session's control socket.
pub type ControlWriter = Arc<Mutex<OwnedWriteHalf>>;

/// Sends a reply to the client over the control connection.
///
/// Custom command handlers use this for their own replies; the message must
/// carry its own terminating `\r\n`.
pub async fn send_response(writer: &ControlWriter, message: &[u8]) -> Result<(), std::io::Error> {
    let mut writer = writer.lock().await;
    writer.write_all(message).await?;
    writer.flush().await?;
    Ok(())
}
