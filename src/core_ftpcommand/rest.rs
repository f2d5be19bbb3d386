use std::sync::Arc;
use tokio::sync::Mutex;

use crate::constants::EOL;
use crate::helpers::{send_response, ControlWriter};
use crate::session::Session;

/// Handles the REST (Restart) FTP command.
///
/// An argument that does not parse leaves the previous marker in place;
/// the reply always echoes whatever marker is in effect afterwards.
pub async fn handle_rest_command(
    writer: ControlWriter,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;

    if let Ok(offset) = arg.trim().parse::<i64>() {
        session.restore_point = offset;
    }

    let reply = format!("350 Resuming at {}{}", session.restore_point, EOL);
    send_response(&writer, reply.as_bytes()).await
}
