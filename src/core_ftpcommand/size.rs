use std::sync::Arc;
use tokio::sync::Mutex;

use crate::constants::EOL;
use crate::core_ftpcommand::utils::{build_virtual_path, to_native_path};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerContext;
use crate::session::Session;

/// Handles the SIZE FTP command, reporting a file's length in bytes.
pub async fn handle_size_command(
    writer: ControlWriter,
    ctx: Arc<ServerContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let session = session.lock().await;
    let virtual_path = build_virtual_path(&session.cur_path, arg.trim());
    drop(session);

    let native = match to_native_path(&ctx.config.base_dir, &virtual_path) {
        Some(native) => native,
        None => {
            return send_response(&writer, b"550 The file doesn't exist.\r\n").await;
        }
    };

    match tokio::fs::metadata(&native).await {
        Ok(meta) => {
            let reply = format!("213 {}{}", meta.len(), EOL);
            send_response(&writer, reply.as_bytes()).await
        }
        Err(_) => send_response(&writer, b"550 The file doesn't exist.\r\n").await,
    }
}
