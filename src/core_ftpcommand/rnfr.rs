use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core_ftpcommand::utils::{build_virtual_path, to_native_path};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerContext;
use crate::session::Session;

/// Handles the RNFR (Rename From) FTP command.
///
/// Stores the source path in the session so a following RNTO can finish
/// the rename. Nothing is touched on disk yet.
pub async fn handle_rnfr_command(
    writer: ControlWriter,
    ctx: Arc<ServerContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    let virtual_path = build_virtual_path(&session.cur_path, arg.trim());

    let native = match to_native_path(&ctx.config.base_dir, &virtual_path) {
        Some(native) => native,
        None => {
            return send_response(&writer, b"550 The file doesn't exist.\r\n").await;
        }
    };

    if tokio::fs::metadata(&native).await.is_err() {
        return send_response(&writer, b"550 The file doesn't exist.\r\n").await;
    }

    session.rename_path = Some(native);
    send_response(&writer, b"350 I need the destination name b0ss.\r\n").await
}
