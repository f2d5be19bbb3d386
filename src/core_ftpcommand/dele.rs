use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core_ftpcommand::utils::{build_virtual_path, to_native_path};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerContext;
use crate::session::Session;

/// Handles the DELE (Delete File) FTP command.
pub async fn handle_dele_command(
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
            return send_response(&writer, b"550 Could not delete the file.\r\n").await;
        }
    };

    ctx.logger.debug(&format!("Deleting: {}", native.display()));

    if tokio::fs::remove_file(&native).await.is_ok() {
        send_response(&writer, b"226 File deleted.\r\n").await
    } else {
        send_response(&writer, b"550 Could not delete the file.\r\n").await
    }
}
