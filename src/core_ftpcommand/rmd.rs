use std::io::ErrorKind;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core_ftpcommand::utils::{build_virtual_path, to_native_path};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerContext;
use crate::session::Session;

/// Handles the RMD (Remove Directory) FTP command.
///
/// A directory that still has entries gets its own distinct refusal so
/// clients can tell "not empty" apart from "not removable at all".
pub async fn handle_rmd_command(
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
            return send_response(&writer, b"550 Could not delete the directory.\r\n").await;
        }
    };

    ctx.logger.debug(&format!("Deleting: {}", native.display()));

    match tokio::fs::remove_dir(&native).await {
        Ok(()) => send_response(&writer, b"226 Directory deleted.\r\n").await,
        Err(e) if e.kind() == ErrorKind::DirectoryNotEmpty => {
            send_response(&writer, b"550 Directory is not empty.\r\n").await
        }
        Err(_) => send_response(&writer, b"550 Could not delete the directory.\r\n").await,
    }
}
