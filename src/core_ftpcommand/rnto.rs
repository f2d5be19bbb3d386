use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core_ftpcommand::utils::{build_virtual_path, to_native_path};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerContext;
use crate::session::Session;

/// Handles the RNTO (Rename To) FTP command.
///
/// Consumes the source stored by RNFR; the pair must be re-armed for every
/// rename, so a second RNTO in a row fails.
pub async fn handle_rnto_command(
    writer: ControlWriter,
    ctx: Arc<ServerContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    let virtual_path = build_virtual_path(&session.cur_path, arg.trim());

    let source = match session.rename_path.take() {
        Some(source) => source,
        None => {
            return send_response(&writer, b"550 Error renaming the file.\r\n").await;
        }
    };

    let destination = match to_native_path(&ctx.config.base_dir, &virtual_path) {
        Some(destination) => destination,
        None => {
            return send_response(&writer, b"550 Error renaming the file.\r\n").await;
        }
    };
    drop(session);

    ctx.logger.debug(&format!(
        "Renaming: {} to {}",
        source.display(),
        destination.display()
    ));

    if tokio::fs::rename(&source, &destination).await.is_err() {
        return send_response(&writer, b"550 Error renaming the file.\r\n").await;
    }

    send_response(&writer, b"226 Rename completed.\r\n").await
}
