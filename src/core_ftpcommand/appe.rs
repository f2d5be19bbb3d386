use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core_ftpcommand::stor::receive_file;
use crate::core_ftpcommand::utils::{build_virtual_path, to_native_path};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerContext;
use crate::session::Session;

/// APPE is STOR with the resume marker forced to the append sentinel, so
/// the upload can never truncate whatever REST state came before it.
pub async fn handle_appe_command(
    writer: ControlWriter,
    ctx: Arc<ServerContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;
    session.restore_point = -1;

    let virtual_path = build_virtual_path(&session.cur_path, arg.trim());
    let native = match to_native_path(&ctx.config.base_dir, &virtual_path) {
        Some(native) => native,
        None => {
            return send_response(&writer, b"550 File not found.\r\n").await;
        }
    };

    receive_file(&writer, &ctx, &mut session, native).await
}
