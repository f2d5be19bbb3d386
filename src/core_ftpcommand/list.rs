use log::{debug, warn};
use std::sync::Arc;
use std::time::SystemTime;
use tokio::sync::Mutex;

use crate::core_ftpcommand::utils::{build_virtual_path, gen_list_line, to_native_path};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerContext;
use crate::session::Session;

/// Handles the LIST FTP command.
///
/// An argument naming an existing path is listed; anything else falls back
/// to the working path. The synthetic root `/` is not a real directory: it
/// lists the registered devices instead, in registration order.
pub async fn handle_list_command(
    writer: ControlWriter,
    ctx: Arc<ServerContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let arg = arg.trim();
    let mut session = session.lock().await;

    let mut list_path = session.cur_path.clone();
    if !arg.is_empty() {
        let resolved = build_virtual_path(&session.cur_path, arg);
        if resolved == "/" {
            list_path = resolved;
        } else if let Some(native) = to_native_path(&ctx.config.base_dir, &resolved) {
            if tokio::fs::metadata(&native).await.is_ok() {
                list_path = resolved;
            }
        }
    }

    send_list(&writer, &ctx, &mut session, &list_path).await
}

async fn send_list(
    writer: &ControlWriter,
    ctx: &Arc<ServerContext>,
    session: &mut Session,
    path: &str,
) -> Result<(), std::io::Error> {
    let send_devices = path == "/";

    let mut dir = None;
    if !send_devices {
        let native = match to_native_path(&ctx.config.base_dir, path) {
            Some(native) => native,
            None => {
                return send_response(writer, b"550 Invalid directory.\r\n").await;
            }
        };
        match tokio::fs::read_dir(&native).await {
            Ok(rd) => dir = Some(rd),
            Err(e) => {
                debug!("LIST failed to open {:?}: {}", native, e);
                return send_response(writer, b"550 Invalid directory.\r\n").await;
            }
        }
    }

    send_response(writer, b"150 Opening ASCII mode data transfer for LIST.\r\n").await?;

    if let Err(e) = session.open_data_connection().await {
        warn!("client {} LIST data connection failed: {}", session.num, e);
        session.close_data_connection();
        return send_response(writer, b"425 Can't open data connection.\r\n").await;
    }

    if send_devices {
        for name in ctx.devices.list() {
            let native = match to_native_path(&ctx.config.base_dir, &format!("/{}", name)) {
                Some(native) => native,
                None => continue,
            };
            // Devices whose backing storage is missing are skipped
            let meta = match tokio::fs::metadata(&native).await {
                Ok(meta) => meta,
                Err(_) => continue,
            };
            let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            let line = gen_list_line(&name, true, meta.len(), mtime);
            if session.send_data_msg(line.as_bytes()).await.is_err() {
                break;
            }
        }
    } else if let Some(mut rd) = dir.take() {
        while let Ok(Some(entry)) = rd.next_entry().await {
            let name = entry.file_name().to_string_lossy().into_owned();
            let meta = match entry.metadata().await {
                Ok(meta) => meta,
                Err(_) => continue,
            };
            let mtime = meta.modified().unwrap_or(SystemTime::UNIX_EPOCH);
            let line = gen_list_line(&name, meta.is_dir(), meta.len(), mtime);
            if session.send_data_msg(line.as_bytes()).await.is_err() {
                break;
            }
        }
        ctx.cleanup.submit(move || drop(rd)).await;
    }

    ctx.logger.debug(&format!("client {} done sending LIST", session.num));

    session.close_data_connection();
    send_response(writer, b"226 Transfer complete.\r\n").await
}
