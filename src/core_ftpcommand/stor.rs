use log::{debug, warn};
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::core_ftpcommand::utils::{build_virtual_path, to_native_path};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerContext;
use crate::session::Session;

/// Handles the STOR FTP command (file upload).
///
/// A zero resume offset truncates the destination; any nonzero offset
/// (including the APPE sentinel) appends instead. A clean zero-byte read
/// from the peer completes the upload; every other termination deletes the
/// destination and reports an aborted transfer.
///
/// # Arguments
///
/// * `writer` - A shared, locked write half for responses to the client.
/// * `ctx` - The shared server context.
/// * `session` - The shared session state.
/// * `arg` - The destination file path.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_stor_command(
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
            return send_response(&writer, b"550 File not found.\r\n").await;
        }
    };

    receive_file(&writer, &ctx, &mut session, native).await
}

/// Upload loop shared by STOR and APPE.
pub(crate) async fn receive_file(
    writer: &ControlWriter,
    ctx: &Arc<ServerContext>,
    session: &mut Session,
    path: PathBuf,
) -> Result<(), std::io::Error> {
    ctx.logger.debug(&format!("Opening: {}", path.display()));

    // Resuming a broken transfer appends the missing part, otherwise the
    // destination is overwritten
    let append = session.restore_point != 0;
    let mut options = tokio::fs::OpenOptions::new();
    options.create(true).read(true).write(true);
    if append {
        options.append(true);
    } else {
        options.truncate(true);
    }

    let mut file = match options.open(&path).await {
        Ok(file) => file,
        Err(_) => {
            return send_response(writer, b"550 File not found.\r\n").await;
        }
    };

    let buf_size = ctx.file_buf_size.load(Ordering::Relaxed).max(1);
    let mut buffer: Vec<u8> = Vec::new();
    if buffer.try_reserve_exact(buf_size).is_err() {
        return send_response(writer, b"550 Could not allocate memory.\r\n").await;
    }
    buffer.resize(buf_size, 0);

    if let Err(e) = session.open_data_connection().await {
        warn!("client {} STOR data connection failed: {}", session.num, e);
        session.close_data_connection();
        return send_response(writer, b"425 Can't open data connection.\r\n").await;
    }
    send_response(writer, b"150 Opening Image mode data transfer.\r\n").await?;

    let mut clean = false;
    loop {
        match session.recv_data_msg(&mut buffer).await {
            Ok(0) => {
                clean = true;
                break;
            }
            Ok(n) => {
                if let Err(e) = file.write_all(&buffer[..n]).await {
                    warn!("client {} write failed mid-upload: {}", session.num, e);
                    break;
                }
            }
            Err(e) => {
                debug!("client {} data receive ended: {}", session.num, e);
                break;
            }
        }
    }
    if clean && file.flush().await.is_err() {
        clean = false;
    }

    ctx.cleanup.submit(move || drop(file)).await;
    session.restore_point = 0;
    if clean {
        send_response(writer, b"226 Transfer completed.\r\n").await?;
    } else {
        let stale = path.clone();
        ctx.cleanup
            .submit(move || {
                let _ = std::fs::remove_file(&stale);
            })
            .await;
        send_response(writer, b"426 Connection closed; transfer aborted.\r\n").await?;
    }
    session.close_data_connection();
    Ok(())
}
