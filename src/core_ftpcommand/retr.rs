use log::{debug, warn};
use std::io::SeekFrom;
use std::path::PathBuf;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncSeekExt};
use tokio::sync::Mutex;

use crate::core_ftpcommand::utils::{build_virtual_path, to_native_path};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerContext;
use crate::session::Session;

/// Handles the RETR FTP command (file download).
///
/// The stream starts at the session's resume offset and the offset resets
/// to zero afterwards, whether or not the transfer ran to completion.
///
/// # Arguments
///
/// * `writer` - A shared, locked write half for responses to the client.
/// * `ctx` - The shared server context.
/// * `session` - The shared session state.
/// * `arg` - The file path to send.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_retr_command(
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

    send_file(&writer, &ctx, &mut session, native).await
}

async fn send_file(
    writer: &ControlWriter,
    ctx: &Arc<ServerContext>,
    session: &mut Session,
    path: PathBuf,
) -> Result<(), std::io::Error> {
    ctx.logger.debug(&format!("Opening: {}", path.display()));

    let size = match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => meta.len(),
        _ => {
            return send_response(writer, b"550 File not found.\r\n").await;
        }
    };
    let mut file = match tokio::fs::File::open(&path).await {
        Ok(file) => file,
        Err(_) => {
            return send_response(writer, b"550 File not found.\r\n").await;
        }
    };

    let offset = session.restore_point.max(0) as u64;
    if offset > 0 {
        if let Err(e) = file.seek(SeekFrom::Start(offset)).await {
            debug!("seek to {} failed: {}", offset, e);
        }
    }
    let mut remaining = size.saturating_sub(offset);

    let buf_size = ctx.file_buf_size.load(Ordering::Relaxed).max(1);
    let mut buffer: Vec<u8> = Vec::new();
    if buffer.try_reserve_exact(buf_size).is_err() {
        return send_response(writer, b"550 Could not allocate memory.\r\n").await;
    }
    buffer.resize(buf_size, 0);

    if let Err(e) = session.open_data_connection().await {
        warn!("client {} RETR data connection failed: {}", session.num, e);
        session.close_data_connection();
        return send_response(writer, b"425 Can't open data connection.\r\n").await;
    }
    send_response(writer, b"150 Opening Image mode data transfer.\r\n").await?;

    while remaining > 0 {
        let want = remaining.min(buf_size as u64) as usize;
        let n = match file.read(&mut buffer[..want]).await {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) => {
                warn!("client {} read failed mid-transfer: {}", session.num, e);
                break;
            }
        };
        if let Err(e) = session.send_data_msg(&buffer[..n]).await {
            warn!("client {} data send failed: {}", session.num, e);
            break;
        }
        remaining -= n as u64;
    }

    ctx.cleanup.submit(move || drop(file)).await;
    session.restore_point = 0;
    send_response(writer, b"226 Transfer completed.\r\n").await?;
    session.close_data_connection();
    Ok(())
}
