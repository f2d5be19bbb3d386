use log::debug;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core_ftpcommand::utils::{dir_up, path_is_at_root, to_native_path};
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerContext;
use crate::session::Session;

/// Handles the CWD (Change Working Directory) FTP command.
///
/// Accepts `/`, `..`, absolute virtual paths and paths relative to the
/// working directory. Any other target must open as a native directory
/// before the working path is updated; validation failure leaves the
/// session's path untouched.
///
/// # Arguments
///
/// * `writer` - A shared, locked write half for responses to the client.
/// * `ctx` - The shared server context.
/// * `session` - The shared session state.
/// * `arg` - The target directory.
///
/// # Returns
///
/// Result<(), std::io::Error> indicating the success or failure of the operation.
pub async fn handle_cwd_command(
    writer: ControlWriter,
    ctx: Arc<ServerContext>,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let arg = arg.trim();
    if arg.is_empty() {
        return send_response(&writer, b"500 Syntax error, command unrecognized.\r\n").await;
    }

    let mut session = session.lock().await;

    if arg == "/" {
        session.cur_path = String::from("/");
    } else if arg == ".." {
        dir_up(&mut session.cur_path);
    } else {
        let mut tmp_path = if arg.starts_with('/') {
            arg.to_string()
        } else if path_is_at_root(&session.cur_path) {
            // At a device root the separator is already there
            format!("{}{}", session.cur_path, arg)
        } else {
            format!("{}/{}", session.cur_path, arg)
        };
        // A bare /foo: becomes the device root /foo:/
        if tmp_path.rfind('/') == Some(0) && !tmp_path.ends_with('/') {
            tmp_path.push('/');
        }

        if tmp_path != "/" {
            let native = match to_native_path(&ctx.config.base_dir, &tmp_path) {
                Some(native) => native,
                None => {
                    return send_response(&writer, b"550 Invalid directory.\r\n").await;
                }
            };
            match tokio::fs::read_dir(&native).await {
                Ok(dir) => {
                    ctx.cleanup.submit(move || drop(dir)).await;
                }
                Err(e) => {
                    debug!("CWD validation failed for {:?}: {}", native, e);
                    return send_response(&writer, b"550 Invalid directory.\r\n").await;
                }
            }
        }
        session.cur_path = tmp_path;
    }

    send_response(&writer, b"250 Requested file action okay, completed.\r\n").await
}
