use std::sync::Arc;
use tokio::sync::Mutex;

use crate::core_ftpcommand::utils::dir_up;
use crate::helpers::{send_response, ControlWriter};
use crate::session::Session;

/// Moves the working path one level up; never fails.
pub async fn handle_cdup_command(
    writer: ControlWriter,
    session: Arc<Mutex<Session>>,
) -> Result<(), std::io::Error> {
    {
        let mut session = session.lock().await;
        dir_up(&mut session.cur_path);
    }
    send_response(&writer, b"200 Command okay.\r\n").await
}
