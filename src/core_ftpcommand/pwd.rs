// src/core_ftpcommand/pwd.rs
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::constants::EOL;
use crate::helpers::{send_response, ControlWriter};
use crate::session::Session;

pub async fn handle_pwd_command(
    writer: ControlWriter,
    session: Arc<Mutex<Session>>,
) -> Result<(), std::io::Error> {
    let cur_path = session.lock().await.cur_path.clone();
    let response = format!("257 \"{}\" is the current directory.{}", cur_path, EOL);
    send_response(&writer, response.as_bytes()).await
}
