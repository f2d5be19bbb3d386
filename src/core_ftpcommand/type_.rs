use crate::helpers::{send_response, ControlWriter};

/// Accepts ASCII and Image type selectors without changing behavior;
/// transfers are always binary.
pub async fn handle_type_command(writer: ControlWriter, arg: String) -> Result<(), std::io::Error> {
    match arg.trim().chars().next() {
        Some('A') | Some('I') => send_response(&writer, b"200 Okay\r\n").await,
        _ => send_response(&writer, b"504 Error: bad parameters?\r\n").await,
    }
}
