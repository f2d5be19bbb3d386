use std::net::{IpAddr, Ipv4Addr};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use crate::constants::EOL;
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerContext;
use crate::session::Session;

/// Handles the PASV (Passive Mode) FTP command.
///
/// Binds a fresh ephemeral listener, advertises it in the 227 reply and
/// arms the session's data channel. Nobody is accepted here; the accept
/// happens when the next transfer command actually opens the channel.
pub async fn handle_pasv_command(
    writer: ControlWriter,
    ctx: Arc<ServerContext>,
    session: Arc<Mutex<Session>>,
) -> Result<(), std::io::Error> {
    let mut session = session.lock().await;

    let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, 0)).await?;
    let port = listener.local_addr()?.port();

    let ip = match ctx.config.pasv_address {
        Some(ip) => ip,
        None => match session.local_addr.ip() {
            IpAddr::V4(v4) => v4,
            IpAddr::V6(_) => Ipv4Addr::UNSPECIFIED,
        },
    };

    ctx.logger
        .debug(&format!("PASV mode port: {:#06x}", port));

    send_response(&writer, format_pasv_reply(ip, port).as_bytes()).await?;

    session.data.set_passive(listener);
    Ok(())
}

/// Formats the 227 reply: four address octets followed by the port split
/// into its high and low bytes.
fn format_pasv_reply(ip: Ipv4Addr, port: u16) -> String {
    let octets = ip.octets();
    format!(
        "227 Entering Passive Mode ({},{},{},{},{},{}){}",
        octets[0],
        octets[1],
        octets[2],
        octets[3],
        port >> 8,
        port & 0xFF,
        EOL
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reply_splits_port_into_bytes() {
        let reply = format_pasv_reply(Ipv4Addr::new(192, 168, 1, 10), 0x1234);
        assert_eq!(
            reply,
            "227 Entering Passive Mode (192,168,1,10,18,52)\r\n"
        );
    }

    #[test]
    fn reply_handles_port_byte_extremes() {
        let reply = format_pasv_reply(Ipv4Addr::LOCALHOST, 65535);
        assert_eq!(reply, "227 Entering Passive Mode (127,0,0,1,255,255)\r\n");

        let reply = format_pasv_reply(Ipv4Addr::LOCALHOST, 255);
        assert_eq!(reply, "227 Entering Passive Mode (127,0,0,1,0,255)\r\n");
    }
}
