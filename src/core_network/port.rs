use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::helpers::{send_response, ControlWriter};
use crate::session::Session;

/// Handles the PORT (Active Mode) FTP command.
///
/// Only records the peer address; the outbound connect is deferred until a
/// transfer command opens the data channel.
pub async fn handle_port_command(
    writer: ControlWriter,
    session: Arc<Mutex<Session>>,
    arg: String,
) -> Result<(), std::io::Error> {
    let peer = match parse_port_argument(&arg) {
        Some(peer) => peer,
        None => {
            return send_response(&writer, b"501 Syntax error in parameters or arguments.\r\n")
                .await;
        }
    };

    let mut session = session.lock().await;
    session.data.set_active(peer);
    send_response(&writer, b"200 PORT command successful!\r\n").await
}

/// Parses `h1,h2,h3,h4,p1,p2` into a socket address, with the port encoded
/// as `p1 * 256 + p2`.
fn parse_port_argument(arg: &str) -> Option<SocketAddrV4> {
    let parts: Vec<&str> = arg.trim().split(',').collect();
    if parts.len() != 6 {
        return None;
    }

    let mut fields = [0u8; 6];
    for (field, part) in fields.iter_mut().zip(&parts) {
        *field = part.trim().parse::<u8>().ok()?;
    }

    let ip = Ipv4Addr::new(fields[0], fields[1], fields[2], fields[3]);
    let port = u16::from(fields[4]) << 8 | u16::from(fields[5]);
    Some(SocketAddrV4::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_argument() {
        let peer = parse_port_argument("192,168,1,2,4,1").unwrap();
        assert_eq!(peer.ip(), &Ipv4Addr::new(192, 168, 1, 2));
        assert_eq!(peer.port(), 4 * 256 + 1);
    }

    #[test]
    fn tolerates_spaces_between_fields() {
        let peer = parse_port_argument("127, 0, 0, 1, 0, 21").unwrap();
        assert_eq!(peer.ip(), &Ipv4Addr::LOCALHOST);
        assert_eq!(peer.port(), 21);
    }

    #[test]
    fn rejects_malformed_arguments() {
        assert!(parse_port_argument("").is_none());
        assert!(parse_port_argument("1,2,3,4,5").is_none());
        assert!(parse_port_argument("1,2,3,4,5,6,7").is_none());
        assert!(parse_port_argument("256,0,0,1,0,21").is_none());
        assert!(parse_port_argument("a,b,c,d,e,f").is_none());
    }
}
