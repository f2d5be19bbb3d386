use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;

use crate::core_network::data::{DataChannel, DataConnType};

/// Per-connection FTP session state.
///
/// Owned by the session task; command handlers receive it behind an
/// `Arc<tokio::sync::Mutex<_>>`.
#[derive(Debug)]
pub struct Session {
    /// Monotonic ordinal assigned at accept time.
    pub num: u64,
    pub peer_addr: SocketAddr,
    /// Local address of the control socket, advertised by PASV when no
    /// override is configured.
    pub local_addr: SocketAddr,
    /// Virtual working path, always `/`-rooted.
    pub cur_path: String,
    /// Native rename source staged by RNFR, consumed by RNTO.
    pub rename_path: Option<PathBuf>,
    /// Resume offset for the next transfer. APPE stores a negative sentinel
    /// meaning "append, no seek".
    pub restore_point: i64,
    pub data: DataChannel,
    cancel: CancellationToken,
}

impl Session {
    pub fn new(
        num: u64,
        peer_addr: SocketAddr,
        local_addr: SocketAddr,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            num,
            peer_addr,
            local_addr,
            cur_path: String::from("/"),
            rename_path: None,
            restore_point: 0,
            data: DataChannel::new(),
            cancel,
        }
    }

    pub fn data_con_type(&self) -> DataConnType {
        self.data.con_type()
    }

    /// Establishes the negotiated data connection, giving up if the session
    /// is aborted while waiting on the peer.
    pub async fn open_data_connection(&mut self) -> io::Result<()> {
        let cancel = self.cancel.clone();
        tokio::select! {
            _ = cancel.cancelled() => Err(abort_error()),
            res = self.data.open() => res,
        }
    }

    /// Writes one chunk to the data connection.
    pub async fn send_data_msg(&mut self, buf: &[u8]) -> io::Result<()> {
        let cancel = self.cancel.clone();
        tokio::select! {
            _ = cancel.cancelled() => Err(abort_error()),
            res = self.data.send(buf) => res,
        }
    }

    /// Reads up to `buf.len()` bytes from the data connection; 0 means the
    /// peer closed it.
    pub async fn recv_data_msg(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let cancel = self.cancel.clone();
        tokio::select! {
            _ = cancel.cancelled() => Err(abort_error()),
            res = self.data.recv(buf) => res,
        }
    }

    pub fn close_data_connection(&mut self) {
        self.data.close();
    }
}

fn abort_error() -> io::Error {
    io::Error::new(io::ErrorKind::Interrupted, "session aborted")
}
