use log::debug;
use std::io;
use std::net::SocketAddrV4;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

/// Negotiation state of a session's data channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DataConnType {
    None,
    Active,
    Passive,
}

/// Per-session data connection, negotiated by PORT (active) or PASV
/// (passive) and established lazily when a transfer actually starts.
///
/// At most one connection is open at a time; `close` drops every socket and
/// resets the mode to `None`.
#[derive(Debug)]
pub struct DataChannel {
    con_type: DataConnType,
    peer: Option<SocketAddrV4>,
    listener: Option<TcpListener>,
    stream: Option<TcpStream>,
}

impl DataChannel {
    pub fn new() -> Self {
        Self {
            con_type: DataConnType::None,
            peer: None,
            listener: None,
            stream: None,
        }
    }

    pub fn con_type(&self) -> DataConnType {
        self.con_type
    }

    /// Arms active mode: the server will connect out to `peer` at transfer
    /// time.
    pub fn set_active(&mut self, peer: SocketAddrV4) {
        self.close();
        self.con_type = DataConnType::Active;
        self.peer = Some(peer);
    }

    /// Arms passive mode with an already-bound listener; the pending
    /// connection is accepted at transfer time.
    pub fn set_passive(&mut self, listener: TcpListener) {
        self.close();
        self.con_type = DataConnType::Passive;
        self.listener = Some(listener);
    }

    /// Establishes the negotiated connection. Called immediately before a
    /// transfer.
    pub async fn open(&mut self) -> io::Result<()> {
        match self.con_type {
            DataConnType::Active => {
                let peer = self
                    .peer
                    .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))?;
                let stream = TcpStream::connect(peer).await?;
                debug!("data connection established to {}", peer);
                self.stream = Some(stream);
            }
            DataConnType::Passive => {
                let listener = self
                    .listener
                    .as_ref()
                    .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))?;
                let (stream, peer) = listener.accept().await?;
                debug!("data connection accepted from {}", peer);
                self.stream = Some(stream);
            }
            DataConnType::None => {
                return Err(io::Error::from(io::ErrorKind::NotConnected));
            }
        }
        Ok(())
    }

    pub async fn send(&mut self, buf: &[u8]) -> io::Result<()> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))?;
        stream.write_all(buf).await?;
        Ok(())
    }

    pub async fn recv(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let stream = self
            .stream
            .as_mut()
            .ok_or_else(|| io::Error::from(io::ErrorKind::NotConnected))?;
        stream.read(buf).await
    }

    /// Flushes and drops the data socket(s); mode returns to `None`.
    pub fn close(&mut self) {
        self.stream = None;
        self.listener = None;
        self.peer = None;
        self.con_type = DataConnType::None;
    }
}

impl Default for DataChannel {
    fn default() -> Self {
        Self::new()
    }
}
