use std::io;
use thiserror::Error;

/// Errors surfaced by the server lifecycle calls.
///
/// Per-session failures never show up here; they are handled inside the
/// session task and reported to the client over the control channel.
#[derive(Debug, Error)]
pub enum FtpError {
    #[error("server is already initialized")]
    AlreadyInitialized,

    #[error("failed to bind control listener on port {port}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}
