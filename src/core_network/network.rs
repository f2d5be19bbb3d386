use log::{debug, error};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex as StdMutex};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::handlers::initialize_command_handlers;
use crate::helpers::{send_response, ControlWriter};
use crate::server::ServerContext;
use crate::session::Session;

/// Mutex-guarded list of live sessions, keyed by client ordinal.
///
/// Sessions insert themselves at accept time and remove themselves on the
/// way out; shutdown walks the list and fires every abort token.
#[derive(Default)]
pub struct ClientRegistry {
    clients: StdMutex<HashMap<u64, CancellationToken>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, num: u64, abort: CancellationToken) {
        self.clients.lock().unwrap().insert(num, abort);
    }

    pub fn remove(&self, num: u64) -> bool {
        self.clients.lock().unwrap().remove(&num).is_some()
    }

    pub fn len(&self) -> usize {
        self.clients.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.lock().unwrap().is_empty()
    }

    /// Fires the abort token of every registered session.
    pub fn abort_all(&self) {
        for abort in self.clients.lock().unwrap().values() {
            abort.cancel();
        }
    }
}

/// Accept loop. Runs until the shutdown token fires or the listener dies,
/// then waits for every session task it spawned to finish.
pub async fn start_server(
    listener: TcpListener,
    ctx: Arc<ServerContext>,
    registry: Arc<ClientRegistry>,
    shutdown: CancellationToken,
) {
    ctx.logger.debug("Server task started!");

    let mut sessions = JoinSet::new();
    let mut next_client_num: u64 = 0;

    loop {
        // Reap finished cleanup slots opportunistically, like finished
        // sessions below.
        ctx.cleanup.poll();
        while sessions.try_join_next().is_some() {}

        tokio::select! {
            biased;
            _ = shutdown.cancelled() => break,
            accepted = listener.accept() => match accepted {
                Ok((socket, peer_addr)) => {
                    let num = next_client_num;
                    next_client_num += 1;

                    debug!("New connection from {}", peer_addr);
                    ctx.logger.info(&format!(
                        "Client {} connected, IP: {} port: {}",
                        num,
                        peer_addr.ip(),
                        peer_addr.port()
                    ));

                    // Child of the shutdown token, so sessions accepted in
                    // the same instant shutdown fires still get aborted.
                    let abort = shutdown.child_token();
                    registry.insert(num, abort.clone());
                    sessions.spawn(handle_connection(
                        socket,
                        peer_addr,
                        num,
                        Arc::clone(&ctx),
                        Arc::clone(&registry),
                        abort,
                    ));
                }
                Err(e) => {
                    error!("accept failed: {}", e);
                    break;
                }
            },
        }
    }

    while sessions.join_next().await.is_some() {}

    ctx.logger.debug("Server task exiting!");
}

/// One control connection, from greeting to teardown.
async fn handle_connection(
    socket: TcpStream,
    peer_addr: SocketAddr,
    num: u64,
    ctx: Arc<ServerContext>,
    registry: Arc<ClientRegistry>,
    abort: CancellationToken,
) {
    ctx.logger.debug(&format!("Client task {} started!", num));

    let local_addr = match socket.local_addr() {
        Ok(addr) => addr,
        Err(e) => {
            error!("client {}: local_addr failed: {}", num, e);
            registry.remove(num);
            return;
        }
    };

    let (read_half, write_half) = socket.into_split();
    let writer: ControlWriter = Arc::new(Mutex::new(write_half));
    let session = Arc::new(Mutex::new(Session::new(
        num,
        peer_addr,
        local_addr,
        abort.clone(),
    )));

    if send_response(&writer, b"220 FTPVita Server ready.\r\n")
        .await
        .is_err()
    {
        registry.remove(num);
        return;
    }

    let handlers = initialize_command_handlers();
    let mut reader = BufReader::new(read_half);
    let mut line = String::new();

    loop {
        line.clear();
        let n = tokio::select! {
            biased;
            _ = abort.cancelled() => {
                ctx.logger.info(&format!("Client {} socket aborted.", num));
                break;
            }
            res = reader.read_line(&mut line) => match res {
                Ok(0) => {
                    ctx.logger
                        .info(&format!("Connection closed by the client {}.", num));
                    break;
                }
                Ok(n) => n,
                Err(e) => {
                    ctx.logger
                        .info(&format!("Client {} socket error: {}", num, e));
                    break;
                }
            },
        };

        ctx.logger.debug(&format!(
            "Received {} bytes from client number {}",
            n, num
        ));

        let (verb, args) = split_command(line.trim_end_matches(['\r', '\n']));
        if verb.is_empty() {
            continue;
        }

        let outcome = if let Some(handler) =
            FtpCommand::from_str(verb).and_then(|cmd| handlers.get(&cmd))
        {
            handler(
                Arc::clone(&writer),
                Arc::clone(&ctx),
                Arc::clone(&session),
                args.to_string(),
            )
            .await
        } else if let Some(handler) = ctx.custom_commands.get(verb) {
            handler(
                Arc::clone(&writer),
                Arc::clone(&ctx),
                Arc::clone(&session),
                args.to_string(),
            )
            .await
        } else {
            send_response(&writer, b"502 Sorry, command not implemented. :(\r\n").await
        };

        // An aborted transfer surfaces here as Interrupted; the next loop
        // iteration sees the fired token and leaves cleanly.
        if let Err(e) = outcome {
            error!("client {}: {} failed: {}", num, verb, e);
        }
    }

    session.lock().await.close_data_connection();
    registry.remove(num);

    ctx.logger.debug(&format!("Client task {} exiting!", num));
}

/// Splits a command line into its verb and the argument remainder after the
/// first space.
fn split_command(line: &str) -> (&str, &str) {
    match line.split_once(' ') {
        Some((verb, args)) => (verb, args),
        None => (line, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_command_separates_verb_and_args() {
        assert_eq!(split_command("USER anonymous"), ("USER", "anonymous"));
        assert_eq!(split_command("LIST"), ("LIST", ""));
        assert_eq!(split_command(""), ("", ""));
    }

    #[test]
    fn split_command_keeps_argument_spaces() {
        assert_eq!(
            split_command("STOR my file name.txt"),
            ("STOR", "my file name.txt")
        );
    }

    #[test]
    fn registry_tracks_and_aborts_sessions() {
        let registry = ClientRegistry::new();
        let one = CancellationToken::new();
        let two = CancellationToken::new();

        registry.insert(0, one.clone());
        registry.insert(1, two.clone());
        assert_eq!(registry.len(), 2);

        assert!(registry.remove(0));
        assert!(!registry.remove(0));
        assert_eq!(registry.len(), 1);

        registry.abort_all();
        assert!(!one.is_cancelled());
        assert!(two.is_cancelled());
    }
}
