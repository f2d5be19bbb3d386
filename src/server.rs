use log::error;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::cleanup::CleanupPool;
use crate::config::{Config, ServerConfig};
use crate::constants::DEFAULT_FILE_BUF_SIZE;
use crate::core_ftpcommand::handlers::{CommandHandler, CustomCommandTable};
use crate::core_log::{LogSink, Logger};
use crate::core_network::network::{start_server, ClientRegistry};
use crate::devices::DeviceRegistry;
use crate::error::FtpError;

/// Shared server-wide state handed to every session task.
///
/// Everything here outlives init/shutdown cycles; only the listener and its
/// task are per-run.
pub struct ServerContext {
    pub config: ServerConfig,
    pub devices: DeviceRegistry,
    pub custom_commands: CustomCommandTable,
    /// Transfer buffer size in bytes, adjustable at runtime.
    pub file_buf_size: AtomicUsize,
    pub logger: Logger,
    pub cleanup: CleanupPool,
}

impl ServerContext {
    fn new(config: ServerConfig) -> Self {
        let file_buf_size = config.file_buf_size.unwrap_or(DEFAULT_FILE_BUF_SIZE);
        Self {
            devices: DeviceRegistry::with_capacity(config.max_devices),
            custom_commands: CustomCommandTable::with_capacity(config.max_custom_commands),
            file_buf_size: AtomicUsize::new(file_buf_size),
            logger: Logger::new(),
            cleanup: CleanupPool::new(config.cleanup_slots),
            config,
        }
    }
}

struct RunningServer {
    shutdown: CancellationToken,
    task: JoinHandle<()>,
}

/// Embeddable FTP server.
///
/// Construct once, then `init` to start serving and `shutdown` to stop.
/// Devices, custom verbs, log sinks and the transfer buffer size can be
/// changed at any point and survive across init/shutdown cycles.
pub struct FtpServer {
    ctx: Arc<ServerContext>,
    registry: Arc<ClientRegistry>,
    state: Mutex<Option<RunningServer>>,
}

impl FtpServer {
    pub fn new(config: Config) -> Self {
        Self {
            ctx: Arc::new(ServerContext::new(config.server)),
            registry: Arc::new(ClientRegistry::new()),
            state: Mutex::new(None),
        }
    }

    /// Binds the control listener and spawns the accept loop. Returns the
    /// bound address, which carries the actual port when the configured one
    /// is 0.
    pub async fn init(&self) -> Result<SocketAddr, FtpError> {
        let mut state = self.state.lock().await;
        if state.is_some() {
            return Err(FtpError::AlreadyInitialized);
        }

        let port = self.ctx.config.listen_port;
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map_err(|source| FtpError::Bind { port, source })?;
        let local_addr = listener.local_addr()?;

        let shutdown = CancellationToken::new();
        let task = tokio::spawn(start_server(
            listener,
            Arc::clone(&self.ctx),
            Arc::clone(&self.registry),
            shutdown.clone(),
        ));

        self.ctx
            .logger
            .info(&format!("Server listening on {}", local_addr));

        *state = Some(RunningServer { shutdown, task });
        Ok(local_addr)
    }

    /// Stops accepting, aborts every live session and waits for all of them
    /// to finish. A server that is not running is left untouched.
    pub async fn shutdown(&self) {
        let running = match self.state.lock().await.take() {
            Some(running) => running,
            None => return,
        };

        running.shutdown.cancel();
        self.registry.abort_all();

        if let Err(e) = running.task.await {
            error!("server task join failed: {}", e);
        }

        self.ctx.logger.info("Server stopped.");
    }

    pub async fn is_running(&self) -> bool {
        self.state.lock().await.is_some()
    }

    /// Exposes `name` under the synthetic root. False when the name is
    /// already present.
    pub fn add_device(&self, name: &str) -> bool {
        self.ctx.devices.add(name)
    }

    pub fn remove_device(&self, name: &str) -> bool {
        self.ctx.devices.remove(name)
    }

    /// Sets the transfer buffer size for subsequent RETR/STOR/APPE loops.
    pub fn set_file_buf_size(&self, bytes: usize) {
        self.ctx
            .file_buf_size
            .store(bytes, std::sync::atomic::Ordering::Relaxed);
    }

    pub fn set_info_log_sink(&self, sink: Option<LogSink>) {
        self.ctx.logger.set_info_sink(sink);
    }

    pub fn set_debug_log_sink(&self, sink: Option<LogSink>) {
        self.ctx.logger.set_debug_sink(sink);
    }

    /// Registers a verb dispatched after the built-in table misses. False
    /// when the verb is already taken.
    pub fn register_custom_command(&self, verb: &str, handler: CommandHandler) -> bool {
        self.ctx.custom_commands.register(verb, handler)
    }

    pub fn unregister_custom_command(&self, verb: &str) -> bool {
        self.ctx.custom_commands.unregister(verb)
    }

    /// Number of sessions currently linked into the client registry.
    pub fn client_count(&self) -> usize {
        self.registry.len()
    }
}
