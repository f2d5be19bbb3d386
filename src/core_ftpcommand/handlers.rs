use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::helpers::ControlWriter;
use crate::server::ServerContext;
use crate::session::Session;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};
use tokio::sync::Mutex as TokioMutex;

// Specific modules for PORT and PASV commands
use crate::core_network::pasv;
use crate::core_network::port;

/// Boxed async command handler, shared by the built-in dispatch table and
/// host-registered custom verbs.
pub type CommandHandler = Box<
    dyn Fn(
            ControlWriter,
            Arc<ServerContext>,
            Arc<TokioMutex<Session>>,
            String, // Command argument string
        ) -> Pin<Box<dyn Future<Output = Result<(), std::io::Error>> + Send>>
        + Send
        + Sync,
>;

pub fn initialize_command_handlers() -> HashMap<FtpCommand, Arc<CommandHandler>> {
    let mut handlers: HashMap<FtpCommand, Arc<CommandHandler>> = HashMap::new();

    handlers.insert(
        FtpCommand::NOOP,
        Arc::new(Box::new(|writer, _ctx, _session, _arg| {
            Box::pin(crate::core_ftpcommand::noop::handle_noop_command(writer))
        })),
    );

    handlers.insert(
        FtpCommand::USER,
        Arc::new(Box::new(|writer, _ctx, _session, _arg| {
            Box::pin(crate::core_ftpcommand::user::handle_user_command(writer))
        })),
    );

    handlers.insert(
        FtpCommand::PASS,
        Arc::new(Box::new(|writer, _ctx, _session, _arg| {
            Box::pin(crate::core_ftpcommand::pass::handle_pass_command(writer))
        })),
    );

    handlers.insert(
        FtpCommand::QUIT,
        Arc::new(Box::new(|writer, _ctx, _session, _arg| {
            Box::pin(crate::core_ftpcommand::quit::handle_quit_command(writer))
        })),
    );

    handlers.insert(
        FtpCommand::SYST,
        Arc::new(Box::new(|writer, _ctx, _session, _arg| {
            Box::pin(crate::core_ftpcommand::syst::handle_syst_command(writer))
        })),
    );

    handlers.insert(
        FtpCommand::FEAT,
        Arc::new(Box::new(|writer, _ctx, _session, _arg| {
            Box::pin(crate::core_ftpcommand::feat::handle_feat_command(writer))
        })),
    );

    handlers.insert(
        FtpCommand::OPTS,
        Arc::new(Box::new(|writer, _ctx, _session, _arg| {
            Box::pin(crate::core_ftpcommand::opts::handle_opts_command(writer))
        })),
    );

    handlers.insert(
        FtpCommand::TYPE,
        Arc::new(Box::new(|writer, _ctx, _session, arg| {
            Box::pin(crate::core_ftpcommand::type_::handle_type_command(
                writer, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PWD,
        Arc::new(Box::new(|writer, _ctx, session, _arg| {
            Box::pin(crate::core_ftpcommand::pwd::handle_pwd_command(
                writer, session,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::CWD,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::cwd::handle_cwd_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::CDUP,
        Arc::new(Box::new(|writer, _ctx, session, _arg| {
            Box::pin(crate::core_ftpcommand::cdup::handle_cdup_command(
                writer, session,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::LIST,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::list::handle_list_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RETR,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::retr::handle_retr_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::STOR,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::stor::handle_stor_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::APPE,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::appe::handle_appe_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::REST,
        Arc::new(Box::new(|writer, _ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::rest::handle_rest_command(
                writer, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::SIZE,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::size::handle_size_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::DELE,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::dele::handle_dele_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RMD,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::rmd::handle_rmd_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::MKD,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::mkd::handle_mkd_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RNFR,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::rnfr::handle_rnfr_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::RNTO,
        Arc::new(Box::new(|writer, ctx, session, arg| {
            Box::pin(crate::core_ftpcommand::rnto::handle_rnto_command(
                writer, ctx, session, arg,
            ))
        })),
    );

    handlers.insert(
        FtpCommand::PASV,
        Arc::new(Box::new(|writer, ctx, session, _arg| {
            Box::pin(pasv::handle_pasv_command(writer, ctx, session))
        })),
    );

    handlers.insert(
        FtpCommand::PORT,
        Arc::new(Box::new(|writer, _ctx, session, arg| {
            Box::pin(port::handle_port_command(writer, session, arg))
        })),
    );

    handlers
}

/// Host-registered verbs, consulted when a line matches no built-in command.
///
/// Names are matched exactly as received, so a lowercase registration will
/// never shadow a built-in verb. The construction capacity only pre-sizes
/// the map; registration never fails for lack of room.
pub struct CustomCommandTable {
    entries: RwLock<HashMap<String, Arc<CommandHandler>>>,
}

impl CustomCommandTable {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: RwLock::new(HashMap::with_capacity(capacity)),
        }
    }

    /// Adds a verb. Refuses duplicates.
    pub fn register(&self, verb: &str, handler: CommandHandler) -> bool {
        let mut entries = self.entries.write().unwrap();
        if entries.contains_key(verb) {
            return false;
        }
        entries.insert(verb.to_string(), Arc::new(handler));
        true
    }

    /// Removes a verb. Returns false when it was never registered.
    pub fn unregister(&self, verb: &str) -> bool {
        self.entries.write().unwrap().remove(verb).is_some()
    }

    pub fn get(&self, verb: &str) -> Option<Arc<CommandHandler>> {
        self.entries.read().unwrap().get(verb).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_handler() -> CommandHandler {
        Box::new(|_writer, _ctx, _session, _arg| Box::pin(async { Ok(()) }))
    }

    #[test]
    fn every_builtin_verb_has_a_handler() {
        let handlers = initialize_command_handlers();
        for verb in [
            "NOOP", "USER", "PASS", "QUIT", "SYST", "PASV", "PORT", "LIST", "PWD", "CWD", "TYPE",
            "CDUP", "RETR", "STOR", "APPE", "DELE", "RMD", "MKD", "RNFR", "RNTO", "SIZE", "REST",
            "FEAT", "OPTS",
        ] {
            let cmd = FtpCommand::from_str(verb).unwrap();
            assert!(handlers.contains_key(&cmd), "no handler for {}", verb);
        }
    }

    #[test]
    fn custom_table_rejects_duplicates_but_grows_freely() {
        let table = CustomCommandTable::with_capacity(2);
        assert!(table.register("XKCD", stub_handler()));
        assert!(!table.register("XKCD", stub_handler()));
        assert!(table.register("BLK5", stub_handler()));
        // Past the pre-allocation hint
        assert!(table.register("OVER", stub_handler()));
        assert_eq!(table.len(), 3);

        assert!(table.unregister("XKCD"));
        assert!(!table.unregister("XKCD"));
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn custom_lookup_is_case_sensitive() {
        let table = CustomCommandTable::with_capacity(4);
        assert!(table.register("SHELL", stub_handler()));
        assert!(table.get("SHELL").is_some());
        assert!(table.get("shell").is_none());
    }
}
