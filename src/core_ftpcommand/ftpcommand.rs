#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    NOOP,
    USER,
    PASS,
    QUIT,
    SYST,
    PASV,
    PORT,
    LIST,
    PWD,
    CWD,
    TYPE,
    CDUP,
    RETR,
    STOR,
    APPE,
    DELE,
    RMD,
    MKD,
    RNFR,
    RNTO,
    SIZE,
    REST,
    FEAT,
    OPTS,
}

impl FtpCommand {
    /// Exact, case-sensitive verb lookup. Anything else falls through to the
    /// custom-command table and ultimately to the 502 reply.
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd {
            "NOOP" => Some(FtpCommand::NOOP),
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "SYST" => Some(FtpCommand::SYST),
            "PASV" => Some(FtpCommand::PASV),
            "PORT" => Some(FtpCommand::PORT),
            "LIST" => Some(FtpCommand::LIST),
            "PWD" => Some(FtpCommand::PWD),
            "CWD" => Some(FtpCommand::CWD),
            "TYPE" => Some(FtpCommand::TYPE),
            "CDUP" => Some(FtpCommand::CDUP),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "APPE" => Some(FtpCommand::APPE),
            "DELE" => Some(FtpCommand::DELE),
            "RMD" => Some(FtpCommand::RMD),
            "MKD" => Some(FtpCommand::MKD),
            "RNFR" => Some(FtpCommand::RNFR),
            "RNTO" => Some(FtpCommand::RNTO),
            "SIZE" => Some(FtpCommand::SIZE),
            "REST" => Some(FtpCommand::REST),
            "FEAT" => Some(FtpCommand::FEAT),
            "OPTS" => Some(FtpCommand::OPTS),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_built_in_verbs() {
        assert_eq!(FtpCommand::from_str("USER"), Some(FtpCommand::USER));
        assert_eq!(FtpCommand::from_str("RETR"), Some(FtpCommand::RETR));
        assert_eq!(FtpCommand::from_str("APPE"), Some(FtpCommand::APPE));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        assert_eq!(FtpCommand::from_str("user"), None);
        assert_eq!(FtpCommand::from_str("Retr"), None);
    }

    #[test]
    fn unknown_verbs_are_rejected() {
        assert_eq!(FtpCommand::from_str("XYZZY"), None);
        assert_eq!(FtpCommand::from_str(""), None);
    }
}
