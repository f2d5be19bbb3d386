// src/constants.rs

pub const DEFAULT_FTP_PORT: u16 = 1337;
pub const DEFAULT_FILE_BUF_SIZE: usize = 4 * 1024 * 1024;
pub const DEFAULT_MAX_DEVICES: usize = 20;
pub const DEFAULT_MAX_CUSTOM_COMMANDS: usize = 20;
pub const DEFAULT_CLEANUP_SLOTS: usize = 6;

/// Line terminator for every control-channel reply.
pub const EOL: &str = "\r\n";
