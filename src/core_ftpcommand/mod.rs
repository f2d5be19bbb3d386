// Here's the list of the FTP commands implemented
pub mod appe;
pub mod cdup;
pub mod cwd;
pub mod dele;
pub mod feat;
pub mod ftpcommand;
pub mod handlers;
pub mod list;
pub mod mkd;
pub mod noop;
pub mod opts;
pub mod pass;
pub mod pwd;
pub mod quit;
pub mod rest;
pub mod retr;
pub mod rmd;
pub mod rnfr;
pub mod rnto;
pub mod size;
pub mod stor;
pub mod syst;
pub mod type_;
pub mod user;

// The utils and common functions are here
pub mod utils;
