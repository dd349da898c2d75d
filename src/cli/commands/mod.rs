pub mod domain;
pub mod init;
pub mod resolve;
pub mod tenant;
