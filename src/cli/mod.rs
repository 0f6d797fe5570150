pub mod commands;
pub mod init;
pub mod status;
pub mod task;

pub use commands::*;
