//! Helpers shared by the CLI and the runner

pub mod dotenv;
pub mod shell;
pub mod skeleton;

pub use dotenv::*;
pub use shell::*;
pub use skeleton::*;
