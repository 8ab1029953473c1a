pub mod args;
pub mod commands;

pub use args::{Cli, Commands, ProcessOptions};
pub use commands::{init_logging, run};
