// Interface adapters

pub mod cli;

pub use cli::{exit_code, kite_client, report, run, usage_exit_code, Cli, Command};
