// src/adapter/cli.rs
// Command-line surface: one command, one broker call, result on stdout

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};

use crate::application::usecase::{OrderManagementUseCase, OrderManager};
use crate::config::Config;
use crate::domain::errors::{AppError, AppResult, BrokerError};
use crate::domain::model::SessionToken;
use crate::domain::repository::BrokerRepository;
use crate::infrastructure::broker::KiteClient;
use crate::infrastructure::session::TokenFile;

#[derive(Debug, Parser)]
#[command(name = "kite-order", version, about = "Place the scripted after-market order on Kite")]
pub struct Cli {
    /// Read the session token from this file instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub token_file: Option<PathBuf>,

    /// Load settings from a JSON file instead of the environment
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Subcommand)]
pub enum Command {
    /// Place the fixed SBIN after-market limit buy and print its order id
    #[default]
    Place,
    /// Print the day's orders as JSON
    Orders,
    /// Print current holdings as JSON
    Holdings,
}

impl Cli {
    pub fn selected_command(&self) -> Command {
        self.command.unwrap_or_default()
    }

    pub fn load_config(&self) -> AppResult<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::from_env()?,
        };
        if let Some(path) = &self.token_file {
            config.session.token_file = path.clone();
        }
        Ok(config)
    }
}

/// Build the live client for a loaded session.
pub fn kite_client(config: &Config, token: SessionToken) -> Arc<dyn BrokerRepository> {
    let client = KiteClient::new(config.session.identity(), token)
        .with_api_root(&config.broker.api_root)
        .with_timeout(config.broker.request_timeout());
    Arc::new(client)
}

/// Load the token, bind a client to it and perform exactly one call.
/// `connect` is only invoked once a token has been read.
pub async fn run<F, W>(command: Command, token_file: &TokenFile, connect: F, out: &mut W) -> AppResult<()>
where
    F: FnOnce(SessionToken) -> Arc<dyn BrokerRepository>,
    W: Write,
{
    let token = token_file.load()?;
    let manager = OrderManager::new(connect(token));

    match command {
        Command::Place => {
            let order_id = manager.place_scripted_order().await?;
            writeln!(out, "{}", order_id)?;
        }
        Command::Orders => {
            let orders = manager.list_orders().await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&orders)?)?;
        }
        Command::Holdings => {
            let holdings = manager.list_holdings().await?;
            writeln!(out, "{}", serde_json::to_string_pretty(&holdings)?)?;
        }
    }

    out.flush()?;
    Ok(())
}

pub fn exit_code(error: &AppError) -> u8 {
    match error {
        AppError::Broker(BrokerError::TokenUnavailable { .. }) => 2,
        AppError::Broker(BrokerError::Authentication(_)) => 3,
        AppError::Broker(BrokerError::OrderRejected { .. })
        | AppError::Broker(BrokerError::InvalidOrder(_)) => 4,
        AppError::Broker(BrokerError::Transport(_))
        | AppError::Broker(BrokerError::MalformedResponse(_)) => 5,
        AppError::Config(_) | AppError::Io(_) | AppError::Serialization(_) => 1,
    }
}

/// Argument errors share the generic failure code; `--help` and `--version` succeed.
pub fn usage_exit_code(error: &clap::Error) -> u8 {
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
        _ => 1,
    }
}

/// One-line diagnostic for stderr.
pub fn report<W: Write>(error: &AppError, err: &mut W) {
    let _ = writeln!(err, "kite-order: {}", error);
}
