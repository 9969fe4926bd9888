// src/main.rs
use clap::Parser;
use kite_order::adapter::{exit_code, kite_client, report, run, usage_exit_code, Cli};
use kite_order::infrastructure::session::TokenFile;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(usage_exit_code(&e));
        }
    };

    // Load configuration
    let config = match cli.load_config() {
        Ok(config) => config,
        Err(e) => {
            report(&e, &mut std::io::stderr());
            return ExitCode::from(exit_code(&e));
        }
    };

    // Initialize logging
    if let Err(e) = config.init_logging() {
        report(&e, &mut std::io::stderr());
        return ExitCode::from(exit_code(&e));
    }

    log::info!("Starting kite-order v{}", env!("CARGO_PKG_VERSION"));
    log::info!(
        "Account {} ({}) via {}",
        config.session.user_id,
        config.session.display_name,
        config.broker.api_root
    );

    let token_file = TokenFile::new(&config.session.token_file);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match run(cli.selected_command(), &token_file, |token| kite_client(&config, token), &mut out).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{:?}", e);
            report(&e, &mut std::io::stderr());
            ExitCode::from(exit_code(&e))
        }
    }
}
