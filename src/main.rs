//! Toastline CLI entry point

use std::process::ExitCode;

use clap::Parser;

use toastline::cli::{
    app::{load_merged_config, run_send, EXIT_ERROR},
    args::{Cli, Commands},
    config_cmd::handle_config_command,
    init_logging,
    presenter::Presenter,
};
use toastline::domain::config::AppConfig;
use toastline::infrastructure::XdgConfigStore;

#[tokio::main(flavor = "multi_thread", worker_threads = 2)]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Config { action } => {
            let presenter = Presenter::new();
            let store = XdgConfigStore::new();
            if let Err(e) = handle_config_command(action, &store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::SUCCESS
        }
        Commands::Send(args) => {
            let cli_config = AppConfig {
                grace_period: args.grace_period.clone(),
                ..Default::default()
            };
            let config = load_merged_config(cli_config).await;
            run_send(args, config).await
        }
    }
}
