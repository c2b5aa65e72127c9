use anyhow::Context;
use clap::Parser;

use linktracker::config::args::{Cli, Command};
use linktracker::config::{get_config, init_config_from};
use linktracker::runtime::modes::{generate_config, run_server};
use linktracker::system::init_logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command() {
        Command::GenerateConfig { path } => {
            if let Err(e) = generate_config(&path) {
                eprintln!("{}", e.format_colored());
                std::process::exit(1);
            }
            println!("Sample configuration written to {}", path);
            Ok(())
        }
        Command::Serve => {
            init_config_from(&cli.config);
            let config = get_config();

            let _log_guard = match init_logging(&config.logging) {
                Ok(guard) => guard,
                Err(e) => {
                    eprintln!("{}", e.format_colored());
                    std::process::exit(1);
                }
            };

            run_server(&config).await.context("linktracker server exited with an error")
        }
    }
}
