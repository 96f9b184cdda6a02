use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "coursegate-cli", version, about = "Coursegate CLI")]
struct Cli {
    /// Use this config file instead of ~/.config/coursegate/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run retry-unlock countdowns for a page until they open
    Countdown(commands::countdown::CountdownArgs),
    /// Mark a part complete and apply the result to a page
    Complete(commands::complete::CompleteArgs),
    /// Check a quiz form before submission
    Validate(commands::validate::ValidateArgs),
    /// Print the deep link for a course part
    Redirect(commands::redirect::RedirectArgs),
    /// Hide a page's flash messages after the configured delay
    Flash(commands::flash::FlashArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("coursegate_core=info,coursegate_cli=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    init_logging();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();
    let result = match cli.command {
        Commands::Countdown(args) => commands::countdown::run(args, config_path).await,
        Commands::Complete(args) => commands::complete::run(args, config_path).await,
        Commands::Validate(args) => commands::validate::run(args),
        Commands::Redirect(args) => commands::redirect::run(args),
        Commands::Flash(args) => commands::flash::run(args, config_path).await,
        Commands::Config { action } => commands::config::run(action, config_path),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
