use clap::{Parser, Subcommand};
use survey_core::Config;

mod commands;
mod input;
mod logging;
mod render;

#[derive(Parser)]
#[command(name = "survey-kiosk", version, about = "Survey Kiosk CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive kiosk
    Run(commands::run::RunArgs),
    /// Print the question catalog as JSON
    Questions,
    /// Inspect persisted responses
    Responses {
        #[command(subcommand)]
        action: commands::responses::ResponsesAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = Config::load_or_default();
    logging::init(&config.log_filter);

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args, &config),
        Commands::Questions => commands::questions::run(),
        Commands::Responses { action } => commands::responses::run(action, &config),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
