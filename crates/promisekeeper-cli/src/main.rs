use clap::{CommandFactory, Parser, Subcommand};

mod commands;
mod store;

#[derive(Parser)]
#[command(name = "promisekeeper-cli", version, about = "PromiseKeeper CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Promise management
    Promise {
        #[command(subcommand)]
        action: commands::promise::PromiseAction,
    },
    /// Fitness tracker connection
    Tracker {
        #[command(subcommand)]
        action: commands::tracker::TrackerAction,
    },
    /// Evidence generation
    Evidence {
        #[command(subcommand)]
        action: commands::evidence::EvidenceAction,
    },
    /// Evaluate a promise against evidence
    Evaluate(commands::evaluate::EvaluateArgs),
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn main() {
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Promise { action } => commands::promise::run(action),
        Commands::Tracker { action } => commands::tracker::run(action),
        Commands::Evidence { action } => commands::evidence::run(action),
        Commands::Evaluate(args) => commands::evaluate::run(args),
        Commands::Completions { shell } => {
            clap_complete::generate(
                shell,
                &mut Cli::command(),
                "promisekeeper-cli",
                &mut std::io::stdout(),
            );
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
