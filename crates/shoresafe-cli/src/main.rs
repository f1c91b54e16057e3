use chrono::{DateTime, Utc};
use clap::{ArgAction, Parser, Subcommand};

mod clock;
mod commands;
mod logging;

use clock::Clock;

#[derive(Parser)]
#[command(name = "shoresafe", version, about = "ShoreSafe CLI")]
struct Cli {
    /// Pin the clock to an RFC 3339 timestamp instead of the system time
    #[arg(long, global = true, value_parser = clock::parse_now)]
    now: Option<DateTime<Utc>>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Port-day timer control
    Timer {
        #[command(subcommand)]
        action: commands::timer::TimerAction,
    },
    /// Trip and port management
    Trip {
        #[command(subcommand)]
        action: commands::trip::TripAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Solo and crew passes
    Pass {
        #[command(subcommand)]
        action: commands::pass::PassAction,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init_logging(logging::Verbosity::from_count(cli.verbose));

    let clock = Clock::new(cli.now);
    let result = match cli.command {
        Commands::Timer { action } => commands::timer::run(action, &clock),
        Commands::Trip { action } => commands::trip::run(action, &clock),
        Commands::Config { action } => commands::config::run(action),
        Commands::Pass { action } => commands::pass::run(action, &clock),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
