mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "uniwin",
    version,
    about = "Inspect and control desktop windows: transparency, click-through, topmost and file drop"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the default configuration file
    Init,
    /// Print the effective configuration
    Config,
    /// List all top-level windows
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Find a window by exact title or class name
    Find(commands::find::FindArgs),
    /// Show the native open-file dialog and print the chosen path
    OpenDialog {
        /// Pipe-delimited filter, e.g. "Images|*.png;*.jpg|All files|*.*"
        #[arg(long)]
        filter: Option<String>,
    },
    /// Show the native save-file dialog and print the chosen path
    SaveDialog {
        /// Pipe-delimited filter, e.g. "Text|*.txt"
        #[arg(long)]
        filter: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();

    let config = uniwin_core::config::load();
    if let Err(e) = uniwin_core::log::init(&config.logging) {
        eprintln!("Warning: file logging disabled: {e}");
    }

    log::debug!("uniwin {} starting", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Config => commands::config::execute(&config),
        Commands::List { json } => commands::list::execute(json),
        Commands::Find(args) => commands::find::execute(&args),
        Commands::OpenDialog { filter } => commands::dialog::open(filter.as_deref()),
        Commands::SaveDialog { filter } => commands::dialog::save(filter.as_deref()),
    }
}
