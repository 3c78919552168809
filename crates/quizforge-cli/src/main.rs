//! quizforge CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "quizforge", version, about = "Flat-file quiz and flashcard trainer")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Defaults to the interactive menu
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Question store (CSV), overrides the config file
    #[arg(long, global = true)]
    questions: Option<PathBuf>,

    /// Results log, overrides the config file
    #[arg(long, global = true)]
    results: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and an empty question store
    Init,

    /// Add a question (give --option to make it multiple-choice)
    Add {
        /// Question text
        #[arg(long)]
        text: String,

        /// Correct answer
        #[arg(long)]
        answer: String,

        /// A multiple-choice option (repeatable)
        #[arg(long = "option")]
        options: Vec<String>,
    },

    /// Show per-question statistics
    Stats,

    /// Make a question available for practice and tests
    Enable {
        /// Question id
        id: u32,
    },

    /// Exclude a question from practice and tests
    Disable {
        /// Question id
        id: u32,
    },

    /// Practice with exposure-weighted questions until you stop
    Practice,

    /// Take a scored test
    Test {
        /// Number of questions (default from config)
        #[arg(long)]
        count: Option<usize>,
    },

    /// Show past test scores
    History,

    /// Interactive main menu
    Menu,
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizforge=warn".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let mut console = console::Console::stdio();

    let result = match cli.command.unwrap_or(Commands::Menu) {
        Commands::Init => commands::init::execute(&cli.global, &mut console),
        Commands::Add {
            text,
            answer,
            options,
        } => commands::add::execute(&cli.global, text, answer, options, &mut console),
        Commands::Stats => commands::stats::execute(&cli.global, &mut console),
        Commands::Enable { id } => commands::toggle::execute(&cli.global, id, true, &mut console),
        Commands::Disable { id } => {
            commands::toggle::execute(&cli.global, id, false, &mut console)
        }
        Commands::Practice => commands::practice::execute(&cli.global, &mut console),
        Commands::Test { count } => commands::test::execute(&cli.global, count, &mut console),
        Commands::History => commands::history::execute(&cli.global, &mut console),
        Commands::Menu => commands::menu::execute(&cli.global, &mut console),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
