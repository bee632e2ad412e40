use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "agenda", version, about = "Agenda planner CLI")]
struct Cli {
    /// Agenda document (default: <data dir>/agenda.json)
    #[arg(long, global = true, env = "AGENDA_FILE")]
    file: Option<PathBuf>,
    /// Pretend the current time is this (YYYY-MM-DDTHH:MM)
    #[arg(long, global = true, value_parser = commands::parse_now)]
    now: Option<NaiveDateTime>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Prioritized list of open items
    List {
        /// Only items due within this many days (drops overdue items)
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        json: bool,
    },
    /// Allocate slots and show the day buckets
    Plan {
        #[arg(long)]
        json: bool,
    },
    /// Allocate slots and show today's plan
    Today {
        #[arg(long)]
        json: bool,
    },
    /// Task management
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Event management
    Event {
        #[command(subcommand)]
        action: commands::event::EventAction,
    },
    /// Lesson management and reviews
    Lesson {
        #[command(subcommand)]
        action: commands::lesson::LessonAction,
    },
    /// Manual time slot editing
    Slot {
        #[command(subcommand)]
        action: commands::slot::SlotAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("AGENDA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> commands::CmdResult {
    let Cli { file, now, command } = cli;
    let ctx = || Context::load(file.clone(), now);

    match command {
        Commands::List { days, json } => commands::view::list(&ctx()?, days, json),
        Commands::Plan { json } => commands::view::plan(&ctx()?, json),
        Commands::Today { json } => commands::view::today(&ctx()?, json),
        Commands::Task { action } => commands::task::run(&ctx()?, action),
        Commands::Event { action } => commands::event::run(&ctx()?, action),
        Commands::Lesson { action } => commands::lesson::run(&ctx()?, action),
        Commands::Slot { action } => commands::slot::run(&ctx()?, action),
        Commands::Config { action } => commands::config::run(action),
    }
}

fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
