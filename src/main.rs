use anyhow::Result;
use clap::{Parser, Subcommand};

use daybudget::cli::{
    handle_calendar, handle_close_day, handle_history, handle_init, handle_recalibrate,
    handle_redistribute, handle_spend, CalendarArgs, DayArgs, HistoryArgs, InitArgs,
    RecalibrateArgs, SpendArgs,
};
use daybudget::config::{paths::DaybudgetPaths, settings::Settings};
use daybudget::storage::Storage;

#[derive(Parser)]
#[command(
    name = "daybudget",
    version,
    about = "Calendar-based daily budget allocation and redistribution",
    long_about = "daybudget splits periodic income into per-category daily budget \
                  cells, tracks spend against each day, and automatically \
                  redistributes deficits across the remaining days of the period \
                  without ever creating or destroying money."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a budget period for a calendar month
    Init(InitArgs),

    /// Record an expense against a category
    Spend(SpendArgs),

    /// Close out a day: evaluate overspend and redistribute
    #[command(name = "close-day")]
    CloseDay(DayArgs),

    /// Redistribute immediately without waiting for day close
    Redistribute(DayArgs),

    /// Show the daily budget calendar
    #[command(alias = "cal")]
    Calendar(CalendarArgs),

    /// Show the redistribution event history
    History(HistoryArgs),

    /// Propose next-period weights from spending history
    Recalibrate(RecalibrateArgs),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = DaybudgetPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;
    settings.validate()?;

    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init(args)) => handle_init(&storage, &settings, args)?,
        Some(Commands::Spend(args)) => handle_spend(&storage, &settings, args)?,
        Some(Commands::CloseDay(args)) => handle_close_day(&storage, &settings, args)?,
        Some(Commands::Redistribute(args)) => handle_redistribute(&storage, &settings, args)?,
        Some(Commands::Calendar(args)) => handle_calendar(&storage, args)?,
        Some(Commands::History(args)) => handle_history(&storage, args)?,
        Some(Commands::Recalibrate(args)) => handle_recalibrate(&storage, &settings, args)?,
        Some(Commands::Config) => {
            println!("daybudget configuration");
            println!("=======================");
            println!("Data directory: {}", storage.paths().data_dir().display());
            println!();
            println!("Settings:");
            println!("  Currency:            {}", settings.currency);
            println!("  Warning ratio:       {}", settings.warning_ratio);
            println!("  Overspend slack:     {}", settings.overspend_slack);
            println!("  Proactive smoothing: {}", settings.proactive_smoothing);
            println!("  Behavior step:       {}", settings.behavior_step);
            println!("  Behavior min history: {}", settings.behavior_min_history);
        }
        None => {
            println!("daybudget - calendar-based daily budgeting");
            println!();
            println!("Run 'daybudget --help' for usage information.");
            println!("Start with 'daybudget init 2025-09 3000 -c Food:0.3:2'.");
        }
    }

    Ok(())
}
