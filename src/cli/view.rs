//! Calendar and history commands

use clap::Args;

use crate::display;
use crate::error::BudgetResult;
use crate::services::CalendarService;
use crate::storage::Storage;

/// Arguments for `daybudget calendar`
#[derive(Args)]
pub struct CalendarArgs {
    /// Month to show (YYYY-MM, defaults to the latest period)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Show every cell for one date instead of the month table
    #[arg(short, long)]
    pub date: Option<String>,

    /// Show per-category totals instead of the day table
    #[arg(long)]
    pub categories: bool,
}

/// Arguments for `daybudget history`
#[derive(Args)]
pub struct HistoryArgs {
    /// Month to show (YYYY-MM, defaults to the latest period)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Show full per-cell deltas for every event
    #[arg(long)]
    pub full: bool,
}

/// Handle `daybudget calendar`
pub fn handle_calendar(storage: &Storage, args: CalendarArgs) -> BudgetResult<()> {
    let plan = super::resolve_plan(storage, args.month.as_deref())?;
    let view = CalendarService::new(storage).calendar(plan.period.id)?;

    if let Some(date) = args.date {
        let date = super::parse_date(Some(&date))?;
        print!("{}", display::format_day(&view, date));
    } else if args.categories {
        print!("{}", display::format_categories(&view));
    } else {
        print!("{}", display::format_calendar(&view));
    }
    Ok(())
}

/// Handle `daybudget history`
pub fn handle_history(storage: &Storage, args: HistoryArgs) -> BudgetResult<()> {
    let plan = super::resolve_plan(storage, args.month.as_deref())?;
    let events = CalendarService::new(storage).history(plan.period.id)?;

    if args.full {
        for event in &events {
            print!("{}", display::format_event_details(event));
            println!();
        }
        if events.is_empty() {
            println!("No redistribution events recorded for this period.");
        }
    } else {
        println!("{}", display::format_history(&events));
    }
    Ok(())
}
