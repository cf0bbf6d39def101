//! Spend and redistribution commands

use clap::Args;

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{CellStatus, Currency, Money};
use crate::services::{CollectingSink, RedistributionService, SpendService, StatusChange};
use crate::storage::Storage;

/// Arguments for `daybudget spend`
#[derive(Args)]
pub struct SpendArgs {
    /// Category name
    pub category: String,

    /// Amount spent (e.g. "12.50")
    pub amount: String,

    /// Date of the expense (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Month the expense belongs to (YYYY-MM, defaults to the latest period)
    #[arg(short, long)]
    pub month: Option<String>,

    /// Currency code (defaults to the period's currency)
    #[arg(long)]
    pub currency: Option<String>,
}

/// Arguments for `daybudget close-day` and `daybudget redistribute`
#[derive(Args)]
pub struct DayArgs {
    /// Date to evaluate (YYYY-MM-DD, defaults to today)
    #[arg(short, long)]
    pub date: Option<String>,

    /// Month to operate on (YYYY-MM, defaults to the latest period)
    #[arg(short, long)]
    pub month: Option<String>,
}

fn print_changes(changes: &[StatusChange]) {
    for change in changes {
        let marker = crate::display::status_marker(change.status);
        println!("  {} {} is now [{}]", change.date, change.category, marker);
    }
}

/// Handle `daybudget spend`
pub fn handle_spend(storage: &Storage, settings: &Settings, args: SpendArgs) -> BudgetResult<()> {
    let plan = super::resolve_plan(storage, args.month.as_deref())?;
    let date = super::parse_date(args.date.as_deref())?;
    let amount = Money::parse(&args.amount)
        .map_err(|e| BudgetError::InvalidSpend(e.to_string()))?;
    let currency = args
        .currency
        .map(Currency::new)
        .unwrap_or_else(|| plan.period.currency.clone());

    let sink = CollectingSink::new();
    let service = SpendService::new(storage, settings);
    let status = service.record(plan.period.id, date, &args.category, amount, &currency, &sink)?;

    println!(
        "Recorded {} against {} on {} [{}]",
        amount,
        args.category,
        date,
        crate::display::status_marker(status)
    );
    print_changes(&sink.drain());

    if status == CellStatus::Exceeded {
        let over = service.over_plan(plan.period.id, date)?;
        if !over.is_empty() {
            println!();
            println!(
                "Over cumulative plan: {}. Run 'daybudget close-day' to redistribute.",
                over.join(", ")
            );
        }
    }
    Ok(())
}

fn report_events(events: &[crate::models::RedistributionEvent]) {
    if events.is_empty() {
        println!("Nothing to redistribute: every category is within its cumulative plan.");
        return;
    }
    for event in events {
        println!("{}", event);
        if !event.is_fully_resolved() {
            println!(
                "  Unresolved deficit of {}: no remaining budget could absorb it.",
                event.unresolved_deficit
            );
        }
    }
}

/// Handle `daybudget close-day`
pub fn handle_close_day(storage: &Storage, settings: &Settings, args: DayArgs) -> BudgetResult<()> {
    let plan = super::resolve_plan(storage, args.month.as_deref())?;
    let date = super::parse_date(args.date.as_deref())?;

    let sink = CollectingSink::new();
    let engine = RedistributionService::new(storage, settings);
    let events = engine.close_day(plan.period.id, date, &sink)?;

    report_events(&events);
    print_changes(&sink.drain());
    Ok(())
}

/// Handle `daybudget redistribute`
pub fn handle_redistribute(
    storage: &Storage,
    settings: &Settings,
    args: DayArgs,
) -> BudgetResult<()> {
    let plan = super::resolve_plan(storage, args.month.as_deref())?;
    let date = super::parse_date(args.date.as_deref())?;

    let sink = CollectingSink::new();
    let engine = RedistributionService::new(storage, settings);
    let events = engine.redistribute_now(plan.period.id, date, &sink)?;

    report_events(&events);
    print_changes(&sink.drain());
    Ok(())
}
