//! Period setup commands
//!
//! `init` creates a period for a calendar month from income and category
//! weights; `recalibrate` proposes next-period weights from history.

use clap::Args;

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{CategoryConfig, Currency, Money, UserId};
use crate::services::{AllocationService, BehaviorService};
use crate::storage::Storage;

/// Arguments for `daybudget init`
#[derive(Args)]
pub struct InitArgs {
    /// Calendar month to budget (YYYY-MM)
    pub month: String,

    /// Total income for the period (e.g. "3000" or "3000.00")
    pub income: String,

    /// Category spec, repeatable: name:weight[:priority]
    /// (e.g. -c Food:0.3:2 -c Transport:0.2:1)
    #[arg(short, long = "category", value_name = "NAME:WEIGHT[:PRIORITY]")]
    pub categories: Vec<String>,

    /// Carry the prior month's leftovers into this period
    #[arg(long)]
    pub carry_over: bool,

    /// Currency code (defaults to the configured currency)
    #[arg(long)]
    pub currency: Option<String>,
}

/// Arguments for `daybudget recalibrate`
#[derive(Args)]
pub struct RecalibrateArgs {
    /// Month whose user history to recalibrate from (YYYY-MM, defaults
    /// to the latest period)
    #[arg(short, long)]
    pub month: Option<String>,
}

/// Parse one name:weight[:priority] category spec
fn parse_category(spec: &str) -> BudgetResult<CategoryConfig> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() < 2 || parts.len() > 3 {
        return Err(BudgetError::InvalidAllocation(format!(
            "expected NAME:WEIGHT[:PRIORITY], got '{}'",
            spec
        )));
    }

    let weight: f64 = parts[1].parse().map_err(|_| {
        BudgetError::InvalidAllocation(format!("bad weight in '{}'", spec))
    })?;
    let priority: u32 = match parts.get(2) {
        Some(p) => p.parse().map_err(|_| {
            BudgetError::InvalidAllocation(format!("bad priority in '{}'", spec))
        })?,
        None => 1,
    };

    Ok(CategoryConfig::new(parts[0], weight, priority))
}

/// Handle `daybudget init`
pub fn handle_init(storage: &Storage, settings: &Settings, args: InitArgs) -> BudgetResult<()> {
    let (year, month) = super::parse_month(&args.month)?;
    let income = Money::parse(&args.income)
        .map_err(|e| BudgetError::InvalidPeriod(e.to_string()))?;
    let currency = Currency::new(args.currency.as_deref().unwrap_or(&settings.currency));

    let configs: Vec<CategoryConfig> = args
        .categories
        .iter()
        .map(|s| parse_category(s))
        .collect::<BudgetResult<_>>()?;
    if configs.is_empty() {
        return Err(BudgetError::InvalidAllocation(
            "at least one --category is required".to_string(),
        ));
    }

    // Reuse the existing user when periods already exist so history
    // queries and recalibration see one continuous timeline
    let previous = storage.plans.latest()?;
    let user_id = previous
        .as_ref()
        .map(|p| p.period.user_id)
        .unwrap_or_else(UserId::new);

    let service = AllocationService::new(storage);
    let plan = if args.carry_over {
        let prev = previous.ok_or_else(|| {
            BudgetError::period_not_found("no prior period to carry over from".to_string())
        })?;
        service.create_period_with_carryover(
            prev.period.id,
            user_id,
            year,
            month,
            income,
            &configs,
            currency,
        )?
    } else {
        service.create_period(user_id, year, month, income, &configs, currency)?
    };

    println!("Created period {} ({})", plan.period.id, plan.period);
    println!();
    for allocation in plan.allocations.by_priority() {
        println!("  {}", allocation);
    }
    Ok(())
}

/// Handle `daybudget recalibrate`
pub fn handle_recalibrate(
    storage: &Storage,
    settings: &Settings,
    args: RecalibrateArgs,
) -> BudgetResult<()> {
    let latest = super::resolve_plan(storage, args.month.as_deref())?;

    let service = BehaviorService::new(storage, settings);
    let proposed = service.recalibrate(latest.period.user_id)?;

    println!("Proposed weights for the next period:");
    println!();
    for config in &proposed {
        let current = latest
            .allocations
            .get(&config.name)
            .map(|a| a.weight)
            .unwrap_or(0.0);
        println!(
            "  {:<16} {:.3} -> {:.3} (rank {})",
            config.name, current, config.weight, config.priority
        );
    }
    println!();
    println!("Apply them with 'daybudget init' when creating the next period.");
    Ok(())
}
