//! Redistribution engine
//!
//! Detects category overspend against the cumulative plan, absorbs the
//! deficit out of remaining days — first the category's own, then other
//! categories in priority order — and records every run as an immutable
//! event. A run is all-or-nothing: the full delta set is computed and
//! validated to sum to zero before anything is written.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::config::Settings;
use crate::error::{BudgetError, BudgetResult};
use crate::models::{
    CellDelta, Money, PeriodId, PeriodPlan, RedistributionEvent, TriggerReason,
};
use crate::services::notify::{StatusChange, StatusSink};
use crate::storage::Storage;

/// The redistribution engine
pub struct RedistributionService<'a> {
    storage: &'a Storage,
    settings: &'a Settings,
}

impl<'a> RedistributionService<'a> {
    /// Create a new redistribution service
    pub fn new(storage: &'a Storage, settings: &'a Settings) -> Self {
        Self { storage, settings }
    }

    /// Categories whose cumulative spend through `as_of` exceeds their
    /// cumulative plan by more than the configured slack.
    ///
    /// Returned in redistribution order: allocation priority order
    /// first, then unbudgeted categories by name.
    pub fn triggered_categories(&self, plan: &PeriodPlan, as_of: NaiveDate) -> Vec<String> {
        let mut ordered: Vec<String> = plan
            .allocations
            .by_priority()
            .map(|a| a.category.clone())
            .collect();

        let mut unbudgeted: Vec<String> = plan
            .cells()
            .iter()
            .map(|c| c.category.clone())
            .filter(|c| !ordered.contains(c))
            .collect();
        unbudgeted.sort();
        unbudgeted.dedup();
        ordered.extend(unbudgeted);

        ordered
            .into_iter()
            .filter(|category| self.deficit(plan, category, as_of).is_positive())
            .collect()
    }

    /// Day-close evaluation: run redistribution for every category over
    /// its cumulative plan as of `date`. One event per triggering
    /// category.
    pub fn close_day(
        &self,
        period_id: PeriodId,
        date: NaiveDate,
        sink: &dyn StatusSink,
    ) -> BudgetResult<Vec<RedistributionEvent>> {
        self.run(period_id, date, TriggerReason::DayClose, sink)
    }

    /// Explicit user-initiated run
    pub fn redistribute_now(
        &self,
        period_id: PeriodId,
        date: NaiveDate,
        sink: &dyn StatusSink,
    ) -> BudgetResult<Vec<RedistributionEvent>> {
        self.run(period_id, date, TriggerReason::Manual, sink)
    }

    fn run(
        &self,
        period_id: PeriodId,
        as_of: NaiveDate,
        trigger: TriggerReason,
        sink: &dyn StatusSink,
    ) -> BudgetResult<Vec<RedistributionEvent>> {
        let lock = self.storage.period_lock(period_id)?;
        let _guard = lock
            .lock()
            .map_err(|e| BudgetError::Storage(format!("Failed to acquire period lock: {}", e)))?;

        let mut plan = self.storage.plans.load_period(period_id)?;
        if !plan.period.contains(as_of) {
            return Err(BudgetError::InvalidPeriod(format!(
                "{} is outside period {}",
                as_of, plan.period
            )));
        }

        let mut events = Vec::new();
        for category in self.triggered_categories(&plan, as_of) {
            if let Some(event) = self.run_for_category(&mut plan, &category, as_of, trigger)? {
                events.push(event);
            }
        }

        if events.is_empty() {
            return Ok(events);
        }

        // Commit: the plan mutation and the ledger land together
        self.storage.plans.upsert(plan.clone())?;
        for event in &events {
            self.storage.events.append(event.clone())?;
        }
        self.storage.save_all()?;

        for event in &events {
            for delta in &event.deltas {
                let status = plan
                    .cell(delta.date, &delta.category)
                    .map(|c| c.status)
                    .unwrap_or_default();
                sink.notify(StatusChange::new(
                    delta.date,
                    &delta.category,
                    status,
                    delta.delta,
                ));
            }
        }

        Ok(events)
    }

    /// Deficit of a category through `as_of`: cumulative spend beyond
    /// cumulative plan plus slack, floored at zero
    fn deficit(&self, plan: &PeriodPlan, category: &str, as_of: NaiveDate) -> Money {
        let planned = plan.cumulative_planned(category, as_of);
        let spent = plan.cumulative_spent(category, as_of);
        let allowed = planned + planned.apply_weight(self.settings.overspend_slack);
        let deficit = spent - allowed;
        if deficit.is_positive() {
            deficit
        } else {
            Money::zero()
        }
    }

    /// Absorb one category's deficit. Mutates the plan in memory only;
    /// the caller commits.
    fn run_for_category(
        &self,
        plan: &mut PeriodPlan,
        category: &str,
        as_of: NaiveDate,
        trigger: TriggerReason,
    ) -> BudgetResult<Option<RedistributionEvent>> {
        let deficit = self.deficit(plan, category, as_of);
        if !deficit.is_positive() {
            return Ok(None);
        }

        let mut remaining = deficit;
        let mut deltas: BTreeMap<(NaiveDate, String), Money> = BTreeMap::new();

        // Opt-in smoothing: draw on idle surplus elsewhere before
        // shrinking this category's own remaining days
        if self.settings.proactive_smoothing {
            remaining = self.drain_sources(plan, category, as_of, remaining, true, &mut deltas);
        }

        // Within-category absorption over strictly-future days
        remaining = self.drain_category(plan, category, as_of, remaining, &mut deltas);

        // Cross-category absorption, ascending priority rank
        if remaining.is_positive() {
            remaining = self.drain_sources(plan, category, as_of, remaining, false, &mut deltas);
        }

        let absorbed = deficit - remaining;
        if absorbed.is_positive() {
            // The absorbed amount covers the overage on the triggering
            // day, keeping the run zero-sum and the plan conserved.
            plan.ensure_cell(as_of, category)
                .apply_adjustment(absorbed, self.settings.warning_ratio);
            *deltas
                .entry((as_of, category.to_string()))
                .or_insert_with(Money::zero) += absorbed;
        }

        let deltas: Vec<CellDelta> = deltas
            .into_iter()
            .filter(|(_, delta)| !delta.is_zero())
            .map(|((date, category), delta)| CellDelta::new(date, category, delta))
            .collect();

        let net: Money = deltas.iter().map(|d| d.delta).sum();
        if !net.is_zero() {
            return Err(BudgetError::RedistributionConsistency(format!(
                "redistribution deltas for '{}' sum to {}, expected zero",
                category, net
            )));
        }

        Ok(Some(RedistributionEvent::new(
            plan.period.id,
            trigger,
            Some(category.to_string()),
            deficit,
            deltas,
            remaining,
        )))
    }

    /// Reduce a category's future days evenly by up to `target`,
    /// clamping each day at zero and cascading the residual over the
    /// days still above the floor. Returns the deficit left unabsorbed.
    fn drain_category(
        &self,
        plan: &mut PeriodPlan,
        category: &str,
        after: NaiveDate,
        target: Money,
        deltas: &mut BTreeMap<(NaiveDate, String), Money>,
    ) -> Money {
        let mut remaining = target;

        while remaining.is_positive() {
            let days = plan.reducible_future_dates(category, after);
            if days.is_empty() {
                break;
            }

            let shares = remaining.split_evenly(days.len());
            let mut taken_this_pass = Money::zero();

            for (date, share) in days.iter().zip(shares) {
                let cell = match plan.cell_mut(*date, category) {
                    Some(cell) => cell,
                    None => continue,
                };
                let cut = share.min(cell.planned);
                if !cut.is_positive() {
                    continue;
                }
                cell.apply_adjustment(-cut, self.settings.warning_ratio);
                *deltas
                    .entry((*date, category.to_string()))
                    .or_insert_with(Money::zero) -= cut;
                taken_this_pass += cut;
            }

            remaining -= taken_this_pass;
            if taken_this_pass.is_zero() {
                break;
            }
        }

        remaining
    }

    /// Shift budget from other categories, ascending priority rank
    /// (ties broken by name), until the deficit is covered or sources
    /// are exhausted. With `idle_only`, a source contributes at most its
    /// own cumulative underspend to date.
    fn drain_sources(
        &self,
        plan: &mut PeriodPlan,
        sink_category: &str,
        as_of: NaiveDate,
        target: Money,
        idle_only: bool,
        deltas: &mut BTreeMap<(NaiveDate, String), Money>,
    ) -> Money {
        let sources: Vec<String> = plan
            .allocations
            .by_priority()
            .map(|a| a.category.clone())
            .filter(|c| c != sink_category)
            .collect();

        let mut remaining = target;
        for source in sources {
            if !remaining.is_positive() {
                break;
            }

            let mut available = plan.future_planned(&source, as_of);
            if idle_only {
                let idle =
                    plan.cumulative_planned(&source, as_of) - plan.cumulative_spent(&source, as_of);
                if !idle.is_positive() {
                    continue;
                }
                available = available.min(idle);
            }
            if !available.is_positive() {
                continue;
            }

            let take = remaining.min(available);
            let left = self.drain_category(plan, &source, as_of, take, deltas);
            remaining -= take - left;
        }

        remaining
    }
}
