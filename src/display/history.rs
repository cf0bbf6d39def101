//! Redistribution history formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::{Money, RedistributionEvent, TriggerReason};

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "When")]
    timestamp: String,
    #[tabled(rename = "Trigger")]
    trigger: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Deficit")]
    deficit: String,
    #[tabled(rename = "Moved")]
    moved: String,
    #[tabled(rename = "Unresolved")]
    unresolved: String,
}

fn trigger_label(trigger: TriggerReason) -> &'static str {
    match trigger {
        TriggerReason::DayClose => "day close",
        TriggerReason::Manual => "manual",
        TriggerReason::PeriodStart => "period start",
    }
}

/// Format the event ledger for a period, oldest first
pub fn format_history(events: &[RedistributionEvent]) -> String {
    if events.is_empty() {
        return "No redistribution events recorded for this period.".to_string();
    }

    let rows: Vec<EventRow> = events
        .iter()
        .map(|event| {
            // Total amount shifted: the sum of the negative deltas
            let moved: Money = event
                .deltas
                .iter()
                .filter(|d| d.delta.is_negative())
                .map(|d| d.delta)
                .sum();
            EventRow {
                timestamp: event.timestamp.format("%Y-%m-%d %H:%M UTC").to_string(),
                trigger: trigger_label(event.trigger).to_string(),
                category: event.category.clone().unwrap_or_else(|| "-".to_string()),
                deficit: event.deficit.to_string(),
                moved: moved.abs().to_string(),
                unresolved: if event.unresolved_deficit.is_zero() {
                    "-".to_string()
                } else {
                    event.unresolved_deficit.to_string()
                },
            }
        })
        .collect();

    let mut output = Table::new(rows).with(Style::sharp()).to_string();
    output.push('\n');
    output
}

/// Format one event with its full delta list
pub fn format_event_details(event: &RedistributionEvent) -> String {
    let mut output = format!(
        "{} ({}) deficit {}\n",
        event.id,
        trigger_label(event.trigger),
        event.deficit
    );
    if let Some(category) = &event.category {
        output.push_str(&format!("  Category:   {}\n", category));
    }
    output.push_str(&format!(
        "  Recorded:   {}\n",
        event.timestamp.format("%Y-%m-%d %H:%M UTC")
    ));
    if !event.unresolved_deficit.is_zero() {
        output.push_str(&format!("  Unresolved: {}\n", event.unresolved_deficit));
    }

    if event.deltas.is_empty() {
        output.push_str("  No cell adjustments.\n");
    } else {
        output.push_str("  Adjustments:\n");
        for delta in &event.deltas {
            output.push_str(&format!(
                "    {} {:<16} {:>12}\n",
                delta.date,
                delta.category,
                delta.delta.to_string()
            ));
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CellDelta, PeriodId};
    use chrono::NaiveDate;

    fn event() -> RedistributionEvent {
        RedistributionEvent::new(
            PeriodId::new(),
            TriggerReason::DayClose,
            Some("Food".into()),
            Money::from_cents(5000),
            vec![
                CellDelta::new(
                    NaiveDate::from_ymd_opt(2025, 6, 10).unwrap(),
                    "Food",
                    Money::from_cents(5000),
                ),
                CellDelta::new(
                    NaiveDate::from_ymd_opt(2025, 6, 11).unwrap(),
                    "Food",
                    Money::from_cents(-5000),
                ),
            ],
            Money::zero(),
        )
    }

    #[test]
    fn test_format_history_empty() {
        assert!(format_history(&[]).contains("No redistribution events"));
    }

    #[test]
    fn test_format_history_rows() {
        let output = format_history(&[event()]);
        assert!(output.contains("day close"));
        assert!(output.contains("Food"));
        assert!(output.contains("$50.00"));
    }

    #[test]
    fn test_format_event_details() {
        let output = format_event_details(&event());
        assert!(output.contains("Adjustments:"));
        assert!(output.contains("2025-06-11"));
        assert!(output.contains("-$50.00"));
    }
}
