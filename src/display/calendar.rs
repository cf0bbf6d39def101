//! Calendar view formatting

use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::models::CellStatus;
use crate::services::CalendarView;

#[derive(Tabled)]
struct DayRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Planned")]
    planned: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
}

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Planned")]
    planned: String,
    #[tabled(rename = "Spent")]
    spent: String,
    #[tabled(rename = "Remaining")]
    remaining: String,
    #[tabled(rename = "Adjusted")]
    adjusted: String,
}

/// Status marker for table cells
pub fn status_marker(status: CellStatus) -> &'static str {
    match status {
        CellStatus::OnTrack => "ok",
        CellStatus::Warning => "warn",
        CellStatus::Exceeded => "OVER",
    }
}

/// Format the day-by-day calendar table for a period
pub fn format_calendar(view: &CalendarView) -> String {
    let mut output = format!("Period {}\n\n", view.plan.period);

    let rows: Vec<DayRow> = view
        .days
        .iter()
        .map(|day| DayRow {
            date: day.date.format("%Y-%m-%d").to_string(),
            status: status_marker(day.status).to_string(),
            planned: day.planned.to_string(),
            spent: day.spent.to_string(),
            remaining: (day.planned - day.spent).to_string(),
        })
        .collect();

    output.push_str(&Table::new(rows).with(Style::sharp()).to_string());
    output.push('\n');
    output
}

/// Format the per-category rollup table for a period
pub fn format_categories(view: &CalendarView) -> String {
    let rows: Vec<CategoryRow> = view
        .categories
        .iter()
        .map(|c| CategoryRow {
            category: c.category.clone(),
            planned: c.planned.to_string(),
            spent: c.spent.to_string(),
            remaining: c.remaining.to_string(),
            adjusted: c.adjusted.to_string(),
        })
        .collect();

    let mut output = Table::new(rows).with(Style::sharp()).to_string();
    output.push('\n');
    output
}

/// One-day detail: every cell for the date
pub fn format_day(view: &CalendarView, date: chrono::NaiveDate) -> String {
    let day = match view.days.iter().find(|d| d.date == date) {
        Some(day) => day,
        None => return format!("No plan for {}.", date),
    };

    let mut output = format!("{} [{}]\n", day.date, status_marker(day.status));
    for cell in &day.cells {
        output.push_str(&format!(
            "  {:<16} planned {:>10}  spent {:>10}  [{}]\n",
            cell.category,
            cell.planned.to_string(),
            cell.spent.to_string(),
            status_marker(cell.status)
        ));
    }
    output
}
