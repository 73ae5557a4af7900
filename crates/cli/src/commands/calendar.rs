use chrono::Datelike;
use movequote_core::calendar::{ClassifiedCell, MonthGrid, WEEKDAY_LABELS};
use serde::Serialize;

use crate::commands::{load_config, CommandResult};

#[derive(Debug, Serialize)]
struct CalendarOutput {
    title: String,
    weekdays: [&'static str; 7],
    today: String,
    cells: Vec<ClassifiedCell>,
}

pub fn run(month: Option<&str>, selected: Option<&str>) -> CommandResult {
    let config = match load_config("calendar") {
        Ok(config) => config,
        Err(result) => return result,
    };
    let today = config.calendar.today();

    let (year, month) = match month {
        Some(raw) => match parse_month(raw) {
            Some(parsed) => parsed,
            None => {
                return CommandResult::failure(
                    "calendar",
                    "invalid_arguments",
                    format!("--month must look like YYYY-MM, got `{raw}`"),
                    2,
                );
            }
        },
        None => (today.year(), today.month()),
    };

    let grid = match MonthGrid::new(year, month, today) {
        Ok(grid) => grid,
        Err(error) => {
            return CommandResult::failure("calendar", "invalid_arguments", error.to_string(), 2);
        }
    };
    let policy = config.calendar.date_policy();

    let output = CalendarOutput {
        title: grid.title(),
        weekdays: WEEKDAY_LABELS,
        today: today.format("%Y-%m-%d").to_string(),
        cells: grid.classify(&policy, selected),
    };
    let selectable = output.cells.iter().filter(|cell| cell.status.is_selectable()).count();

    CommandResult::success_with_data(
        "calendar",
        format!("{}: {selectable} of {} days selectable", output.title, grid.days_in_month()),
        &output,
    )
}

fn parse_month(raw: &str) -> Option<(i32, u32)> {
    let (year, month) = raw.trim().split_once('-')?;
    let year = year.parse::<i32>().ok()?;
    let month = month.parse::<u32>().ok()?;
    (1..=12).contains(&month).then_some((year, month))
}

#[cfg(test)]
mod tests {
    use super::parse_month;

    #[test]
    fn month_argument_parsing() {
        assert_eq!(parse_month("2025-11"), Some((2025, 11)));
        assert_eq!(parse_month("2025-13"), None);
        assert_eq!(parse_month("November"), None);
    }
}
