//! Month grid for the moving-date picker and the date arithmetic behind it.

use chrono::{Datelike, Days, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const GRID_CELLS: usize = 42;

pub const WEEKDAY_LABELS: [&str; 7] = ["Mo", "Tu", "We", "Th", "Fr", "Sa", "Su"];

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum CalendarError {
    #[error("`{0}` is not a valid YYYY-MM-DD date")]
    InvalidDate(String),
    #[error("{year}-{month:02} is not a valid month")]
    InvalidMonth { year: i32, month: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Availability {
    Available,
    NearlyFull,
    Full,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "DateStatusWire")]
pub struct DateStatus {
    pub is_disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability: Option<Availability>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub surcharge: Option<String>,
}

/// Incoming status payload. Older providers flag booked-out days with
/// `isFull` instead of an availability.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct DateStatusWire {
    is_disabled: bool,
    availability: Option<Availability>,
    surcharge: Option<String>,
    is_full: bool,
}

impl From<DateStatusWire> for DateStatus {
    fn from(wire: DateStatusWire) -> Self {
        let availability = if wire.is_full { Some(Availability::Full) } else { wire.availability };
        Self { is_disabled: wire.is_disabled, availability, surcharge: wire.surcharge }
    }
}

impl DateStatus {
    pub fn disabled() -> Self {
        Self { is_disabled: true, ..Self::default() }
    }

    pub fn with_surcharge(surcharge: impl Into<String>) -> Self {
        Self { surcharge: Some(surcharge.into()), ..Self::default() }
    }

    pub fn is_selectable(&self) -> bool {
        !self.is_disabled && self.availability != Some(Availability::Full)
    }
}

/// Classifies a `YYYY-MM-DD` string for display and selection.
pub trait DateStatusProvider {
    fn date_status(&self, date: &str) -> DateStatus;
}

impl<F> DateStatusProvider for F
where
    F: Fn(&str) -> DateStatus,
{
    fn date_status(&self, date: &str) -> DateStatus {
        self(date)
    }
}

/// The wizard's own rule set: past dates are closed, weekends cost extra.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovingDatePolicy {
    pub today: NaiveDate,
    pub weekend_surcharge: String,
}

impl MovingDatePolicy {
    pub fn new(today: NaiveDate, weekend_surcharge: impl Into<String>) -> Self {
        Self { today, weekend_surcharge: weekend_surcharge.into() }
    }
}

impl DateStatusProvider for MovingDatePolicy {
    fn date_status(&self, date: &str) -> DateStatus {
        let Ok(date) = parse_iso_date(date) else {
            return DateStatus::disabled();
        };
        if is_before(date, self.today) {
            return DateStatus::disabled();
        }
        if is_weekend(date) {
            return DateStatus::with_surcharge(self.weekend_surcharge.clone());
        }
        DateStatus::default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub date_string: String,
    pub is_current_month: bool,
    pub is_today: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedCell {
    #[serde(flatten)]
    pub cell: CalendarCell,
    pub status: DateStatus,
    pub is_selected: bool,
}

/// Six Monday-first weeks covering one month, padded with the neighbouring
/// months' days.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    pub cells: Vec<CalendarCell>,
}

impl MonthGrid {
    pub fn new(year: i32, month: u32, today: NaiveDate) -> Result<Self, CalendarError> {
        let first = NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or(CalendarError::InvalidMonth { year, month })?;
        let leading = u64::from(first.weekday().num_days_from_monday());
        let start = first
            .checked_sub_days(Days::new(leading))
            .ok_or(CalendarError::InvalidMonth { year, month })?;

        let cells: Vec<CalendarCell> = start
            .iter_days()
            .take(GRID_CELLS)
            .map(|date| {
                let is_current_month = date.month() == month && date.year() == year;
                CalendarCell {
                    date,
                    date_string: format_date_iso(date),
                    is_current_month,
                    is_today: is_current_month && date == today,
                }
            })
            .collect();
        if cells.len() != GRID_CELLS {
            return Err(CalendarError::InvalidMonth { year, month });
        }

        Ok(Self { year, month, cells })
    }

    pub fn title(&self) -> String {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .map(|first| first.format("%B %Y").to_string())
            .unwrap_or_default()
    }

    pub fn days_in_month(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_current_month).count()
    }

    /// Out-of-month cells are never offered, so they report as disabled
    /// without consulting the provider.
    pub fn classify<P>(&self, provider: &P, selected: Option<&str>) -> Vec<ClassifiedCell>
    where
        P: DateStatusProvider + ?Sized,
    {
        self.cells
            .iter()
            .map(|cell| ClassifiedCell {
                status: if cell.is_current_month {
                    provider.date_status(&cell.date_string)
                } else {
                    DateStatus::disabled()
                },
                is_selected: selected == Some(cell.date_string.as_str()),
                cell: cell.clone(),
            })
            .collect()
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DatePicker {
    is_open: bool,
    year: i32,
    month: u32,
    selected: Option<String>,
    today: NaiveDate,
}

impl DatePicker {
    /// Opens on the month of `selected` when it parses, otherwise on today's.
    pub fn new(selected: Option<&str>, today: NaiveDate) -> Self {
        let selected = selected.filter(|value| !value.trim().is_empty());
        let anchor = selected.and_then(|value| parse_iso_date(value).ok()).unwrap_or(today);
        Self {
            is_open: false,
            year: anchor.year(),
            month: anchor.month(),
            selected: selected.map(str::to_owned),
            today,
        }
    }

    pub fn open(&mut self) {
        self.is_open = true;
    }

    pub fn close(&mut self) {
        self.is_open = false;
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn displayed_month(&self) -> (i32, u32) {
        (self.year, self.month)
    }

    pub fn previous_month(&mut self) {
        (self.year, self.month) =
            if self.month == 1 { (self.year - 1, 12) } else { (self.year, self.month - 1) };
    }

    pub fn next_month(&mut self) {
        (self.year, self.month) =
            if self.month == 12 { (self.year + 1, 1) } else { (self.year, self.month + 1) };
    }

    pub fn grid(&self) -> Result<MonthGrid, CalendarError> {
        MonthGrid::new(self.year, self.month, self.today)
    }

    /// Handles a click on grid cell `index`. Returns the picked ISO date and
    /// closes the picker; clicks on padding, disabled or full cells change
    /// nothing.
    pub fn click<P>(&mut self, index: usize, provider: &P) -> Option<String>
    where
        P: DateStatusProvider + ?Sized,
    {
        let grid = self.grid().ok()?;
        let cell = grid.cells.get(index)?;
        if !cell.is_current_month {
            return None;
        }
        if !provider.date_status(&cell.date_string).is_selectable() {
            return None;
        }

        self.selected = Some(cell.date_string.clone());
        self.close();
        self.selected.clone()
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn parse_iso_date(value: &str) -> Result<NaiveDate, CalendarError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| CalendarError::InvalidDate(value.to_owned()))
}

pub fn format_date_iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

pub fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

pub fn is_before(date: NaiveDate, reference: NaiveDate) -> bool {
    date < reference
}

pub fn is_before_or_equal(date: NaiveDate, cutoff: NaiveDate) -> bool {
    date <= cutoff
}

pub fn add_days(value: &str, days: i64) -> Result<String, CalendarError> {
    let date = parse_iso_date(value)?;
    let shifted = if days >= 0 {
        date.checked_add_days(Days::new(days.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(days.unsigned_abs()))
    };
    shifted.map(format_date_iso).ok_or_else(|| CalendarError::InvalidDate(value.to_owned()))
}

/// `November 15, 2025`; empty input renders as an empty string.
pub fn format_date_display(value: &str) -> String {
    if value.trim().is_empty() {
        return String::new();
    }
    match parse_iso_date(value) {
        Ok(date) => date.format("%B %-d, %Y").to_string(),
        Err(_) => value.to_owned(),
    }
}

pub fn day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}
