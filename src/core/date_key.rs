use chrono::{Local, NaiveDate};
use regex::Regex;
use std::sync::LazyLock;

/// Date folders are named `DD-MM-YYYY`. Pattern only, no calendar check.
static DATE_FOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}-[0-9]{2}-[0-9]{4}$").unwrap());

/// Source of "today" for the frame counter and date folders.
pub trait Clock {
    fn today(&self) -> NaiveDate;
}

/// Local calendar date at the moment of the call.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Formats the key shared by the in-memory counter and the on-disk folder.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%d-%m-%Y").to_string()
}

pub fn is_date_folder(name: &str) -> bool {
    DATE_FOLDER_RE.is_match(name)
}

/// `(year, month, day)` as encoded in a pattern-valid folder name.
///
/// Works for names like `31-13-2024` that are not real dates, so every
/// qualifying folder gets a total ordering.
pub fn folder_sort_key(name: &str) -> Option<(u32, u32, u32)> {
    if !is_date_folder(name) {
        return None;
    }
    let mut parts = name.split('-').map(|p| p.parse::<u32>());
    let day = parts.next()?.ok()?;
    let month = parts.next()?.ok()?;
    let year = parts.next()?.ok()?;
    Some((year, month, day))
}
