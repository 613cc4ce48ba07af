use std::collections::HashMap;

/// Per-day frame numbers, keyed by `DD-MM-YYYY`.
///
/// Lives only as long as the process. It is not derived from the files on
/// disk; see `Session::reconcile_frame_counter` for the opt-in scan.
#[derive(Debug, Default, Clone)]
pub struct FrameCounter {
    counts: HashMap<String, u32>,
}

impl FrameCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, date_key: &str) -> u32 {
        self.counts.get(date_key).copied().unwrap_or(0)
    }

    /// Number the next save for this day would receive, or `None` once the
    /// day has used up every `u32`.
    pub fn peek_next(&self, date_key: &str) -> Option<u32> {
        self.get(date_key).checked_add(1)
    }

    /// Records one completed save and returns its number. Leaves the count
    /// untouched when it cannot grow.
    pub fn advance(&mut self, date_key: &str) -> Option<u32> {
        let entry = self.counts.entry(date_key.to_string()).or_insert(0);
        *entry = entry.checked_add(1)?;
        Some(*entry)
    }

    pub fn reset(&mut self, date_key: &str) {
        self.counts.insert(date_key.to_string(), 0);
    }

    pub fn set(&mut self, date_key: &str, value: u32) {
        self.counts.insert(date_key.to_string(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_numbers_from_one() {
        let mut counter = FrameCounter::new();
        assert_eq!(counter.peek_next("17-08-2025"), Some(1));
        assert_eq!(counter.advance("17-08-2025"), Some(1));
        assert_eq!(counter.advance("17-08-2025"), Some(2));
        assert_eq!(counter.advance("17-08-2025"), Some(3));
        assert_eq!(counter.get("17-08-2025"), 3);
    }

    #[test]
    fn test_days_are_independent() {
        let mut counter = FrameCounter::new();
        counter.advance("17-08-2025");
        counter.advance("17-08-2025");
        assert_eq!(counter.advance("18-08-2025"), Some(1));
        assert_eq!(counter.get("17-08-2025"), 2);
    }

    #[test]
    fn test_reset_and_set() {
        let mut counter = FrameCounter::new();
        counter.advance("17-08-2025");
        counter.reset("17-08-2025");
        assert_eq!(counter.get("17-08-2025"), 0);
        assert_eq!(counter.advance("17-08-2025"), Some(1));

        counter.set("17-08-2025", 41);
        assert_eq!(counter.advance("17-08-2025"), Some(42));
    }

    #[test]
    fn test_exhausted_day_stops_instead_of_wrapping() {
        let mut counter = FrameCounter::new();
        counter.set("17-08-2025", u32::MAX - 1);
        assert_eq!(counter.peek_next("17-08-2025"), Some(u32::MAX));
        assert_eq!(counter.advance("17-08-2025"), Some(u32::MAX));

        assert_eq!(counter.peek_next("17-08-2025"), None);
        assert_eq!(counter.advance("17-08-2025"), None);
        assert_eq!(counter.get("17-08-2025"), u32::MAX);
    }
}
