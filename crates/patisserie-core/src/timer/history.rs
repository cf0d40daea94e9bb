//! Round history, most recent first.
//!
//! Entries are only ever prepended while the timer is in use and the whole
//! list is dropped on cancel. Display text follows the app's Portuguese
//! layout: `"<round>ª. <mm:ss> - Início <HH:MM:SS>"`.

use std::collections::VecDeque;

use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};

use super::session::format_mm_ss;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub round_number: u32,
    pub total_duration_ms: u64,
    pub started_at: DateTime<Utc>,
}

impl HistoryEntry {
    /// Render with the start time shown in the local timezone.
    pub fn display_line(&self) -> String {
        self.display_line_in(&Local)
    }

    pub fn display_line_in<Tz: chrono::TimeZone>(&self, tz: &Tz) -> String
    where
        Tz::Offset: std::fmt::Display,
    {
        format!(
            "{}ª. {} - Início {}",
            self.round_number,
            format_mm_ss(self.total_duration_ms),
            self.started_at.with_timezone(tz).format("%H:%M:%S")
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct History {
    entries: VecDeque<HistoryEntry>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Formatted lines, most recent first.
    pub fn lines(&self) -> Vec<String> {
        self.entries.iter().map(HistoryEntry::display_line).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn entry(round: u32, total_ms: u64, h: u32, m: u32, s: u32) -> HistoryEntry {
        HistoryEntry {
            round_number: round,
            total_duration_ms: total_ms,
            started_at: Utc.with_ymd_and_hms(2026, 3, 14, h, m, s).unwrap(),
        }
    }

    #[test]
    fn display_line_matches_app_layout() {
        let e = entry(3, 90_000, 14, 5, 9);
        assert_eq!(e.display_line_in(&Utc), "3ª. 01:30 - Início 14:05:09");
    }

    #[test]
    fn record_prepends() {
        let mut history = History::new();
        history.record(entry(1, 5_000, 10, 0, 0));
        history.record(entry(2, 5_000, 10, 0, 12));

        let rounds: Vec<u32> = history.iter().map(|e| e.round_number).collect();
        assert_eq!(rounds, vec![2, 1]);
        assert_eq!(history.latest().map(|e| e.round_number), Some(2));
    }

    #[test]
    fn clear_empties_history() {
        let mut history = History::new();
        history.record(entry(1, 5_000, 10, 0, 0));
        assert_eq!(history.len(), 1);
        history.clear();
        assert!(history.is_empty());
        assert!(history.lines().is_empty());
    }

    #[test]
    fn lines_follow_entry_order() {
        let mut history = History::new();
        history.record(entry(1, 60_000, 8, 0, 0));
        history.record(entry(2, 60_000, 8, 1, 7));
        let lines = history.lines();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("2ª. 01:00 - Início "));
        assert!(lines[1].starts_with("1ª. 01:00 - Início "));
    }
}
