// src/report.rs
//! Run-level aggregation of per-page outcomes.

use std::fmt;

/// One unit that was not processed, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub unit: String,
    pub reason: String,
}

/// Counts processed, skipped and failed units for one command run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    label: String,
    processed: usize,
    skipped: Vec<Entry>,
    failed: Vec<Entry>,
    notes: Vec<String>,
}

impl RunReport {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn processed(&mut self, unit: impl fmt::Display) {
        log::debug!("Processed {}", unit);
        self.processed += 1;
    }

    pub fn skipped(&mut self, unit: impl fmt::Display, reason: impl Into<String>) {
        let entry = Entry {
            unit: unit.to_string(),
            reason: reason.into(),
        };
        log::info!("Skipped {}: {}", entry.unit, entry.reason);
        self.skipped.push(entry);
    }

    pub fn failed(&mut self, unit: impl fmt::Display, reason: impl Into<String>) {
        let entry = Entry {
            unit: unit.to_string(),
            reason: reason.into(),
        };
        log::error!("Failed {}: {}", entry.unit, entry.reason);
        self.failed.push(entry);
    }

    /// Free-form line printed under the totals.
    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }

    pub fn processed_count(&self) -> usize {
        self.processed
    }

    pub fn skipped_entries(&self) -> &[Entry] {
        &self.skipped
    }

    pub fn failed_entries(&self) -> &[Entry] {
        &self.failed
    }

    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Totals, then every failure with its reason.
    pub fn summary(&self) -> String {
        let mut out = format!(
            "{}: {} processed, {} skipped, {} failed",
            self.label,
            self.processed,
            self.skipped.len(),
            self.failed.len()
        );
        for note in &self.notes {
            out.push_str("\n  ");
            out.push_str(note);
        }
        for entry in &self.failed {
            out.push_str(&format!("\n  ✗ {}: {}", entry.unit, entry.reason));
        }
        out
    }

    pub fn print_summary(&self) {
        println!("{}", self.summary());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn summary_counts_everything() {
        let mut report = RunReport::new("narrate");
        report.processed("Intro");
        report.skipped("Draft", "already has AudioLink");
        report.failed("Broken", "speech synthesis failed");
        report.note("3 pages in scope");

        assert_eq!(
            report.summary(),
            "narrate: 1 processed, 1 skipped, 1 failed\n  3 pages in scope\n  ✗ Broken: speech synthesis failed"
        );
        assert!(report.has_failures());
        assert_eq!(report.skipped_entries()[0].reason, "already has AudioLink");
    }
}
