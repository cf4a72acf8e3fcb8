use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::Category;
use crate::pipeline::{ClassifyOutcome, CleanOutcome};

/// End-of-run report. Timing is stamped by the caller; the pipeline core
/// never reads a clock.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub rows_read: usize,
    pub rows_skipped_empty: usize,
    pub rows_deduplicated: usize,
    pub rows_written: usize,
    /// Classified row counts keyed by category label; empty for clean-only runs
    pub categories: BTreeMap<String, usize>,
    pub duration_ms: u64,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunSummary {
    pub fn from_clean(outcome: &CleanOutcome) -> Self {
        Self {
            rows_read: outcome.rows_read,
            rows_skipped_empty: outcome.rows_skipped_empty,
            rows_deduplicated: outcome.duplicate_rows.len(),
            rows_written: outcome.rows.len(),
            ..Self::default()
        }
    }

    pub fn from_classify(outcome: &ClassifyOutcome) -> Self {
        Self {
            rows_read: outcome.rows_read,
            rows_skipped_empty: outcome.rows_skipped_empty,
            rows_written: outcome.rows.len(),
            categories: category_counts(outcome),
            ..Self::default()
        }
    }

    /// Summary of a clean-then-classify run. Input counts come from the
    /// cleaning pass; written rows are the classified ones.
    pub fn from_run(clean: &CleanOutcome, classify: &ClassifyOutcome) -> Self {
        Self {
            rows_read: clean.rows_read,
            rows_skipped_empty: clean.rows_skipped_empty + classify.rows_skipped_empty,
            rows_deduplicated: clean.duplicate_rows.len(),
            rows_written: classify.rows.len(),
            categories: category_counts(classify),
            ..Self::default()
        }
    }

    pub fn finish(mut self, elapsed: Duration, finished_at: DateTime<Utc>) -> Self {
        self.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.finished_at = Some(finished_at);
        self
    }
}

fn category_counts(outcome: &ClassifyOutcome) -> BTreeMap<String, usize> {
    outcome
        .counts_by_category()
        .into_iter()
        .map(|(category, count): (Category, usize)| (category.as_str().to_string(), count))
        .collect()
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<22}{}", "Rows read:", self.rows_read)?;
        writeln!(f, "{:<22}{}", "Empty rows skipped:", self.rows_skipped_empty)?;
        writeln!(f, "{:<22}{}", "Duplicate rows:", self.rows_deduplicated)?;
        writeln!(f, "{:<22}{}", "Rows written:", self.rows_written)?;
        for (category, count) in &self.categories {
            writeln!(f, "  {:<20}{}", format!("{}:", category), count)?;
        }
        write!(f, "{:<22}{} ms", "Duration:", self.duration_ms)?;
        if let Some(at) = self.finished_at {
            write!(f, "\n{:<22}{}", "Finished at:", at.to_rfc3339())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_clean_summary_has_no_categories() {
        let outcome = CleanOutcome {
            rows: vec![Default::default(), Default::default()],
            rows_read: 5,
            rows_skipped_empty: 1,
            duplicate_rows: vec![3, 6],
        };
        let summary = RunSummary::from_clean(&outcome);
        assert_eq!(summary.rows_read, 5);
        assert_eq!(summary.rows_deduplicated, 2);
        assert_eq!(summary.rows_written, 2);
        assert!(summary.categories.is_empty());
    }

    #[test]
    fn test_finish_serializes_timing() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let summary = RunSummary::default().finish(Duration::from_millis(1500), at);
        let json = serde_json::to_value(&summary).unwrap();

        assert_eq!(json["duration_ms"], 1500);
        assert_eq!(json["finished_at"], "2024-03-01T12:00:00Z");
        assert!(summary.to_string().contains("1500 ms"));
    }
}
