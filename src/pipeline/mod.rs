// Contact pipeline: ingestion, processing, and storage

pub mod ingestion;
pub mod processing;
pub mod storage;

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::common::constants::CLEANED_HEADERS;
use crate::config::AppConfig;
use crate::domain::{Category, ClassificationRow, ContactRow, Field, Table};
use crate::error::Result;
use crate::observability::metrics;
use ingestion::{ColumnResolver, CLASSIFY_REQUIRED, CLEAN_REQUIRED};
use processing::classify::{Classifier, RuleBasedClassifier};
use processing::dedup::dedupe_rows;
use processing::normalize::NormalizerChain;

/// Result of a cleaning run
#[derive(Debug, Clone, Default, Serialize)]
pub struct CleanOutcome {
    #[serde(skip)]
    pub rows: Vec<ContactRow>,
    pub rows_read: usize,
    pub rows_skipped_empty: usize,
    /// Source row numbers dropped as composite-key duplicates
    pub duplicate_rows: Vec<usize>,
}

impl CleanOutcome {
    /// The cleaned rows as a table in the sixteen-column output layout. Rows
    /// read back from it are numbered by their position in this table.
    pub fn to_table(&self) -> Table {
        Table::new(
            CLEANED_HEADERS.iter().map(|h| h.to_string()).collect(),
            self.rows.iter().map(|r| r.to_cleaned_record()).collect(),
        )
    }
}

/// Result of a classification run
#[derive(Debug, Clone, Default, Serialize)]
pub struct ClassifyOutcome {
    #[serde(skip)]
    pub rows: Vec<ClassificationRow>,
    pub rows_read: usize,
    pub rows_skipped_empty: usize,
}

impl ClassifyOutcome {
    pub fn counts_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts: BTreeMap<Category, usize> =
            Category::ALL.iter().map(|c| (*c, 0)).collect();
        for row in &self.rows {
            *counts.entry(row.result.category).or_insert(0) += 1;
        }
        counts
    }
}

/// Pure, single-threaded batch transform over one input table. Holds only the
/// immutable configuration and the stages built from it.
pub struct Pipeline<'a> {
    config: &'a AppConfig,
    normalizer: NormalizerChain,
    classifier: Box<dyn Classifier + 'a>,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a AppConfig) -> Self {
        Self {
            config,
            normalizer: NormalizerChain::new(),
            classifier: Box::new(RuleBasedClassifier::new(&config.classifier)),
        }
    }

    pub fn with_classifier(config: &'a AppConfig, classifier: Box<dyn Classifier + 'a>) -> Self {
        Self {
            config,
            normalizer: NormalizerChain::new(),
            classifier,
        }
    }

    /// Resolve headers, drop empty rows, dedup rows, then run the per-row
    /// normalization chain. Header problems fail before any row is touched.
    #[instrument(skip_all, fields(rows = table.rows.len()))]
    pub fn clean(&self, table: &Table) -> Result<CleanOutcome> {
        let schema = ColumnResolver::new(&self.config.columns).resolve(&table.headers, &CLEAN_REQUIRED)?;
        let rows = schema.rows(table)?;
        let rows_read = rows.len();
        metrics::ingest::rows_read(rows_read);

        let (rows, rows_skipped_empty) =
            skip_empty(rows, &[Field::FullName, Field::Description]);

        let dedup = dedupe_rows(rows);
        info!(
            kept = dedup.rows.len(),
            dropped = dedup.dropped_rows.len(),
            "Row dedup complete"
        );

        let rows: Vec<ContactRow> = dedup
            .rows
            .into_iter()
            .map(|row| self.normalizer.normalize(row))
            .collect();

        Ok(CleanOutcome {
            rows,
            rows_read,
            rows_skipped_empty,
            duplicate_rows: dedup.dropped_rows,
        })
    }

    /// Classify every non-empty row of `table`. Each row gets exactly one
    /// verdict, independent of every other row.
    #[instrument(skip_all, fields(rows = table.rows.len()))]
    pub fn classify(&self, table: &Table) -> Result<ClassifyOutcome> {
        let schema = ColumnResolver::new(&self.config.columns).resolve(&table.headers, &CLASSIFY_REQUIRED)?;
        let rows = schema.rows(table)?;
        let rows_read = rows.len();
        metrics::ingest::rows_read(rows_read);

        let (rows, rows_skipped_empty) =
            skip_empty(rows, &[Field::Organization, Field::Description]);

        let rows: Vec<ClassificationRow> = rows
            .into_iter()
            .map(|row| {
                let result = self.classifier.classify(&row);
                debug!(
                    row = row.source_row,
                    category = %result.category,
                    confidence = %result.confidence,
                    score = result.score,
                    "Classified"
                );
                metrics::classify::classified(result.category);
                ClassificationRow::new(row, result)
            })
            .collect();

        Ok(ClassifyOutcome {
            rows,
            rows_read,
            rows_skipped_empty,
        })
    }
}

/// Split off rows whose identity-bearing `fields` are all blank.
fn skip_empty(rows: Vec<ContactRow>, fields: &[Field]) -> (Vec<ContactRow>, usize) {
    let before = rows.len();
    let kept: Vec<ContactRow> = rows
        .into_iter()
        .filter(|row| {
            let empty = fields.iter().all(|f| row.is_blank(*f));
            if empty {
                debug!(row = row.source_row, "Skipping empty row");
                metrics::ingest::row_skipped_empty();
            }
            !empty
        })
        .collect();
    let skipped = before - kept.len();
    (kept, skipped)
}
