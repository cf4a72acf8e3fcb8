//! Metrics for the cleaning and classification pipeline
//!
//! Recording goes through the `metrics` facade, so these calls are no-ops
//! until a recorder is installed with [`init`].

use std::fmt;

use metrics::counter;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use tracing::info;

use crate::domain::Category;

/// Enum representing all metric names used in the system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricName {
    // Ingest metrics
    IngestRowsRead,
    IngestRowsSkippedEmpty,

    // Dedup metrics
    DedupRowsDropped,
    DedupFieldsCleared,

    // Normalize metrics
    NormalizeRowsProcessed,
    NormalizeEmailsCollapsed,
    NormalizePhonesCleared,

    // Classify metrics
    ClassifyRowsClassified,
}

impl MetricName {
    pub fn as_str(&self) -> &'static str {
        match self {
            MetricName::IngestRowsRead => "lead_cleaner_ingest_rows_read_total",
            MetricName::IngestRowsSkippedEmpty => "lead_cleaner_ingest_rows_skipped_empty_total",
            MetricName::DedupRowsDropped => "lead_cleaner_dedup_rows_dropped_total",
            MetricName::DedupFieldsCleared => "lead_cleaner_dedup_fields_cleared_total",
            MetricName::NormalizeRowsProcessed => "lead_cleaner_normalize_rows_processed_total",
            MetricName::NormalizeEmailsCollapsed => "lead_cleaner_normalize_emails_collapsed_total",
            MetricName::NormalizePhonesCleared => "lead_cleaner_normalize_phones_cleared_total",
            MetricName::ClassifyRowsClassified => "lead_cleaner_classify_rows_classified_total",
        }
    }

    pub fn all_metrics() -> impl Iterator<Item = MetricName> {
        use MetricName::*;
        [
            IngestRowsRead,
            IngestRowsSkippedEmpty,
            DedupRowsDropped,
            DedupFieldsCleared,
            NormalizeRowsProcessed,
            NormalizeEmailsCollapsed,
            NormalizePhonesCleared,
            ClassifyRowsClassified,
        ]
        .into_iter()
    }
}

impl fmt::Display for MetricName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Install the Prometheus recorder. The returned handle renders the text
/// exposition on demand; no HTTP listener is started.
pub fn init() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install Prometheus recorder: {}", e))?;
    info!("Metrics recorder installed");
    Ok(handle)
}

pub mod ingest {
    use super::*;

    pub fn rows_read(count: usize) {
        counter!(MetricName::IngestRowsRead.as_str()).increment(count as u64);
    }

    pub fn row_skipped_empty() {
        counter!(MetricName::IngestRowsSkippedEmpty.as_str()).increment(1);
    }
}

pub mod dedup {
    use super::*;

    pub fn row_dropped() {
        counter!(MetricName::DedupRowsDropped.as_str()).increment(1);
    }

    pub fn fields_cleared(count: usize) {
        if count > 0 {
            counter!(MetricName::DedupFieldsCleared.as_str()).increment(count as u64);
        }
    }
}

pub mod normalize {
    use super::*;

    pub fn row_normalized() {
        counter!(MetricName::NormalizeRowsProcessed.as_str()).increment(1);
    }

    pub fn email_collapsed() {
        counter!(MetricName::NormalizeEmailsCollapsed.as_str()).increment(1);
    }

    pub fn phone_cleared() {
        counter!(MetricName::NormalizePhonesCleared.as_str()).increment(1);
    }
}

pub mod classify {
    use super::*;

    pub fn classified(category: Category) {
        counter!(MetricName::ClassifyRowsClassified.as_str(), "category" => category.as_str())
            .increment(1);
    }
}
