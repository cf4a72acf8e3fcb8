use tracing::trace;

use crate::domain::ContactRow;
use crate::observability::metrics;

pub mod email;
pub mod field_dedup;
pub mod name;
pub mod phone;

pub use email::{EmailCollapse, EmailMerger};
pub use field_dedup::FieldDeduplicator;
pub use name::{split_name, NameSplitter};
pub use phone::{digits_only, strip_dots, PhoneMerger};

/// A per-row normalization stage. Stages take the row by value and hand back
/// the new row state; nothing is shared between rows.
pub trait RowNormalizer {
    fn name(&self) -> &'static str;

    fn normalize(&self, row: ContactRow) -> ContactRow;
}

/// Ordered list of row stages applied after row-level dedup
pub struct NormalizerChain {
    stages: Vec<Box<dyn RowNormalizer>>,
}

impl NormalizerChain {
    /// Field dedup, email merge, phone merge, name split, in that order.
    pub fn new() -> Self {
        Self {
            stages: vec![
                Box::new(FieldDeduplicator),
                Box::new(EmailMerger),
                Box::new(PhoneMerger),
                Box::new(NameSplitter),
            ],
        }
    }

    pub fn with_stages(stages: Vec<Box<dyn RowNormalizer>>) -> Self {
        Self { stages }
    }

    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }

    pub fn normalize(&self, row: ContactRow) -> ContactRow {
        let source_row = row.source_row;
        let row = self.stages.iter().fold(row, |row, stage| {
            trace!(row = source_row, stage = stage.name(), "Applying stage");
            stage.normalize(row)
        });
        metrics::normalize::row_normalized();
        row
    }
}

impl Default for NormalizerChain {
    fn default() -> Self {
        Self::new()
    }
}
