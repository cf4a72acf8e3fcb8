use crate::domain::{ClassificationRow, ContactRow, Table};
use crate::error::Result;

/// Supplies one input table, header row first.
pub trait TableSource {
    fn read_table(&self) -> Result<Table>;
}

/// Receives the full set of cleaned rows once cleaning has succeeded.
pub trait CleanedRowSink {
    fn write_cleaned(&self, rows: &[ContactRow]) -> Result<()>;
}

/// Receives every classified row; implementations route rows by category.
pub trait ClassificationSink {
    fn write_classifications(&self, rows: &[ClassificationRow]) -> Result<()>;
}

/// Receives the cleaned rows and their classifications together, so a
/// combined run commits both outputs or neither.
pub trait RunSink {
    fn write_run(&self, cleaned: &[ContactRow], classified: &[ClassificationRow]) -> Result<()>;
}
