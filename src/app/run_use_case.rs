use tracing::{info, instrument};

use crate::app::ports::{RunSink, TableSource};
use crate::config::AppConfig;
use crate::domain::Table;
use crate::error::Result;
use crate::pipeline::{ClassifyOutcome, CleanOutcome, Pipeline};

/// Both halves of a combined clean-then-classify run
#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub cleaned: CleanOutcome,
    pub classified: ClassifyOutcome,
}

/// Use case for cleaning a table and classifying the cleaned rows in one
/// pass. Nothing reaches the sink until both stages have succeeded.
pub struct RunUseCase<'a> {
    pipeline: Pipeline<'a>,
    output: Box<dyn RunSink + 'a>,
}

impl<'a> RunUseCase<'a> {
    pub fn new(config: &'a AppConfig, output: Box<dyn RunSink + 'a>) -> Self {
        Self {
            pipeline: Pipeline::new(config),
            output,
        }
    }

    #[instrument(skip_all)]
    pub fn run(&self, source: &dyn TableSource) -> Result<RunOutcome> {
        let table = source.read_table()?;
        self.run_table(&table)
    }

    /// Classification reads the cleaned rows back in the cleaned output
    /// layout, so its row numbers point into the cleaned table.
    pub fn run_table(&self, table: &Table) -> Result<RunOutcome> {
        let cleaned = self.pipeline.clean(table)?;
        let classified = self.pipeline.classify(&cleaned.to_table())?;
        self.output.write_run(&cleaned.rows, &classified.rows)?;

        info!(
            rows_read = cleaned.rows_read,
            rows_deduplicated = cleaned.duplicate_rows.len(),
            rows_written = classified.rows.len(),
            "Run complete"
        );
        Ok(RunOutcome {
            cleaned,
            classified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants as c;
    use crate::domain::{Category, ClassificationRow, ContactRow};
    use crate::error::PipelineError;
    use crate::pipeline::storage::InMemoryTableStore;

    const HEADERS: [&str; 12] = [
        c::CONTACT_FULL_NAME,
        c::COMPANY_NAME_CLEANED,
        c::WEBSITE,
        c::PRIMARY_EMAIL,
        c::EMAIL_1,
        c::EMAIL_2,
        c::PERSONAL_EMAIL,
        c::CONTACT_PHONE_1,
        c::COMPANY_PHONE_1,
        c::COMPANY_PHONE_2,
        c::CONTACT_MOBILE_PHONE,
        c::COMPANY_DESCRIPTION,
    ];

    fn table(rows: &[&[&str]]) -> Table {
        Table::new(
            HEADERS.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    #[test]
    fn test_run_writes_both_outputs() {
        let config = AppConfig::default();
        let store = InMemoryTableStore::with_table(table(&[
            &["Kim Lee", "Polar Air", "polarair.net", "", "", "", "", "", "", "", "", "furnace and boiler service"],
            &["Kim Lee", "Polar Air", "polarair.net", "", "", "", "", "", "", "", "", "furnace and boiler service"],
            &["Pat Pipe", "Pipe Pros", "pipepros.com", "", "", "", "", "", "", "", "", "licensed plumbing contractor"],
        ]));

        let outcome = RunUseCase::new(&config, Box::new(store.clone()))
            .run(&store)
            .unwrap();

        assert_eq!(outcome.cleaned.duplicate_rows, vec![3]);
        assert_eq!(store.cleaned_rows().len(), 2);
        assert_eq!(store.classified_rows(Category::Hvac).len(), 1);
        let other = store.classified_rows(Category::Other);
        assert_eq!(other.len(), 1);
        assert_eq!(other[0].result.source_row, 3);
    }

    struct FailingSink;

    impl RunSink for FailingSink {
        fn write_run(&self, _: &[ContactRow], _: &[ClassificationRow]) -> Result<()> {
            Err(PipelineError::Config("disk full".to_string()))
        }
    }

    #[test]
    fn test_sink_failure_is_returned() {
        let config = AppConfig::default();
        let result = RunUseCase::new(&config, Box::new(FailingSink))
            .run_table(&table(&[&["Kim Lee", "Polar Air", "polarair.net"]]));
        assert!(result.is_err());
    }

    #[test]
    fn test_missing_column_writes_nothing() {
        let config = AppConfig::default();
        let store = InMemoryTableStore::with_table(Table::new(
            HEADERS[..5].iter().map(|s| s.to_string()).collect(),
            vec![vec!["Kim Lee".to_string()]],
        ));

        let err = RunUseCase::new(&config, Box::new(store.clone()))
            .run(&store)
            .unwrap_err();
        assert!(matches!(err, PipelineError::MissingRequiredColumn { .. }));
        assert!(store.cleaned_rows().is_empty());
        assert_eq!(store.classified_count(), 0);
    }
}
