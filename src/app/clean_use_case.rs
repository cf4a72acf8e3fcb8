use tracing::{info, instrument};

use crate::app::ports::{CleanedRowSink, TableSource};
use crate::config::AppConfig;
use crate::domain::Table;
use crate::error::Result;
use crate::pipeline::{CleanOutcome, Pipeline};

/// Use case for cleaning one contact table into its sink
pub struct CleanUseCase<'a> {
    pipeline: Pipeline<'a>,
    output: Box<dyn CleanedRowSink + 'a>,
}

impl<'a> CleanUseCase<'a> {
    pub fn new(config: &'a AppConfig, output: Box<dyn CleanedRowSink + 'a>) -> Self {
        Self {
            pipeline: Pipeline::new(config),
            output,
        }
    }

    /// Read, clean, and write. The sink only sees rows once the whole table
    /// has been cleaned, so a header failure writes nothing.
    #[instrument(skip_all)]
    pub fn run(&self, source: &dyn TableSource) -> Result<CleanOutcome> {
        let table = source.read_table()?;
        self.clean_table(&table)
    }

    pub fn clean_table(&self, table: &Table) -> Result<CleanOutcome> {
        let outcome = self.pipeline.clean(table)?;
        self.output.write_cleaned(&outcome.rows)?;

        info!(
            rows_read = outcome.rows_read,
            rows_skipped_empty = outcome.rows_skipped_empty,
            rows_deduplicated = outcome.duplicate_rows.len(),
            rows_written = outcome.rows.len(),
            "Cleaning complete"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::constants as c;
    use crate::error::PipelineError;
    use crate::pipeline::storage::InMemoryTableStore;

    fn table(headers: &[&str], rows: &[&[&str]]) -> Table {
        Table::new(
            headers.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
    }

    const HEADERS: [&str; 11] = [
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
    ];

    #[test]
    fn test_run_writes_cleaned_rows() {
        let config = AppConfig::default();
        let store = InMemoryTableStore::with_table(table(
            &HEADERS,
            &[
                &["Jo Ann Smith", "Smith HVAC", "smithhvac.com", "", "jo@smithhvac.com"],
                &["Jo Ann Smith", "Smith HVAC", "smithhvac.com", "dup@smithhvac.com"],
            ],
        ));

        let use_case = CleanUseCase::new(&config, Box::new(store.clone()));
        let outcome = use_case.run(&store).unwrap();

        assert_eq!(outcome.duplicate_rows, vec![3]);
        let rows = store.cleaned_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].primary_email, "jo@smithhvac.com");
        assert_eq!(rows[0].email1, "");
        assert_eq!(rows[0].first_name, "Jo");
        assert_eq!(rows[0].last_name, "Ann Smith");
    }

    #[test]
    fn test_missing_column_writes_nothing() {
        let config = AppConfig::default();
        let store = InMemoryTableStore::with_table(table(
            &HEADERS[..10],
            &[&["Jo Ann Smith", "Smith HVAC"]],
        ));
        let use_case = CleanUseCase::new(&config, Box::new(store.clone()));

        let err = use_case.run(&store).unwrap_err();
        assert!(matches!(err, PipelineError::MissingRequiredColumn { .. }));
        assert!(store.cleaned_rows().is_empty());
    }
}
