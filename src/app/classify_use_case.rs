use tracing::{info, instrument};

use crate::app::ports::{ClassificationSink, TableSource};
use crate::config::AppConfig;
use crate::domain::{Category, Table};
use crate::error::Result;
use crate::pipeline::processing::classify::Classifier;
use crate::pipeline::{ClassifyOutcome, Pipeline};

/// Use case for classifying one contact table into per-category partitions
pub struct ClassifyUseCase<'a> {
    pipeline: Pipeline<'a>,
    output: Box<dyn ClassificationSink + 'a>,
}

impl<'a> ClassifyUseCase<'a> {
    /// Create a use case with the rule-based classifier built from `config`
    pub fn new(config: &'a AppConfig, output: Box<dyn ClassificationSink + 'a>) -> Self {
        Self {
            pipeline: Pipeline::new(config),
            output,
        }
    }

    pub fn with_classifier(
        config: &'a AppConfig,
        classifier: Box<dyn Classifier + 'a>,
        output: Box<dyn ClassificationSink + 'a>,
    ) -> Self {
        Self {
            pipeline: Pipeline::with_classifier(config, classifier),
            output,
        }
    }

    #[instrument(skip_all)]
    pub fn run(&self, source: &dyn TableSource) -> Result<ClassifyOutcome> {
        let table = source.read_table()?;
        self.classify_table(&table)
    }

    /// Classify every row, then hand the complete set to the sink.
    pub fn classify_table(&self, table: &Table) -> Result<ClassifyOutcome> {
        let outcome = self.pipeline.classify(table)?;
        self.output.write_classifications(&outcome.rows)?;

        let counts = outcome.counts_by_category();
        info!(
            rows_read = outcome.rows_read,
            rows_skipped_empty = outcome.rows_skipped_empty,
            hvac = counts[&Category::Hvac],
            other = counts[&Category::Other],
            no_description = counts[&Category::NoDescription],
            "Classification complete"
        );
        Ok(outcome)
    }
}
