// Infrastructure adapters for the application ports

pub mod csv_store;

pub use csv_store::{CsvClassificationSink, CsvCleanedSink, CsvRunSink, CsvTableSource};
