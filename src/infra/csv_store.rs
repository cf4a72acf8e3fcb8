use std::fs;
use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, WriterBuilder};
use tracing::{debug, error, info, warn};

use crate::app::ports::{CleanedRowSink, ClassificationSink, RunSink, TableSource};
use crate::common::constants::{
    CLASSIFICATION_HEADERS, CLEANED_FILE, CLEANED_HEADERS, HVAC_FILE, NO_DESCRIPTION_FILE,
    OTHER_FILE,
};
use crate::domain::{Category, ClassificationRow, ContactRow, Table};
use crate::error::Result;

/// Output file name for one classification partition
pub fn category_file(category: Category) -> &'static str {
    match category {
        Category::Hvac => HVAC_FILE,
        Category::Other => OTHER_FILE,
        Category::NoDescription => NO_DESCRIPTION_FILE,
    }
}

/// Reads a CSV file with a header row. Rows may be shorter than the header.
pub struct CsvTableSource {
    path: PathBuf,
}

impl CsvTableSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TableSource for CsvTableSource {
    fn read_table(&self) -> Result<Table> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(&self.path)?;

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        let table = Table::new(headers, rows);
        info!(
            "Read {} rows from {}",
            table.rows.len(),
            self.path.display()
        );
        Ok(table)
    }
}

/// Sibling temp path used while a file is being written
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.tmp", name))
}

fn write_records<I>(path: &Path, headers: &[&str], records: I) -> Result<()>
where
    I: IntoIterator<Item = Vec<String>>,
{
    let mut writer = WriterBuilder::new().from_path(path)?;
    writer.write_record(headers)?;
    for record in records {
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

fn discard(temps: &[PathBuf]) {
    for temp in temps {
        if let Err(e) = fs::remove_file(temp) {
            warn!("Failed to remove temp file {}: {}", temp.display(), e);
        }
    }
}

/// Output files written to temp siblings, waiting to be renamed into place
/// together.
#[derive(Debug, Default)]
struct StagedFiles {
    files: Vec<(PathBuf, PathBuf)>,
}

impl StagedFiles {
    /// Write `records` to the temp sibling of `target`. On failure every file
    /// staged so far is discarded too.
    fn stage<I>(&mut self, target: PathBuf, headers: &[&str], records: I) -> Result<()>
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let temp = temp_path(&target);
        if let Err(e) = write_records(&temp, headers, records) {
            let mut temps: Vec<PathBuf> = self.files.drain(..).map(|(t, _)| t).collect();
            temps.push(temp);
            discard(&temps);
            return Err(e);
        }
        debug!("Staged {}", temp.display());
        self.files.push((temp, target));
        Ok(())
    }

    fn stage_cleaned(&mut self, target: PathBuf, rows: &[ContactRow]) -> Result<()> {
        self.stage(
            target,
            &CLEANED_HEADERS,
            rows.iter().map(ContactRow::to_cleaned_record),
        )
    }

    fn stage_partitions(&mut self, dir: &Path, rows: &[ClassificationRow]) -> Result<()> {
        for category in Category::ALL {
            let records = rows
                .iter()
                .filter(|r| r.result.category == category)
                .map(ClassificationRow::to_record);
            self.stage(dir.join(category_file(category)), &CLASSIFICATION_HEADERS, records)?;
        }
        Ok(())
    }

    /// Rename every staged file into place in staging order. If a rename
    /// fails, the temps not yet renamed are removed and the targets already
    /// replaced are logged.
    fn commit(self) -> Result<()> {
        let mut committed: Vec<String> = Vec::new();
        let mut pending = self.files.into_iter();
        while let Some((temp, target)) = pending.next() {
            if let Err(e) = fs::rename(&temp, &target) {
                let mut temps = vec![temp];
                temps.extend(pending.by_ref().map(|(t, _)| t));
                discard(&temps);
                if !committed.is_empty() {
                    error!(
                        committed = ?committed,
                        "Output partially committed; failed to replace {}",
                        target.display()
                    );
                }
                return Err(e.into());
            }
            committed.push(target.display().to_string());
        }
        Ok(())
    }
}

/// Writes the cleaned table to one CSV file, replacing it atomically.
pub struct CsvCleanedSink {
    path: PathBuf,
}

impl CsvCleanedSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Sink writing `cleaned.csv` inside `dir`
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(dir.join(CLEANED_FILE))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CleanedRowSink for CsvCleanedSink {
    fn write_cleaned(&self, rows: &[ContactRow]) -> Result<()> {
        let mut staged = StagedFiles::default();
        staged.stage_cleaned(self.path.clone(), rows)?;
        staged.commit()?;
        info!("Wrote {} cleaned rows to {}", rows.len(), self.path.display());
        Ok(())
    }
}

/// Writes one CSV file per category into a directory. Every partition is
/// staged before any is renamed into place.
pub struct CsvClassificationSink {
    dir: PathBuf,
}

impl CsvClassificationSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, category: Category) -> PathBuf {
        self.dir.join(category_file(category))
    }
}

impl ClassificationSink for CsvClassificationSink {
    fn write_classifications(&self, rows: &[ClassificationRow]) -> Result<()> {
        let mut staged = StagedFiles::default();
        staged.stage_partitions(&self.dir, rows)?;
        staged.commit()?;
        info!(
            "Wrote {} classified rows to {}",
            rows.len(),
            self.dir.display()
        );
        Ok(())
    }
}

/// Writes `cleaned.csv` and the three category files into one directory.
/// All four are staged before any is renamed into place.
pub struct CsvRunSink {
    dir: PathBuf,
}

impl CsvRunSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl RunSink for CsvRunSink {
    fn write_run(&self, cleaned: &[ContactRow], classified: &[ClassificationRow]) -> Result<()> {
        let mut staged = StagedFiles::default();
        staged.stage_cleaned(self.dir.join(CLEANED_FILE), cleaned)?;
        staged.stage_partitions(&self.dir, classified)?;
        staged.commit()?;
        info!(
            cleaned = cleaned.len(),
            classified = classified.len(),
            "Wrote run output to {}",
            self.dir.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ClassificationResult, Confidence};
    use tempfile::TempDir;

    #[test]
    fn test_reads_short_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("input.csv");
        fs::write(&path, "Organization,Company Description,Website\nAcme Air,\"Heating, cooling\"\nBare Co\n").unwrap();

        let table = CsvTableSource::new(&path).read_table().unwrap();
        assert_eq!(table.headers, vec!["Organization", "Company Description", "Website"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Acme Air", "Heating, cooling"]);
        assert_eq!(table.rows[1], vec!["Bare Co"]);
    }

    #[test]
    fn test_missing_input_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(CsvTableSource::new(dir.path().join("nope.csv")).read_table().is_err());
    }

    #[test]
    fn test_cleaned_sink_writes_header_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let sink = CsvCleanedSink::in_dir(dir.path());
        sink.write_cleaned(&[ContactRow {
            full_name: "Ada Lovelace".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            ..ContactRow::default()
        }])
        .unwrap();

        let written = fs::read_to_string(sink.path()).unwrap();
        let mut lines = written.lines();
        assert!(lines.next().unwrap().starts_with("Contact Full Name,First Name,Last Name"));
        assert!(lines.next().unwrap().starts_with("Ada Lovelace,Ada,Lovelace"));
        assert!(!temp_path(sink.path()).exists());
    }

    #[test]
    fn test_classification_sink_writes_every_partition() {
        let dir = TempDir::new().unwrap();
        let sink = CsvClassificationSink::new(dir.path());
        let row = ClassificationRow::new(
            ContactRow {
                organization: "Polar Air".to_string(),
                ..ContactRow::default()
            },
            ClassificationResult {
                category: Category::Hvac,
                reason: "HVAC keywords: hvac".to_string(),
                confidence: Confidence::High,
                score: 5.0,
                source_row: 2,
            },
        );
        sink.write_classifications(&[row]).unwrap();

        let hvac = fs::read_to_string(sink.path_for(Category::Hvac)).unwrap();
        assert_eq!(hvac.lines().count(), 2);
        assert!(hvac.lines().nth(1).unwrap().ends_with("HVAC keywords: hvac,High,5.0,2,FALSE"));

        for category in [Category::Other, Category::NoDescription] {
            let body = fs::read_to_string(sink.path_for(category)).unwrap();
            assert_eq!(body.lines().count(), 1);
        }
    }

    fn hvac_row() -> ClassificationRow {
        ClassificationRow::new(
            ContactRow {
                organization: "Polar Air".to_string(),
                ..ContactRow::default()
            },
            ClassificationResult {
                category: Category::Hvac,
                reason: "HVAC keywords: hvac".to_string(),
                confidence: Confidence::High,
                score: 5.0,
                source_row: 2,
            },
        )
    }

    fn leftover_temps(dir: &Path) -> Vec<String> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .filter(|name| name.ends_with(".tmp"))
            .collect()
    }

    #[test]
    fn test_failed_rename_removes_remaining_temps() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory cannot be replaced by a file
        let blocked = dir.path().join(category_file(Category::Other));
        fs::create_dir(&blocked).unwrap();
        fs::write(blocked.join("keep"), "x").unwrap();

        let sink = CsvClassificationSink::new(dir.path());
        assert!(sink.write_classifications(&[hvac_row()]).is_err());

        assert!(sink.path_for(Category::Hvac).is_file());
        assert!(blocked.is_dir());
        assert!(!sink.path_for(Category::NoDescription).exists());
        assert!(leftover_temps(dir.path()).is_empty());
    }

    #[test]
    fn test_run_sink_writes_all_four_files() {
        let dir = TempDir::new().unwrap();
        let contact = ContactRow {
            full_name: "Kim Lee".to_string(),
            ..ContactRow::default()
        };
        CsvRunSink::new(dir.path())
            .write_run(&[contact], &[hvac_row()])
            .unwrap();

        let cleaned = fs::read_to_string(dir.path().join(CLEANED_FILE)).unwrap();
        assert_eq!(cleaned.lines().count(), 2);
        for category in Category::ALL {
            assert!(dir.path().join(category_file(category)).is_file());
        }
        assert!(leftover_temps(dir.path()).is_empty());
    }

    #[test]
    fn test_run_sink_staging_failure_commits_nothing() {
        let dir = TempDir::new().unwrap();
        // Occupy the temp path of one partition so staging it fails
        fs::create_dir(temp_path(&dir.path().join(category_file(Category::Other)))).unwrap();

        let result = CsvRunSink::new(dir.path()).write_run(&[ContactRow::default()], &[hvac_row()]);
        assert!(result.is_err());

        assert!(!dir.path().join(CLEANED_FILE).exists());
        for category in Category::ALL {
            assert!(!dir.path().join(category_file(category)).exists());
        }
    }

    #[test]
    fn test_classification_sink_missing_dir_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let sink = CsvClassificationSink::new(dir.path().join("absent"));
        assert!(sink.write_classifications(&[]).is_err());
        assert!(!sink.path_for(Category::Hvac).exists());
    }
}
