use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use crate::app::ports::{CleanedRowSink, ClassificationSink, RunSink, TableSource};
use crate::domain::{Category, ClassificationRow, ContactRow, Table};
use crate::error::Result;

/// In-memory table store for tests and embedding. Clones share state, so a
/// handle kept by the caller sees what a boxed clone wrote.
#[derive(Clone, Default)]
pub struct InMemoryTableStore {
    input: Arc<Mutex<Table>>,
    cleaned: Arc<Mutex<Vec<ContactRow>>>,
    classified: Arc<Mutex<BTreeMap<Category, Vec<ClassificationRow>>>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl InMemoryTableStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: Table) -> Self {
        let store = Self::new();
        *lock(&store.input) = table;
        store
    }

    pub fn cleaned_rows(&self) -> Vec<ContactRow> {
        lock(&self.cleaned).clone()
    }

    pub fn classified_rows(&self, category: Category) -> Vec<ClassificationRow> {
        lock(&self.classified)
            .get(&category)
            .cloned()
            .unwrap_or_default()
    }

    pub fn classified_count(&self) -> usize {
        lock(&self.classified).values().map(Vec::len).sum()
    }
}

impl TableSource for InMemoryTableStore {
    fn read_table(&self) -> Result<Table> {
        Ok(lock(&self.input).clone())
    }
}

impl CleanedRowSink for InMemoryTableStore {
    fn write_cleaned(&self, rows: &[ContactRow]) -> Result<()> {
        debug!("Storing {} cleaned rows in memory", rows.len());
        *lock(&self.cleaned) = rows.to_vec();
        Ok(())
    }
}

impl ClassificationSink for InMemoryTableStore {
    fn write_classifications(&self, rows: &[ClassificationRow]) -> Result<()> {
        let mut by_category: BTreeMap<Category, Vec<ClassificationRow>> =
            Category::ALL.iter().map(|c| (*c, Vec::new())).collect();
        for row in rows {
            by_category
                .entry(row.result.category)
                .or_default()
                .push(row.clone());
        }
        debug!("Storing {} classified rows in memory", rows.len());
        *lock(&self.classified) = by_category;
        Ok(())
    }
}

impl RunSink for InMemoryTableStore {
    fn write_run(&self, cleaned: &[ContactRow], classified: &[ClassificationRow]) -> Result<()> {
        self.write_cleaned(cleaned)?;
        self.write_classifications(classified)
    }
}
