use std::collections::BTreeMap;

use tracing::debug;

use crate::config::ColumnConfig;
use crate::domain::{ContactRow, Field, Table};
use crate::error::{PipelineError, Result};

/// Columns the cleaning pipeline cannot run without
pub const CLEAN_REQUIRED: [Field; 11] = [
    Field::FullName,
    Field::CompanyNameCleaned,
    Field::Website,
    Field::PrimaryEmail,
    Field::Email1,
    Field::Email2,
    Field::PersonalEmail,
    Field::ContactPhone1,
    Field::CompanyPhone1,
    Field::CompanyPhone2,
    Field::ContactMobile,
];

/// Columns the classifier cannot run without
pub const CLASSIFY_REQUIRED: [Field; 2] = [Field::Organization, Field::Description];

/// Header comparison key: lowercase with all whitespace removed.
pub fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Maps canonical fields to positions in an arbitrary input header.
pub struct ColumnResolver<'a> {
    columns: &'a ColumnConfig,
}

impl<'a> ColumnResolver<'a> {
    pub fn new(columns: &'a ColumnConfig) -> Self {
        Self { columns }
    }

    /// Resolve every known field present in `headers`, failing if any of
    /// `required` is absent. Runs before any row is touched.
    pub fn resolve(&self, headers: &[String], required: &[Field]) -> Result<ResolvedSchema> {
        let normalized: Vec<String> = headers.iter().map(|h| normalize_header(h)).collect();
        let mut positions = BTreeMap::new();

        for field in Field::ALL {
            let found = self
                .columns
                .aliases_for(field)
                .iter()
                .map(|alias| normalize_header(alias))
                .find_map(|alias| normalized.iter().position(|h| *h == alias));
            if let Some(index) = found {
                debug!("Resolved '{}' to column {}", field, index);
                positions.insert(field, index);
            }
        }

        for field in required {
            if !positions.contains_key(field) {
                return Err(PipelineError::MissingRequiredColumn {
                    column: field.header().to_string(),
                    available: headers.to_vec(),
                });
            }
        }

        Ok(ResolvedSchema {
            positions,
            width: headers.len(),
        })
    }
}

/// Stable field-to-column mapping for one input table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSchema {
    positions: BTreeMap<Field, usize>,
    width: usize,
}

impl ResolvedSchema {
    pub fn position(&self, field: Field) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    pub fn has(&self, field: Field) -> bool {
        self.positions.contains_key(&field)
    }

    /// Build a typed row from raw cells. Short rows read as empty cells; blank
    /// cells past the header width (a trailing delimiter) are ignored.
    pub fn row_from_cells(&self, cells: &[String], source_row: usize) -> Result<ContactRow> {
        let overflow = cells.get(self.width..).unwrap_or_default();
        if overflow.iter().any(|cell| !cell.trim().is_empty()) {
            return Err(PipelineError::RaggedRow {
                row: source_row,
                expected: self.width,
                found: cells.len(),
            });
        }
        if !overflow.is_empty() {
            debug!(row = source_row, extra = overflow.len(), "Ignoring blank trailing cells");
        }

        let mut row = ContactRow {
            source_row,
            ..ContactRow::default()
        };
        for (field, index) in &self.positions {
            if let Some(value) = cells.get(*index) {
                row.set(*field, value.as_str());
            }
        }

        // Organization and the cleaned company name stand in for each other
        if !self.has(Field::Organization) {
            row.organization = row.company_name_cleaned.clone();
        }
        if !self.has(Field::CompanyNameCleaned) {
            row.company_name_cleaned = row.organization.clone();
        }

        Ok(row)
    }

    /// Typed rows for every data row of `table`, in input order.
    pub fn rows(&self, table: &Table) -> Result<Vec<ContactRow>> {
        table
            .rows
            .iter()
            .enumerate()
            .map(|(i, cells)| self.row_from_cells(cells, Table::row_number(i)))
            .collect()
    }
}
