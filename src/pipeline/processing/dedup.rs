use std::collections::HashSet;
use std::fmt;

use tracing::debug;

use crate::domain::ContactRow;
use crate::observability::metrics;

/// Identity of a contact row: `name|company|website`, each part trimmed and
/// lowercased. Blank parts are kept, so two rows missing the same parts still
/// collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CompositeKey(String);

impl CompositeKey {
    pub fn from_row(row: &ContactRow) -> Self {
        Self::from_parts(&row.full_name, &row.company_name_cleaned, &row.website)
    }

    pub fn from_parts(name: &str, company: &str, website: &str) -> Self {
        let key = [name, company, website]
            .iter()
            .map(|part| part.trim().to_lowercase())
            .collect::<Vec<_>>()
            .join("|");
        Self(key)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Surviving rows plus the source row numbers that were dropped
#[derive(Debug, Clone, Default)]
pub struct RowDedupOutcome {
    pub rows: Vec<ContactRow>,
    pub dropped_rows: Vec<usize>,
}

/// Drop every row whose composite key was already seen. Input order is kept
/// and the first occurrence wins; later duplicates are discarded, not merged.
pub fn dedupe_rows(rows: Vec<ContactRow>) -> RowDedupOutcome {
    let mut seen: HashSet<CompositeKey> = HashSet::with_capacity(rows.len());
    let mut outcome = RowDedupOutcome {
        rows: Vec::with_capacity(rows.len()),
        dropped_rows: Vec::new(),
    };

    for row in rows {
        let key = CompositeKey::from_row(&row);
        if seen.contains(&key) {
            debug!(row = row.source_row, key = %key, "Dropping duplicate row");
            metrics::dedup::row_dropped();
            outcome.dropped_rows.push(row.source_row);
        } else {
            seen.insert(key);
            outcome.rows.push(row);
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(source_row: usize, name: &str, company: &str, website: &str) -> ContactRow {
        ContactRow {
            source_row,
            full_name: name.to_string(),
            company_name_cleaned: company.to_string(),
            organization: company.to_string(),
            website: website.to_string(),
            ..ContactRow::default()
        }
    }

    #[test]
    fn test_composite_key_is_trimmed_and_lowercased() {
        let key = CompositeKey::from_parts("  David Gordon ", "Aspire Fine Homes", "ASPIRE.com ");
        assert_eq!(key.as_str(), "david gordon|aspire fine homes|aspire.com");
    }

    #[test]
    fn test_exact_repeat_is_dropped() {
        let rows = vec![
            contact(2, "David Gordon", "Aspire Fine Homes", "aspire.com"),
            contact(3, "David Gordon", "Aspire Fine Homes", "aspire.com"),
        ];
        let outcome = dedupe_rows(rows);
        assert_eq!(outcome.rows.len(), 1);
        assert_eq!(outcome.rows[0].source_row, 2);
        assert_eq!(outcome.dropped_rows, vec![3]);
    }

    #[test]
    fn test_different_organization_is_kept() {
        let rows = vec![
            contact(2, "David Gordon", "Aspire Fine Homes", "aspire.com"),
            contact(3, "David Gordon", "Whitestone Builders", "aspire.com"),
        ];
        let outcome = dedupe_rows(rows);
        assert_eq!(outcome.rows.len(), 2);
        assert!(outcome.dropped_rows.is_empty());
    }

    #[test]
    fn test_case_and_padding_do_not_defeat_dedup() {
        let rows = vec![
            contact(2, "David Gordon", "Aspire Fine Homes", "aspire.com"),
            contact(3, " DAVID GORDON", "aspire fine homes ", "Aspire.com"),
        ];
        assert_eq!(dedupe_rows(rows).rows.len(), 1);
    }

    #[test]
    fn test_partially_empty_keys_still_collide() {
        let rows = vec![
            contact(2, "", "Acme Air", ""),
            contact(3, "", "Acme Air", ""),
            contact(4, "", "", ""),
        ];
        let outcome = dedupe_rows(rows);
        assert_eq!(outcome.rows.len(), 2);
        assert_eq!(outcome.dropped_rows, vec![3]);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let rows = vec![
            contact(2, "A", "B", "c.com"),
            contact(3, "A", "B", "c.com"),
            contact(4, "X", "Y", "z.com"),
            contact(5, "A", "B", "c.com"),
        ];
        let first = dedupe_rows(rows);
        let second = dedupe_rows(first.rows.clone());
        assert!(second.dropped_rows.is_empty());
        assert_eq!(second.rows, first.rows);
    }
}
