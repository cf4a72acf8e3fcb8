use std::collections::HashSet;

use crate::domain::{ContactRow, Field};
use crate::observability::metrics;

use super::RowNormalizer;

/// Clears repeated values across the eight email/phone columns of one row.
///
/// Organization, website, description and city are never touched.
#[derive(Debug, Default, Clone, Copy)]
pub struct FieldDeduplicator;

impl FieldDeduplicator {
    /// Returns the cleaned row and how many cells were cleared.
    pub fn dedupe(&self, mut row: ContactRow) -> (ContactRow, usize) {
        let mut seen: HashSet<String> = HashSet::new();
        let mut cleared = 0;

        for field in Field::CONTACT_CHANNELS {
            let value = row.get_mut(field);
            let trimmed = value.trim();
            if trimmed.is_empty() {
                continue;
            }

            if seen.insert(trimmed.to_lowercase()) {
                *value = trimmed.to_string();
            } else {
                value.clear();
                cleared += 1;
            }
        }

        (row, cleared)
    }
}

impl RowNormalizer for FieldDeduplicator {
    fn name(&self) -> &'static str {
        "field_dedup"
    }

    fn normalize(&self, row: ContactRow) -> ContactRow {
        let (row, cleared) = self.dedupe(row);
        metrics::dedup::fields_cleared(cleared);
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_repeat_is_cleared_first_kept_trimmed() {
        let row = ContactRow {
            primary_email: " Jo@Acme.com ".to_string(),
            email2: "jo@acme.com".to_string(),
            personal_email: "JO@ACME.COM".to_string(),
            ..ContactRow::default()
        };

        let (row, cleared) = FieldDeduplicator.dedupe(row);
        assert_eq!(row.primary_email, "Jo@Acme.com");
        assert_eq!(row.email2, "");
        assert_eq!(row.personal_email, "");
        assert_eq!(cleared, 2);
    }

    #[test]
    fn test_dedup_spans_email_and_phone_columns() {
        let row = ContactRow {
            personal_email: "555-0100".to_string(),
            contact_mobile: "555-0100".to_string(),
            ..ContactRow::default()
        };
        let (row, _) = FieldDeduplicator.dedupe(row);
        assert_eq!(row.personal_email, "555-0100");
        assert_eq!(row.contact_mobile, "");
    }

    #[test]
    fn test_business_columns_are_untouched() {
        let row = ContactRow {
            organization: "Acme".to_string(),
            website: "acme".to_string(),
            description: "acme".to_string(),
            city: "acme".to_string(),
            email1: "acme".to_string(),
            ..ContactRow::default()
        };
        let (row, cleared) = FieldDeduplicator.dedupe(row);
        assert_eq!(cleared, 0);
        assert_eq!(row.organization, "Acme");
        assert_eq!(row.website, "acme");
        assert_eq!(row.description, "acme");
        assert_eq!(row.city, "acme");
        assert_eq!(row.email1, "acme");
    }

    #[test]
    fn test_whitespace_values_never_match() {
        let row = ContactRow {
            primary_email: "   ".to_string(),
            email1: " ".to_string(),
            ..ContactRow::default()
        };
        let (row, cleared) = FieldDeduplicator.dedupe(row);
        assert_eq!(cleared, 0);
        assert_eq!(row.primary_email, "   ");
        assert_eq!(row.email1, " ");
    }
}
