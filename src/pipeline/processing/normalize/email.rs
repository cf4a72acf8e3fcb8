use crate::domain::{ContactRow, EmailSlot};
use crate::observability::metrics;

use super::RowNormalizer;

/// Which collapse rule fired for a row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmailCollapse {
    AllEqual,
    PrimaryMatchesEmail1,
    PrimaryMatchesEmail2,
    Email1MatchesEmail2,
    Distinct,
}

fn normalized(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Fills and collapses the primary/email1/email2 slots. The personal slot is
/// never compared and passes through unchanged.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmailMerger;

impl EmailMerger {
    /// Move email1 into an empty primary slot.
    pub fn fill_primary(&self, row: &mut ContactRow) -> bool {
        if row.primary_email.trim().is_empty() && !row.email1.trim().is_empty() {
            row.primary_email = std::mem::take(&mut row.email1);
            return true;
        }
        false
    }

    /// Collapse duplicates in the (primary, email1, email2) triple. A duplicate
    /// spanning primary and email1 keeps email1.
    pub fn collapse(&self, row: &mut ContactRow) -> EmailCollapse {
        let primary = normalized(&row.primary_email);
        let email1 = normalized(&row.email1);
        let email2 = normalized(&row.email2);

        let rule = if !primary.is_empty() && primary == email1 && email1 == email2 {
            EmailCollapse::AllEqual
        } else if !primary.is_empty() && primary == email1 {
            EmailCollapse::PrimaryMatchesEmail1
        } else if !primary.is_empty() && primary == email2 {
            EmailCollapse::PrimaryMatchesEmail2
        } else if !email1.is_empty() && email1 == email2 {
            EmailCollapse::Email1MatchesEmail2
        } else {
            EmailCollapse::Distinct
        };

        match rule {
            EmailCollapse::AllEqual => {
                row.get_mut(EmailSlot::Primary.field()).clear();
                row.get_mut(EmailSlot::Email2.field()).clear();
            }
            EmailCollapse::PrimaryMatchesEmail1 | EmailCollapse::PrimaryMatchesEmail2 => {
                row.get_mut(EmailSlot::Primary.field()).clear();
            }
            EmailCollapse::Email1MatchesEmail2 => {
                row.get_mut(EmailSlot::Email2.field()).clear();
            }
            EmailCollapse::Distinct => {}
        }

        rule
    }
}

impl RowNormalizer for EmailMerger {
    fn name(&self) -> &'static str {
        "email_merge"
    }

    fn normalize(&self, mut row: ContactRow) -> ContactRow {
        self.fill_primary(&mut row);
        if self.collapse(&mut row) != EmailCollapse::Distinct {
            metrics::normalize::email_collapsed();
        }
        row
    }
}
