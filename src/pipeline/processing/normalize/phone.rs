use std::collections::HashSet;

use crate::domain::{ContactRow, PhoneSlot};
use crate::observability::metrics;

use super::RowNormalizer;

/// Stored form of a phone number: literal dots removed, nothing else changed.
pub fn strip_dots(value: &str) -> String {
    value.replace('.', "")
}

/// Comparison form of a phone number. Never stored.
pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Collapses the four phone slots. The mobile number is registered first and
/// is never cleared; among the other three slots the first one in declared
/// order keeps a given number.
#[derive(Debug, Default, Clone, Copy)]
pub struct PhoneMerger;

impl PhoneMerger {
    /// Returns the merged row and the slots that were cleared.
    pub fn merge(&self, mut row: ContactRow) -> (ContactRow, Vec<PhoneSlot>) {
        let mobile_field = PhoneSlot::ContactMobile.field();
        let mobile = strip_dots(row.get(mobile_field));
        let mobile_digits = digits_only(&mobile);
        row.set(mobile_field, mobile);

        let mut claimed: HashSet<String> = HashSet::new();
        let mut cleared = Vec::new();

        for slot in PhoneSlot::CLAIM_ORDER {
            let value = strip_dots(row.get(slot.field()));
            let digits = digits_only(&value);

            // Nothing to compare on: keep the dot-stripped value as is
            if digits.is_empty() {
                row.set(slot.field(), value);
                continue;
            }

            if digits == mobile_digits || !claimed.insert(digits) {
                row.set(slot.field(), String::new());
                cleared.push(slot);
            } else {
                row.set(slot.field(), value);
            }
        }

        (row, cleared)
    }
}

impl RowNormalizer for PhoneMerger {
    fn name(&self) -> &'static str {
        "phone_merge"
    }

    fn normalize(&self, row: ContactRow) -> ContactRow {
        let (row, cleared) = self.merge(row);
        for _ in &cleared {
            metrics::normalize::phone_cleared();
        }
        row
    }
}
