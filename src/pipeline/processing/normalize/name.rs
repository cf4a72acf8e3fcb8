use crate::domain::ContactRow;

use super::RowNormalizer;

/// Split a full name at the token midpoint: the first ceil(n/2) tokens become
/// the first name, the rest the last name. Not a linguistic parse.
pub fn split_name(full_name: &str) -> (String, String) {
    let tokens: Vec<&str> = full_name.split_whitespace().collect();
    match tokens.len() {
        0 => (String::new(), String::new()),
        1 => (tokens[0].to_string(), String::new()),
        n => {
            let index = n.div_ceil(2);
            (tokens[..index].join(" "), tokens[index..].join(" "))
        }
    }
}

/// Derives first and last name from the full name column.
#[derive(Debug, Default, Clone, Copy)]
pub struct NameSplitter;

impl RowNormalizer for NameSplitter {
    fn name(&self) -> &'static str {
        "name_split"
    }

    fn normalize(&self, mut row: ContactRow) -> ContactRow {
        let (first, last) = split_name(&row.full_name);
        row.first_name = first;
        row.last_name = last;
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(name: &str) -> (String, String) {
        split_name(name)
    }

    #[test]
    fn test_empty_and_single_token() {
        assert_eq!(split(""), (String::new(), String::new()));
        assert_eq!(split("   "), (String::new(), String::new()));
        assert_eq!(split(" Cher "), ("Cher".to_string(), String::new()));
    }

    #[test]
    fn test_four_tokens_split_evenly() {
        assert_eq!(
            split("Mary Jane Watson Parker"),
            ("Mary Jane".to_string(), "Watson Parker".to_string())
        );
    }

    #[test]
    fn test_odd_token_count_favors_first_name() {
        assert_eq!(
            split("Juan  Carlos\tGarcia"),
            ("Juan Carlos".to_string(), "Garcia".to_string())
        );
    }

    #[test]
    fn test_token_counts_follow_midpoint() {
        for n in 2usize..9 {
            let name: Vec<String> = (0..n).map(|i| format!("t{}", i)).collect();
            let (first, last) = split(&name.join(" "));
            assert_eq!(first.split(' ').count(), n.div_ceil(2));
            assert_eq!(last.split(' ').count(), n / 2);
        }
    }

    #[test]
    fn test_normalizer_overwrites_name_columns() {
        let row = ContactRow {
            full_name: "Ada King Lovelace".to_string(),
            first_name: "stale".to_string(),
            ..ContactRow::default()
        };
        let row = NameSplitter.normalize(row);
        assert_eq!(row.first_name, "Ada King");
        assert_eq!(row.last_name, "Lovelace");
    }
}
