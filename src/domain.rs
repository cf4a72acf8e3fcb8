use serde::{Deserialize, Serialize};
use std::fmt;

use crate::common::constants as c;

/// Raw tabular input: a header row followed by ordered data rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    /// Spreadsheet row number (1-based, header included) of the data row at `index`.
    pub fn row_number(index: usize) -> usize {
        index + c::FIRST_DATA_ROW
    }
}

/// Canonical contact fields. Input headers are resolved to these once, before
/// any stage runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    FullName,
    FirstName,
    LastName,
    Organization,
    CompanyNameCleaned,
    PrimaryEmail,
    Email1,
    Email2,
    PersonalEmail,
    ContactPhone1,
    CompanyPhone1,
    CompanyPhone2,
    ContactMobile,
    Description,
    Website,
    City,
}

impl Field {
    pub const ALL: [Field; 16] = [
        Field::FullName,
        Field::FirstName,
        Field::LastName,
        Field::Organization,
        Field::CompanyNameCleaned,
        Field::PrimaryEmail,
        Field::Email1,
        Field::Email2,
        Field::PersonalEmail,
        Field::ContactPhone1,
        Field::CompanyPhone1,
        Field::CompanyPhone2,
        Field::ContactMobile,
        Field::Description,
        Field::Website,
        Field::City,
    ];

    /// The eight contact-channel columns, in the order field-level dedup visits them.
    pub const CONTACT_CHANNELS: [Field; 8] = [
        Field::PrimaryEmail,
        Field::Email1,
        Field::Email2,
        Field::PersonalEmail,
        Field::ContactPhone1,
        Field::CompanyPhone1,
        Field::CompanyPhone2,
        Field::ContactMobile,
    ];

    /// The fifteen business columns carried into classification output.
    pub const BUSINESS: [Field; 15] = [
        Field::FullName,
        Field::FirstName,
        Field::LastName,
        Field::Organization,
        Field::PrimaryEmail,
        Field::Email1,
        Field::Email2,
        Field::PersonalEmail,
        Field::ContactPhone1,
        Field::CompanyPhone1,
        Field::CompanyPhone2,
        Field::ContactMobile,
        Field::Description,
        Field::Website,
        Field::City,
    ];

    /// Snake-case key used in configuration files.
    pub fn key(&self) -> &'static str {
        match self {
            Field::FullName => "full_name",
            Field::FirstName => "first_name",
            Field::LastName => "last_name",
            Field::Organization => "organization",
            Field::CompanyNameCleaned => "company_name_cleaned",
            Field::PrimaryEmail => "primary_email",
            Field::Email1 => "email1",
            Field::Email2 => "email2",
            Field::PersonalEmail => "personal_email",
            Field::ContactPhone1 => "contact_phone1",
            Field::CompanyPhone1 => "company_phone1",
            Field::CompanyPhone2 => "company_phone2",
            Field::ContactMobile => "contact_mobile",
            Field::Description => "description",
            Field::Website => "website",
            Field::City => "city",
        }
    }

    pub fn from_key(key: &str) -> Option<Field> {
        Field::ALL.iter().copied().find(|f| f.key() == key)
    }

    /// Canonical header spelling, used both as the default input alias and the
    /// output column name.
    pub fn header(&self) -> &'static str {
        match self {
            Field::FullName => c::CONTACT_FULL_NAME,
            Field::FirstName => c::FIRST_NAME,
            Field::LastName => c::LAST_NAME,
            Field::Organization => c::ORGANIZATION,
            Field::CompanyNameCleaned => c::COMPANY_NAME_CLEANED,
            Field::PrimaryEmail => c::PRIMARY_EMAIL,
            Field::Email1 => c::EMAIL_1,
            Field::Email2 => c::EMAIL_2,
            Field::PersonalEmail => c::PERSONAL_EMAIL,
            Field::ContactPhone1 => c::CONTACT_PHONE_1,
            Field::CompanyPhone1 => c::COMPANY_PHONE_1,
            Field::CompanyPhone2 => c::COMPANY_PHONE_2,
            Field::ContactMobile => c::CONTACT_MOBILE_PHONE,
            Field::Description => c::COMPANY_DESCRIPTION,
            Field::Website => c::WEBSITE,
            Field::City => c::COMPANY_CITY,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.header())
    }
}

/// One contact record keyed by canonical field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRow {
    /// Spreadsheet row number in the table this row was read from
    pub source_row: usize,
    pub full_name: String,
    pub first_name: String,
    pub last_name: String,
    pub organization: String,
    pub company_name_cleaned: String,
    pub primary_email: String,
    pub email1: String,
    pub email2: String,
    pub personal_email: String,
    pub contact_phone1: String,
    pub company_phone1: String,
    pub company_phone2: String,
    pub contact_mobile: String,
    pub description: String,
    pub website: String,
    pub city: String,
}

impl ContactRow {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::FullName => &self.full_name,
            Field::FirstName => &self.first_name,
            Field::LastName => &self.last_name,
            Field::Organization => &self.organization,
            Field::CompanyNameCleaned => &self.company_name_cleaned,
            Field::PrimaryEmail => &self.primary_email,
            Field::Email1 => &self.email1,
            Field::Email2 => &self.email2,
            Field::PersonalEmail => &self.personal_email,
            Field::ContactPhone1 => &self.contact_phone1,
            Field::CompanyPhone1 => &self.company_phone1,
            Field::CompanyPhone2 => &self.company_phone2,
            Field::ContactMobile => &self.contact_mobile,
            Field::Description => &self.description,
            Field::Website => &self.website,
            Field::City => &self.city,
        }
    }

    pub fn get_mut(&mut self, field: Field) -> &mut String {
        match field {
            Field::FullName => &mut self.full_name,
            Field::FirstName => &mut self.first_name,
            Field::LastName => &mut self.last_name,
            Field::Organization => &mut self.organization,
            Field::CompanyNameCleaned => &mut self.company_name_cleaned,
            Field::PrimaryEmail => &mut self.primary_email,
            Field::Email1 => &mut self.email1,
            Field::Email2 => &mut self.email2,
            Field::PersonalEmail => &mut self.personal_email,
            Field::ContactPhone1 => &mut self.contact_phone1,
            Field::CompanyPhone1 => &mut self.company_phone1,
            Field::CompanyPhone2 => &mut self.company_phone2,
            Field::ContactMobile => &mut self.contact_mobile,
            Field::Description => &mut self.description,
            Field::Website => &mut self.website,
            Field::City => &mut self.city,
        }
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        *self.get_mut(field) = value.into();
    }

    pub fn is_blank(&self, field: Field) -> bool {
        self.get(field).trim().is_empty()
    }

    /// Cleaned output record in the fixed sixteen-column order. The trailing
    /// Validation Status cell is always written empty; it is filled in later
    /// by whoever validates the rows.
    pub fn to_cleaned_record(&self) -> Vec<String> {
        let mut record: Vec<String> = Field::BUSINESS
            .iter()
            .map(|f| self.get(*f).to_string())
            .collect();
        record.push(String::new());
        record
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmailSlot {
    Primary,
    Email1,
    Email2,
    Personal,
}

impl EmailSlot {
    pub fn field(&self) -> Field {
        match self {
            EmailSlot::Primary => Field::PrimaryEmail,
            EmailSlot::Email1 => Field::Email1,
            EmailSlot::Email2 => Field::Email2,
            EmailSlot::Personal => Field::PersonalEmail,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PhoneSlot {
    ContactPhone1,
    CompanyPhone1,
    CompanyPhone2,
    ContactMobile,
}

impl PhoneSlot {
    /// Non-mobile slots in the order the phone merge claims them.
    pub const CLAIM_ORDER: [PhoneSlot; 3] = [
        PhoneSlot::ContactPhone1,
        PhoneSlot::CompanyPhone1,
        PhoneSlot::CompanyPhone2,
    ];

    pub fn field(&self) -> Field {
        match self {
            PhoneSlot::ContactPhone1 => Field::ContactPhone1,
            PhoneSlot::CompanyPhone1 => Field::CompanyPhone1,
            PhoneSlot::CompanyPhone2 => Field::CompanyPhone2,
            PhoneSlot::ContactMobile => Field::ContactMobile,
        }
    }
}

/// Trade category assigned by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "HVAC")]
    Hvac,
    Other,
    NoDescription,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Hvac, Category::Other, Category::NoDescription];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hvac => "HVAC",
            Category::Other => "Other",
            Category::NoDescription => "No Description",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Qualitative confidence tier derived from the branch that produced a verdict
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Confidence {
    High,
    Medium,
    Low,
    #[serde(rename = "N/A")]
    NotApplicable,
}

impl Confidence {
    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::High => "High",
            Confidence::Medium => "Medium",
            Confidence::Low => "Low",
            Confidence::NotApplicable => "N/A",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier verdict for one row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: Category,
    pub reason: String,
    pub confidence: Confidence,
    pub score: f64,
    /// Spreadsheet row number of the classified row in its source table
    pub source_row: usize,
}

/// A classified row as handed to the classification sink.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationRow {
    pub contact: ContactRow,
    pub result: ClassificationResult,
    /// Owned by the external upload workflow; always starts unset
    pub upload_flag: bool,
}

impl ClassificationRow {
    pub fn new(contact: ContactRow, result: ClassificationResult) -> Self {
        Self {
            contact,
            result,
            upload_flag: false,
        }
    }

    /// Output record: fifteen business columns then the verdict columns.
    pub fn to_record(&self) -> Vec<String> {
        let mut record: Vec<String> = Field::BUSINESS
            .iter()
            .map(|f| self.contact.get(*f).to_string())
            .collect();
        record.push(self.result.reason.clone());
        record.push(self.result.confidence.to_string());
        record.push(format!("{:.1}", self.result.score));
        record.push(self.result.source_row.to_string());
        record.push(if self.upload_flag { "TRUE" } else { "FALSE" }.to_string());
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cleaned_record_matches_header_order() {
        let mut row = ContactRow::default();
        row.set(Field::FullName, "Ada Lovelace");
        row.set(Field::ContactMobile, "555-0100");
        row.set(Field::City, "Seattle");

        let record = row.to_cleaned_record();
        assert_eq!(record.len(), c::CLEANED_HEADERS.len());
        assert_eq!(record[0], "Ada Lovelace");
        assert_eq!(record[11], "555-0100");
        assert_eq!(record[14], "Seattle");
        assert_eq!(record[15], "");
    }

    #[test]
    fn test_classification_record_layout() {
        let mut contact = ContactRow::default();
        contact.set(Field::Organization, "Acme Air");
        let result = ClassificationResult {
            category: Category::Hvac,
            reason: "matched: hvac".to_string(),
            confidence: Confidence::High,
            score: 5.0,
            source_row: 7,
        };

        let record = ClassificationRow::new(contact, result).to_record();
        assert_eq!(record.len(), c::CLASSIFICATION_HEADERS.len());
        assert_eq!(record[3], "Acme Air");
        assert_eq!(&record[15..], ["matched: hvac", "High", "5.0", "7", "FALSE"]);
    }

    #[test]
    fn test_field_keys_round_trip() {
        for field in Field::ALL {
            assert_eq!(Field::from_key(field.key()), Some(field));
        }
        assert_eq!(Field::from_key("fax"), None);
    }

    #[test]
    fn test_business_fields_line_up_with_headers() {
        for (field, header) in Field::BUSINESS.iter().zip(c::CLASSIFICATION_HEADERS.iter()) {
            assert_eq!(field.header(), *header);
        }
        for (field, header) in Field::BUSINESS.iter().zip(c::CLEANED_HEADERS.iter()) {
            assert_eq!(field.header(), *header);
        }
    }
}
