/// Header name constants shared by the column resolver and the output writers.
/// Input headers are matched case- and whitespace-insensitively; output headers
/// are written exactly as spelled here.

// Identity columns (row dedup key)
pub const CONTACT_FULL_NAME: &str = "Contact Full Name";
pub const COMPANY_NAME_CLEANED: &str = "Company Name - Cleaned";
pub const WEBSITE: &str = "Website";

// Derived name columns
pub const FIRST_NAME: &str = "First Name";
pub const LAST_NAME: &str = "Last Name";

// Business columns
pub const ORGANIZATION: &str = "Organization";
pub const COMPANY_DESCRIPTION: &str = "Company Description";
pub const COMPANY_CITY: &str = "Company City";

// Email slots
pub const PRIMARY_EMAIL: &str = "Primary Email";
pub const EMAIL_1: &str = "Email 1";
pub const EMAIL_2: &str = "Email 2";
pub const PERSONAL_EMAIL: &str = "Personal Email";

// Phone slots
pub const CONTACT_PHONE_1: &str = "Contact Phone 1";
pub const COMPANY_PHONE_1: &str = "Company Phone 1";
pub const COMPANY_PHONE_2: &str = "Company Phone 2";
pub const CONTACT_MOBILE_PHONE: &str = "Contact Mobile Phone";

// Reserved for the external validation collaborator
pub const VALIDATION_STATUS: &str = "Validation Status";

// Classification columns
pub const CATEGORY_REASON: &str = "Category Reason";
pub const CONFIDENCE: &str = "Confidence";
pub const SCORE: &str = "Score";
pub const ORIGINAL_ROW: &str = "Original Row";
pub const UPLOAD_FLAG: &str = "Upload Flag";

/// Output file names used by the CSV sinks
pub const CLEANED_FILE: &str = "cleaned.csv";
pub const HVAC_FILE: &str = "hvac.csv";
pub const OTHER_FILE: &str = "other.csv";
pub const NO_DESCRIPTION_FILE: &str = "no_description.csv";

/// Environment variable consulted when no `--config` is given
pub const CONFIG_ENV_VAR: &str = "LEAD_CLEANER_CONFIG";

/// Spreadsheet row number of the first data row (the header is row 1)
pub const FIRST_DATA_ROW: usize = 2;

/// Cleaned output columns, in order
pub const CLEANED_HEADERS: [&str; 16] = [
    CONTACT_FULL_NAME,
    FIRST_NAME,
    LAST_NAME,
    ORGANIZATION,
    PRIMARY_EMAIL,
    EMAIL_1,
    EMAIL_2,
    PERSONAL_EMAIL,
    CONTACT_PHONE_1,
    COMPANY_PHONE_1,
    COMPANY_PHONE_2,
    CONTACT_MOBILE_PHONE,
    COMPANY_DESCRIPTION,
    WEBSITE,
    COMPANY_CITY,
    VALIDATION_STATUS,
];

/// Classification output columns: the fifteen business columns plus the verdict
pub const CLASSIFICATION_HEADERS: [&str; 20] = [
    CONTACT_FULL_NAME,
    FIRST_NAME,
    LAST_NAME,
    ORGANIZATION,
    PRIMARY_EMAIL,
    EMAIL_1,
    EMAIL_2,
    PERSONAL_EMAIL,
    CONTACT_PHONE_1,
    COMPANY_PHONE_1,
    COMPANY_PHONE_2,
    CONTACT_MOBILE_PHONE,
    COMPANY_DESCRIPTION,
    WEBSITE,
    COMPANY_CITY,
    CATEGORY_REASON,
    CONFIDENCE,
    SCORE,
    ORIGINAL_ROW,
    UPLOAD_FLAG,
];
