// Pipeline ingestion: header resolution and typed row loading

pub mod column_resolver;

pub use column_resolver::{ColumnResolver, ResolvedSchema, CLASSIFY_REQUIRED, CLEAN_REQUIRED};
