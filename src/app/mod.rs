pub mod classify_use_case;
pub mod clean_use_case;
pub mod ports;
pub mod run_use_case;
pub mod summary;

pub use classify_use_case::ClassifyUseCase;
pub use clean_use_case::CleanUseCase;
pub use run_use_case::{RunOutcome, RunUseCase};
pub use summary::RunSummary;
