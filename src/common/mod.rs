// Shared constants used across the application

pub mod constants;
