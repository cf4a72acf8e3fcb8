// Observability: pipeline metrics

pub mod metrics;

pub use self::metrics::init;
