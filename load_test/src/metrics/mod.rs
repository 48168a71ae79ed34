// Metrics module
// Request statistics, system sampling and console/JSON reporting

pub mod collector;
pub mod reporter;
pub mod types;

pub use collector::MetricsCollector;
