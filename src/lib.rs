pub mod calculator;
pub mod deduction;
pub mod engine;
pub mod format;
pub mod formatting;
pub mod report;
pub mod store;
pub mod telemetry;
pub mod tsv;
pub mod types;

pub use types::*;
