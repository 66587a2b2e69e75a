//! Serialized scan output

mod report;

pub use report::{ScanReport, SerializedComponent, SerializedDependency};
