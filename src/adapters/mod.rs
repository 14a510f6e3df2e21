// Adapters layer: concrete implementations for external systems (local files, chart output).

pub mod chart;
pub mod storage;
