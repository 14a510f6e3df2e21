// Domain layer: typed sales records, aggregate results and the ports the pipeline talks through.

pub mod model;
pub mod ports;
