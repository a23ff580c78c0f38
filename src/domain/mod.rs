// Domain layer: score values, line records and ports. No I/O here.

pub mod model;
pub mod ports;
