// Domain layer: API shapes, index entries and ports. No I/O here.

pub mod model;
pub mod ports;
