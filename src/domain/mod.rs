// Domain layer: records and ports. Algorithms live in `core`, I/O in `adapters`.

pub mod model;
pub mod ports;
