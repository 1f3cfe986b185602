// Domain layer: instrument models and ports (clock, storage). No IO here.

pub mod model;
pub mod ports;
