// Domain layer: customer models and ports (interfaces).

pub mod model;
pub mod ports;
