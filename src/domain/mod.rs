// Domain layer: models and ports (interfaces). Adapters live under config/.

pub mod model;
pub mod ports;
