// Domain layer: request/response models and the generation port.

pub mod model;
pub mod ports;
