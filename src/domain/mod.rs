// Domain layer: assessment inputs and ports (interfaces). No HTTP or filesystem code here.

pub mod model;
pub mod ports;
pub mod profile;
