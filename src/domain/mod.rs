// Domain layer: battery, rule engine, models and ports. No I/O here.

pub mod battery;
pub mod model;
pub mod ports;
pub mod rules;
