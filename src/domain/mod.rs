// Domain layer - Pure state and invariants, no I/O
pub mod device;
pub mod light;
pub mod telemetry;
