// Learning Path Lifecycle Engine
// Implements: path generation, progress aggregation, single-active lifecycle, path diff.
// Persistence goes through store::StoreTx, no direct SQL here.

pub mod compare;
pub mod generator;
pub mod handlers;
pub mod lifecycle;
pub mod progress;
