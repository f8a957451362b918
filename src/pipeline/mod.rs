//! Pipeline components: bounding index, pair generation, worker pool,
//! result stream, and the driver that wires them together.

pub mod bounds;
pub mod collector;
pub mod orchestrator;
pub mod pairs;
pub mod workers;

pub use bounds::build_bounding_index;
pub use collector::ResultStream;
pub use orchestrator::run_overlap_check;
pub use pairs::{PairPlan, generate_pairs};
pub use workers::{WorkerContext, classify_pair, spawn_classification_workers};
