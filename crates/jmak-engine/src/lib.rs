//! Pass sequence solver.
//!
//! A [`PassSequence`] is built once from a [`SequenceConfig`]: the steps
//! are validated and every rest step is linked to the deformation step
//! driving it. [`PassSequence::solve`] then chains the step kinetics in
//! process order, feeding each step's output profile into the next.
//! [`solve_batch`] solves independent sequences on a worker pool.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod batched;
pub mod config;
pub mod metrics;
pub mod sequence;

pub use batched::{solve_batch, BatchError};
pub use config::{BatchConfig, SequenceConfig, SequenceError};
pub use metrics::SolveMetrics;
pub use sequence::{PassSequence, SolvedSequence, StepRecord};
