//! Recrystallization kinetics of single processing steps.
//!
//! Evaluating a step is a two-stage, pure computation:
//!
//! 1. [`selector::select`] walks an ordered transition table and picks
//!    the governing [`Mechanism`](jmak_core::Mechanism).
//! 2. The [`StepKinetics`] component for the step kind
//!    ([`RollPassKinetics`] or [`TransportKinetics`]) evaluates the
//!    output profile under that mechanism.
//!
//! [`evaluate_step`] runs both. The equations themselves live in
//! [`formulas`] and can be used on their own.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod context;
pub mod formulas;
pub mod kinetics;
pub mod roll_pass;
pub mod selector;
pub mod transport;

pub use context::{DrivingDeformation, StepContext};
pub use kinetics::{
    evaluate_step, kinetics_for, Evaluation, KineticsReport, StepKinetics, StepOutcome,
};
pub use roll_pass::RollPassKinetics;
pub use selector::{select, Degradation, Selection};
pub use transport::TransportKinetics;
