//! JMAK: recrystallization kinetics for hot-rolling pass sequences.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all JMAK sub-crates. For most users, adding `jmak` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use std::sync::Arc;
//! use jmak::prelude::*;
//!
//! let registry = MaterialRegistry::with_builtin();
//! let material = registry.lookup(&MaterialIdentity::from("S355J2")).unwrap();
//!
//! // Two roll passes with a transport in between, at 1100 °C.
//! let config = SequenceConfig::new(Arc::clone(&material), Profile::initial(80e-6, 1373.15))
//!     .step(DeformationStep::new("pass 1", 0.4, 2.0, 1373.15))
//!     .step(RestStep::new("transport 1", 3.0, 1373.15).with_exit_temperature(1363.15))
//!     .step(DeformationStep::new("pass 2", 0.35, 4.0, 1363.15));
//!
//! let sequence = PassSequence::new(config).unwrap();
//! let solved = sequence.solve().unwrap();
//! assert_eq!(solved.records().len(), 3);
//!
//! let out = solved.final_profile().unwrap();
//! assert!(out.grain_size() > 0.0);
//! assert!((0.0..=1.0).contains(&out.recrystallized_fraction()));
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `jmak-core` | Profiles, steps, mechanisms, constants, errors |
//! | [`material`] | `jmak-material` | Parameter sets, built-in grades, registry |
//! | [`kinetics`] | `jmak-kinetics` | Equations, mechanism selection, step kinetics |
//! | [`engine`] | `jmak-engine` | Pass sequences, solving, batches |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and constants (`jmak-core`).
///
/// Contains [`types::Profile`], the step descriptions, the
/// [`types::Mechanism`] tag and [`types::KineticsConfig`].
pub use jmak_core as types;

/// Kinetic parameter sets and material lookup (`jmak-material`).
///
/// [`material::MaterialRegistry::with_builtin`] provides fitted data for
/// the S355, C54SiCe6 and C20 grades.
pub use jmak_material as material;

/// Kinetics of single steps (`jmak-kinetics`).
///
/// The equations in [`kinetics::formulas`] can be used on their own;
/// [`kinetics::evaluate_step`] selects a mechanism and evaluates a step.
pub use jmak_kinetics as kinetics;

/// Pass sequence solving (`jmak-engine`).
pub use jmak_engine as engine;

/// Common imports for typical JMAK usage.
///
/// ```rust
/// use jmak::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use jmak_core::{
        DeformationStep, KineticsConfig, Mechanism, Profile, RecrystallizationState, RestStep,
        StepId, StepKind, StepSpec, Temperatures,
    };

    // Materials
    pub use jmak_material::{MaterialIdentity, MaterialParameters, MaterialRegistry};

    // Errors
    pub use jmak_core::{ConfigError, KineticsError};
    pub use jmak_engine::{BatchError, SequenceError};
    pub use jmak_material::MaterialError;

    // Engine
    pub use jmak_engine::{
        solve_batch, BatchConfig, PassSequence, SequenceConfig, SolveMetrics, SolvedSequence,
        StepRecord,
    };
}
