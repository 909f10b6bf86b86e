//! Core types for the JMAK microstructure evolution engine.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the data model shared by every other crate in the workspace: step
//! identifiers, processing step descriptions, the microstructure
//! [`Profile`] carried between steps, the [`Mechanism`] tag, the
//! process-wide [`KineticsConfig`] constants and the kinetics error type.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod id;
pub mod mechanism;
pub mod profile;
pub mod step;

pub use config::{ConfigError, KineticsConfig, UNIVERSAL_GAS_CONSTANT};
pub use error::KineticsError;
pub use id::StepId;
pub use mechanism::Mechanism;
pub use profile::{Profile, RecrystallizationState};
pub use step::{DeformationStep, RestStep, StepKind, StepSpec, Temperatures};
