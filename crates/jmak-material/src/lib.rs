//! Kinetic parameter sets and material lookup for the JMAK engine.
//!
//! A material resolves to up to four independent coefficient bundles, one
//! per mechanism (dynamic, static, metadynamic recrystallization and grain
//! growth). Bundles are validated when a material is registered or parsed,
//! so a malformed fit fails fast instead of surfacing mid-solve.
//!
//! [`MaterialRegistry::with_builtin`] provides literature-fitted sets for
//! S355, C54SiCe6 and C20 steel grades.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod builtin;
pub mod error;
pub mod params;
pub mod registry;

pub use error::MaterialError;
pub use params::{
    GrainGrowthParameters, MaterialParameters, PowerLaw, RecrystallizationParameters,
};
pub use registry::{MaterialIdentity, MaterialRegistry};
