//! Benchmark profiles for the JMAK engine.
//!
//! - [`bar_mill_profile`]: an 18-stand bar mill schedule for one grade
//! - [`batch_profile`]: many bar mill schedules across the built-in grades

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::sync::Arc;

use jmak_core::{DeformationStep, Profile, RestStep, StepSpec};
use jmak_engine::{PassSequence, SequenceConfig, SequenceError};
use jmak_material::{MaterialParameters, MaterialRegistry};

/// Number of stands in [`bar_mill_profile`].
pub const STANDS: usize = 18;

/// Build an 18-stand bar mill schedule.
///
/// Strain rate rises geometrically from 1 s⁻¹, transports shrink from
/// 8 s, and the bar cools 5 K per step from 1150 °C. The last transport
/// is a 20 s run-out to the cooling bed.
pub fn bar_mill_profile(material: Arc<MaterialParameters>) -> Result<PassSequence, SequenceError> {
    let mut steps: Vec<StepSpec> = Vec::with_capacity(2 * STANDS);
    let mut temperature = 1423.15;
    for stand in 0..STANDS {
        let strain = 0.35 - 0.008 * stand as f64;
        let strain_rate = 1.3f64.powi(stand as i32);
        let transport = if stand + 1 == STANDS {
            20.0
        } else {
            8.0 * 0.85f64.powi(stand as i32)
        };
        steps.push(
            DeformationStep::new(format!("stand {}", stand + 1), strain, strain_rate, temperature)
                .with_exit_temperature(temperature - 5.0)
                .into(),
        );
        temperature -= 5.0;
        steps.push(
            RestStep::new(format!("stand {} exit", stand + 1), transport, temperature)
                .with_exit_temperature(temperature - 5.0)
                .into(),
        );
        temperature -= 5.0;
    }
    PassSequence::new(
        SequenceConfig::new(material, Profile::initial(150e-6, 1423.15)).steps(steps),
    )
}

/// `count` bar mill schedules, cycling through the built-in grades.
pub fn batch_profile(count: usize) -> Result<Vec<PassSequence>, SequenceError> {
    let registry = MaterialRegistry::with_builtin();
    let materials: Vec<_> = registry
        .names()
        .filter_map(|name| registry.get(name))
        .collect();
    if materials.is_empty() {
        return Ok(Vec::new());
    }
    (0..count)
        .map(|i| bar_mill_profile(Arc::clone(&materials[i % materials.len()])))
        .collect()
}
