//! Synthetic materials with closed-form kinetics.
//!
//! Every exponent and activation energy is zero, so critical and reference
//! values are plain constants independent of strain, strain rate, grain size
//! and temperature. Expected results can then be computed by hand:
//!
//! - dynamic: critical strain 0.2, reference strain 0.8, recrystallized
//!   grain 20 µm, `k = -1`, `n = 2`.
//! - static: onset at 0 s, half time 2 s, recrystallized grain 15 µm.
//! - metadynamic: onset at 0 s, half time 0.5 s, recrystallized grain 25 µm.
//! - grain growth: `d² = d0² + 100·t` in µm² with `t` in seconds.
//!
//! [`strain_sensitive_static`] is the exception: its half time and
//! recrystallized grain size depend on strain and grain size, like every
//! fitted grade.

use std::f64::consts::LN_2;

use jmak_material::{GrainGrowthParameters, MaterialParameters, RecrystallizationParameters};

pub fn dynamic() -> RecrystallizationParameters {
    RecrystallizationParameters {
        k: -1.0,
        n: 2.0,
        a1: 0.2,
        b1: 0.8,
        c1: 20.0,
        ..Default::default()
    }
}

pub fn static_() -> RecrystallizationParameters {
    RecrystallizationParameters {
        k: -LN_2,
        n: 1.0,
        b1: 2.0,
        c1: 15.0,
        ..Default::default()
    }
}

/// Static kinetics with `t_0.5 = 0.02·ε⁻¹·d^0.5` (d in µm) and
/// `d_rx = 5·ε^-0.5·d^0.5`.
pub fn strain_sensitive_static() -> RecrystallizationParameters {
    RecrystallizationParameters {
        k: -LN_2,
        n: 1.0,
        b1: 0.02,
        b2: -1.0,
        b4: 0.5,
        c1: 5.0,
        c2: -0.5,
        c4: 0.5,
        ..Default::default()
    }
}

pub fn metadynamic() -> RecrystallizationParameters {
    RecrystallizationParameters {
        k: -LN_2,
        n: 1.0,
        b1: 0.5,
        c1: 25.0,
        ..Default::default()
    }
}

pub fn grain_growth() -> GrainGrowthParameters {
    GrainGrowthParameters {
        d1: 2.0,
        d2: 100.0,
        qd: 0.0,
    }
}

/// All four mechanisms.
pub fn synthetic_material() -> MaterialParameters {
    MaterialParameters {
        dynamic: Some(dynamic()),
        static_: Some(static_()),
        metadynamic: Some(metadynamic()),
        grain_growth: Some(grain_growth()),
        deformation_activation_energy: Some(300_000.0),
    }
}

/// All recrystallization mechanisms, no grain growth data.
pub fn without_grain_growth() -> MaterialParameters {
    MaterialParameters {
        grain_growth: None,
        ..synthetic_material()
    }
}

/// Dynamic and static only.
pub fn without_metadynamic() -> MaterialParameters {
    MaterialParameters {
        metadynamic: None,
        ..synthetic_material()
    }
}

/// Strain-sensitive static kinetics only.
pub fn strain_sensitive_material() -> MaterialParameters {
    MaterialParameters {
        static_: Some(strain_sensitive_static()),
        ..MaterialParameters::default()
    }
}

/// A material without any kinetic data.
pub fn inert_material() -> MaterialParameters {
    MaterialParameters::default()
}
