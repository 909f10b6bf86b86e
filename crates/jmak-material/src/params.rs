//! Coefficient bundles for each recrystallization mechanism.
//!
//! All equations share the power-law/Arrhenius shape
//! `coefficient · strain^e1 · strain_rate^e2 · (grain_size·1e6)^e3 · exp(q/(R·T))`,
//! so the three equations of one mechanism are stored as three
//! [`PowerLaw`]-shaped coefficient groups inside
//! [`RecrystallizationParameters`].
//!
//! Sign convention: the Avrami coefficient `k` is negative so that
//! `1 - exp(k·xⁿ)` rises from 0 towards 1. Activation energies of the
//! recrystallization equations enter as `exp(+q/(R·T))`; the grain growth
//! activation energy enters as `exp(-qd/(R·T))`.

use jmak_core::Mechanism;
use serde::{Deserialize, Serialize};

use crate::error::MaterialError;

/// Coefficients of one recrystallization mechanism.
///
/// Every field defaults to zero, which makes the corresponding term a
/// no-op (`x^0 = 1`, `exp(0) = 1`). Only `k` and `n` must be given.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecrystallizationParameters {
    /// Coefficient of the Avrami term. Must be negative.
    pub k: f64,
    /// Exponent of the Avrami term. Must be positive.
    pub n: f64,

    /// Coefficient of the critical value equation.
    pub a1: f64,
    /// Strain exponent of the critical value equation.
    pub a2: f64,
    /// Strain rate exponent of the critical value equation.
    pub a3: f64,
    /// Grain size exponent of the critical value equation.
    pub a4: f64,
    /// Activation energy of the critical value equation in J/mol.
    pub qa: f64,

    /// Coefficient of the reference value equation.
    pub b1: f64,
    /// Strain exponent of the reference value equation.
    pub b2: f64,
    /// Strain rate exponent of the reference value equation.
    pub b3: f64,
    /// Grain size exponent of the reference value equation.
    pub b4: f64,
    /// Activation energy of the reference value equation in J/mol.
    pub qb: f64,

    /// Coefficient of the recrystallized grain size equation.
    pub c1: f64,
    /// Strain exponent of the recrystallized grain size equation.
    pub c2: f64,
    /// Strain rate exponent of the recrystallized grain size equation.
    pub c3: f64,
    /// Grain size exponent of the recrystallized grain size equation.
    pub c4: f64,
    /// Activation energy of the recrystallized grain size equation in J/mol.
    pub qc: f64,
}

/// A power-law/Arrhenius coefficient group borrowed from a
/// [`RecrystallizationParameters`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerLaw {
    /// Leading coefficient.
    pub coefficient: f64,
    /// Strain exponent.
    pub strain_exponent: f64,
    /// Strain rate exponent.
    pub strain_rate_exponent: f64,
    /// Grain size (in µm) exponent.
    pub grain_size_exponent: f64,
    /// Activation energy in J/mol.
    pub activation_energy: f64,
}

impl RecrystallizationParameters {
    /// Coefficients of the critical value equation (`a1..a4, qa`).
    pub fn critical(&self) -> PowerLaw {
        PowerLaw {
            coefficient: self.a1,
            strain_exponent: self.a2,
            strain_rate_exponent: self.a3,
            grain_size_exponent: self.a4,
            activation_energy: self.qa,
        }
    }

    /// Coefficients of the reference value equation (`b1..b4, qb`).
    pub fn reference(&self) -> PowerLaw {
        PowerLaw {
            coefficient: self.b1,
            strain_exponent: self.b2,
            strain_rate_exponent: self.b3,
            grain_size_exponent: self.b4,
            activation_energy: self.qb,
        }
    }

    /// Coefficients of the recrystallized grain size equation (`c1..c4, qc`).
    pub fn grain_size(&self) -> PowerLaw {
        PowerLaw {
            coefficient: self.c1,
            strain_exponent: self.c2,
            strain_rate_exponent: self.c3,
            grain_size_exponent: self.c4,
            activation_energy: self.qc,
        }
    }

    /// Check the Avrami invariants and finiteness of every coefficient.
    pub fn validate(&self) -> Result<(), String> {
        if !self.n.is_finite() || self.n <= 0.0 {
            return Err(format!("Avrami exponent n must be positive, got {}", self.n));
        }
        if !self.k.is_finite() || self.k >= 0.0 {
            return Err(format!(
                "Avrami coefficient k must be negative, got {}",
                self.k
            ));
        }
        let named = [
            ("a1", self.a1),
            ("a2", self.a2),
            ("a3", self.a3),
            ("a4", self.a4),
            ("qa", self.qa),
            ("b1", self.b1),
            ("b2", self.b2),
            ("b3", self.b3),
            ("b4", self.b4),
            ("qb", self.qb),
            ("c1", self.c1),
            ("c2", self.c2),
            ("c3", self.c3),
            ("c4", self.c4),
            ("qc", self.qc),
        ];
        for (name, value) in named {
            if !value.is_finite() {
                return Err(format!("coefficient {name} must be finite, got {value}"));
            }
        }
        Ok(())
    }
}

/// Beck-type grain growth coefficients.
///
/// `d^d1 = d0^d1 + d2 · t · exp(-qd/(R·T))` with grain sizes in µm.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GrainGrowthParameters {
    /// Growth exponent. Must be positive.
    pub d1: f64,
    /// Growth rate coefficient. Must be non-negative.
    pub d2: f64,
    /// Activation energy in J/mol.
    pub qd: f64,
}

impl GrainGrowthParameters {
    /// Check growth law invariants.
    pub fn validate(&self) -> Result<(), String> {
        if !self.d1.is_finite() || self.d1 <= 0.0 {
            return Err(format!("growth exponent d1 must be positive, got {}", self.d1));
        }
        if !self.d2.is_finite() || self.d2 < 0.0 {
            return Err(format!(
                "growth coefficient d2 must be finite and non-negative, got {}",
                self.d2
            ));
        }
        if !self.qd.is_finite() {
            return Err(format!("activation energy qd must be finite, got {}", self.qd));
        }
        Ok(())
    }
}

/// All kinetic data known for one material.
///
/// Each mechanism bundle is optional; the mechanism selector degrades to
/// the next applicable mechanism when a bundle is missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialParameters {
    /// Dynamic recrystallization (roll passes).
    pub dynamic: Option<RecrystallizationParameters>,
    /// Static recrystallization (transports).
    #[serde(rename = "static")]
    pub static_: Option<RecrystallizationParameters>,
    /// Metadynamic recrystallization (transports).
    pub metadynamic: Option<RecrystallizationParameters>,
    /// Grain growth (transports).
    pub grain_growth: Option<GrainGrowthParameters>,
    /// Activation energy of hot deformation in J/mol, used for the
    /// Zener-Hollomon parameter.
    pub deformation_activation_energy: Option<f64>,
}

impl MaterialParameters {
    /// The recrystallization bundle for `mechanism`, if present.
    ///
    /// Always `None` for [`Mechanism::None`] and [`Mechanism::GrainGrowth`],
    /// which carry no Avrami kinetics.
    pub fn recrystallization(&self, mechanism: Mechanism) -> Option<&RecrystallizationParameters> {
        match mechanism {
            Mechanism::Dynamic => self.dynamic.as_ref(),
            Mechanism::Static => self.static_.as_ref(),
            Mechanism::Metadynamic => self.metadynamic.as_ref(),
            Mechanism::None | Mechanism::GrainGrowth => None,
        }
    }

    /// Whether the data needed by `mechanism` is present.
    pub fn supports(&self, mechanism: Mechanism) -> bool {
        match mechanism {
            Mechanism::None => true,
            Mechanism::GrainGrowth => self.grain_growth.is_some(),
            m => self.recrystallization(m).is_some(),
        }
    }

    /// Validate every present bundle.
    ///
    /// `material` is only used to label the error.
    pub fn validate(&self, material: &str) -> Result<(), MaterialError> {
        for mechanism in [Mechanism::Dynamic, Mechanism::Static, Mechanism::Metadynamic] {
            if let Some(p) = self.recrystallization(mechanism) {
                p.validate()
                    .map_err(|reason| MaterialError::MalformedParameters {
                        material: material.to_string(),
                        mechanism,
                        reason,
                    })?;
            }
        }
        if let Some(g) = &self.grain_growth {
            g.validate()
                .map_err(|reason| MaterialError::MalformedParameters {
                    material: material.to_string(),
                    mechanism: Mechanism::GrainGrowth,
                    reason,
                })?;
        }
        if let Some(q) = self.deformation_activation_energy {
            if !q.is_finite() || q <= 0.0 {
                return Err(MaterialError::InvalidActivationEnergy {
                    material: material.to_string(),
                    value: q,
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a parameter table from JSON.
    ///
    /// Missing mechanism bundles deserialize as absent, and missing
    /// coefficients inside a bundle default to zero.
    pub fn from_json(material: &str, json: &str) -> Result<Self, MaterialError> {
        let params: Self = serde_json::from_str(json).map_err(|e| MaterialError::Parse {
            material: material.to_string(),
            reason: e.to_string(),
        })?;
        params.validate(material)?;
        Ok(params)
    }

    /// Serialize the parameter table to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, MaterialError> {
        serde_json::to_string_pretty(self).map_err(|e| MaterialError::Encode {
            reason: e.to_string(),
        })
    }
}
