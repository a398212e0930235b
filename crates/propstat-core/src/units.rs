//! Physical constants and the unit-tagged pressure used to derive enthalpy.

use serde::{Deserialize, Serialize};

use crate::errors::PropError;

/// Avogadro constant in mol⁻¹ (exact, SI 2019).
pub const AVOGADRO: f64 = 6.022_140_76e23;

const PASCALS_PER_BAR: f64 = 1.0e5;
const PASCALS_PER_ATMOSPHERE: f64 = 101_325.0;
const CUBIC_METRES_PER_CUBIC_NANOMETRE: f64 = 1.0e-27;
const JOULES_PER_KILOJOULE: f64 = 1.0e3;

/// Pressure stored internally in bar.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Pressure {
    bar: f64,
}

impl Pressure {
    /// Pressure expressed in bar. Non-finite values are rejected.
    pub fn from_bar(bar: f64) -> Result<Self, PropError> {
        if !bar.is_finite() {
            return Err(
                PropError::validation("pressure_not_finite", "pressure must be finite")
                    .with_context("value", bar),
            );
        }
        Ok(Self { bar })
    }

    /// Pressure expressed in standard atmospheres.
    pub fn from_atmospheres(atm: f64) -> Result<Self, PropError> {
        Self::from_bar(atm * PASCALS_PER_ATMOSPHERE / PASCALS_PER_BAR)
    }

    /// Pressure expressed in pascals.
    pub fn from_pascals(pa: f64) -> Result<Self, PropError> {
        Self::from_bar(pa / PASCALS_PER_BAR)
    }

    /// Value in bar.
    pub fn as_bar(&self) -> f64 {
        self.bar
    }

    /// Value in pascals.
    pub fn as_pascals(&self) -> f64 {
        self.bar * PASCALS_PER_BAR
    }

    /// Molar `p·V` work in kJ/mol for a box volume given in nm³.
    ///
    /// This is the `V · p · N_A` term of `H = E + pV`.
    pub fn pv_work_kj_per_mol(&self, volume_nm3: f64) -> f64 {
        volume_nm3 * CUBIC_METRES_PER_CUBIC_NANOMETRE * self.as_pascals() * AVOGADRO
            / JOULES_PER_KILOJOULE
    }
}
