use std::fmt;
use std::str::FromStr;

use propstat_core::errors::PropError;
use serde::{Deserialize, Serialize};

/// Observables recorded per simulation frame.
///
/// Declaration order is the canonical column order used on export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ObservableKind {
    /// Potential energy in kJ/mol.
    PotentialEnergy,
    /// Kinetic energy in kJ/mol.
    KineticEnergy,
    /// Total energy in kJ/mol.
    TotalEnergy,
    /// Instantaneous temperature in K.
    Temperature,
    /// Box volume in nm³.
    Volume,
    /// Mass density in g/mL.
    Density,
    /// Enthalpy in kJ/mol, only present when a reference pressure was known.
    Enthalpy,
}

impl ObservableKind {
    /// Every kind in canonical column order.
    pub const ALL: [ObservableKind; 7] = [
        ObservableKind::PotentialEnergy,
        ObservableKind::KineticEnergy,
        ObservableKind::TotalEnergy,
        ObservableKind::Temperature,
        ObservableKind::Volume,
        ObservableKind::Density,
        ObservableKind::Enthalpy,
    ];

    /// Kinds that every imported table must carry.
    pub const MANDATORY: [ObservableKind; 6] = [
        ObservableKind::PotentialEnergy,
        ObservableKind::KineticEnergy,
        ObservableKind::TotalEnergy,
        ObservableKind::Temperature,
        ObservableKind::Volume,
        ObservableKind::Density,
    ];

    /// Column header used in tabular files, unit included.
    pub fn column_header(self) -> &'static str {
        match self {
            ObservableKind::PotentialEnergy => "Potential Energy (kJ/mole)",
            ObservableKind::KineticEnergy => "Kinetic Energy (kJ/mole)",
            ObservableKind::TotalEnergy => "Total Energy (kJ/mole)",
            ObservableKind::Temperature => "Temperature (K)",
            ObservableKind::Volume => "Box Volume (nm^3)",
            ObservableKind::Density => "Density (g/mL)",
            ObservableKind::Enthalpy => "Enthalpy (kJ/mole)",
        }
    }

    /// Physical unit of the channel values.
    pub fn unit(self) -> &'static str {
        match self {
            ObservableKind::PotentialEnergy
            | ObservableKind::KineticEnergy
            | ObservableKind::TotalEnergy
            | ObservableKind::Enthalpy => "kJ/mol",
            ObservableKind::Temperature => "K",
            ObservableKind::Volume => "nm^3",
            ObservableKind::Density => "g/mL",
        }
    }

    /// Whether imports fail when this column is absent.
    pub fn is_mandatory(self) -> bool {
        self != ObservableKind::Enthalpy
    }

    /// Resolves a tabular column header back to its kind.
    pub fn from_column_header(header: &str) -> Option<Self> {
        let header = header.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.column_header() == header)
    }

    fn name(self) -> &'static str {
        match self {
            ObservableKind::PotentialEnergy => "PotentialEnergy",
            ObservableKind::KineticEnergy => "KineticEnergy",
            ObservableKind::TotalEnergy => "TotalEnergy",
            ObservableKind::Temperature => "Temperature",
            ObservableKind::Volume => "Volume",
            ObservableKind::Density => "Density",
            ObservableKind::Enthalpy => "Enthalpy",
        }
    }
}

impl fmt::Display for ObservableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ObservableKind {
    type Err = PropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| {
                PropError::validation("unknown_observable", "unrecognised observable kind")
                    .with_context("value", s)
            })
    }
}
