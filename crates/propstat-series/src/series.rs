use std::collections::BTreeMap;

use propstat_core::errors::{ErrorInfo, PropError};
use serde::{Deserialize, Serialize};

use crate::kind::ObservableKind;

type ChannelMap = BTreeMap<ObservableKind, Vec<f64>>;

/// Aligned per-frame observables for a single trajectory (or a stack of them).
///
/// Every present channel has the same number of frames. The invariant is
/// checked when the series is built and whenever a channel is swapped, so
/// accessors never have to re-validate.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "ChannelMap", into = "ChannelMap")]
pub struct ObservableSeries {
    channels: ChannelMap,
}

impl ObservableSeries {
    /// Builds a series from an already keyed channel map.
    pub fn new(channels: BTreeMap<ObservableKind, Vec<f64>>) -> Result<Self, PropError> {
        check_lengths(&channels)?;
        Ok(Self { channels })
    }

    /// Builds a series from `(kind, values)` pairs; a kind may appear only once.
    pub fn from_channels<I>(channels: I) -> Result<Self, PropError>
    where
        I: IntoIterator<Item = (ObservableKind, Vec<f64>)>,
    {
        let mut map = ChannelMap::new();
        for (kind, values) in channels {
            if map.insert(kind, values).is_some() {
                return Err(PropError::validation(
                    "duplicate_channel",
                    "observable supplied more than once",
                )
                .with_context("kind", kind));
            }
        }
        Self::new(map)
    }

    /// Builds the full set of channels in one call; enthalpy is optional.
    #[allow(clippy::too_many_arguments)]
    pub fn from_columns(
        potential_energies: Vec<f64>,
        kinetic_energies: Vec<f64>,
        total_energies: Vec<f64>,
        temperatures: Vec<f64>,
        volumes: Vec<f64>,
        densities: Vec<f64>,
        enthalpies: Option<Vec<f64>>,
    ) -> Result<Self, PropError> {
        let mut channels = vec![
            (ObservableKind::PotentialEnergy, potential_energies),
            (ObservableKind::KineticEnergy, kinetic_energies),
            (ObservableKind::TotalEnergy, total_energies),
            (ObservableKind::Temperature, temperatures),
            (ObservableKind::Volume, volumes),
            (ObservableKind::Density, densities),
        ];
        if let Some(enthalpies) = enthalpies {
            channels.push((ObservableKind::Enthalpy, enthalpies));
        }
        Self::from_channels(channels)
    }

    /// Number of frames.
    ///
    /// Read from the potential energy channel when present, otherwise from
    /// any channel (all lengths agree). Fails when the series holds no
    /// channel at all.
    pub fn len(&self) -> Result<usize, PropError> {
        self.channels
            .get(&ObservableKind::PotentialEnergy)
            .or_else(|| self.channels.values().next())
            .map(Vec::len)
            .ok_or_else(|| {
                PropError::missing_channel(
                    "no_channels",
                    "series length is undefined without any channel",
                )
            })
    }

    /// True when the series holds no frames or no channels.
    pub fn is_empty(&self) -> bool {
        self.len().map_or(true, |len| len == 0)
    }

    /// Values for `kind`, or `None` when the channel was never supplied.
    pub fn get(&self, kind: ObservableKind) -> Option<&[f64]> {
        self.channels.get(&kind).map(Vec::as_slice)
    }

    /// Values for `kind`, failing when the channel is absent.
    pub fn require(&self, kind: ObservableKind) -> Result<&[f64], PropError> {
        self.get(kind).ok_or_else(|| {
            PropError::missing_channel("channel_absent", "observable is not present in the series")
                .with_context("kind", kind)
        })
    }

    /// Whether the channel for `kind` is present.
    pub fn has(&self, kind: ObservableKind) -> bool {
        self.channels.contains_key(&kind)
    }

    /// Present kinds in canonical column order.
    pub fn kinds(&self) -> impl Iterator<Item = ObservableKind> + '_ {
        self.channels.keys().copied()
    }

    /// Number of present channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Replaces (or inserts) a whole channel, keeping the frame count fixed.
    pub fn with_channel(
        mut self,
        kind: ObservableKind,
        values: Vec<f64>,
    ) -> Result<Self, PropError> {
        if let Ok(len) = self.len() {
            if values.len() != len {
                return Err(PropError::Validation(
                    ErrorInfo::new(
                        "channel_length",
                        "replacement channel does not match the series length",
                    )
                    .with_context("kind", kind)
                    .with_context("expected", len)
                    .with_context("actual", values.len()),
                ));
            }
        }
        self.channels.insert(kind, values);
        Ok(self)
    }

    /// Copies the frames at `indices`, in order, into a new series.
    ///
    /// Indices may repeat and need not be sorted. Absent channels stay absent.
    pub fn subset(&self, indices: &[usize]) -> Result<Self, PropError> {
        let len = self.len()?;
        if let Some(position) = indices.iter().position(|&index| index >= len) {
            return Err(PropError::Validation(
                ErrorInfo::new("index_out_of_range", "frame index exceeds series length")
                    .with_context("index", indices[position])
                    .with_context("position", position)
                    .with_context("len", len),
            ));
        }
        let channels = self
            .channels
            .iter()
            .map(|(kind, values)| (*kind, indices.iter().map(|&index| values[index]).collect()))
            .collect();
        Ok(Self { channels })
    }

    /// Stacks sub-runs end to end.
    ///
    /// All parts must carry the same set of channels. Returns the stacked
    /// series together with the frame count of each part, in order, which is
    /// the group partition the bootstrap estimator expects.
    pub fn concatenate(parts: &[ObservableSeries]) -> Result<(Self, Vec<usize>), PropError> {
        let first = parts.first().ok_or_else(|| {
            PropError::validation("concatenate_empty", "no series supplied to concatenate")
        })?;
        let kinds: Vec<_> = first.kinds().collect();
        let mut counts = Vec::with_capacity(parts.len());
        let mut channels: ChannelMap = kinds.iter().map(|kind| (*kind, Vec::new())).collect();

        for (part_index, part) in parts.iter().enumerate() {
            if !part.kinds().eq(kinds.iter().copied()) {
                return Err(PropError::Validation(
                    ErrorInfo::new(
                        "channel_set_mismatch",
                        "concatenated series must carry the same observables",
                    )
                    .with_context("part", part_index)
                    .with_context("expected", format_kinds(kinds.iter().copied()))
                    .with_context("actual", format_kinds(part.kinds())),
                ));
            }
            counts.push(part.len()?);
            for (kind, values) in &part.channels {
                if let Some(target) = channels.get_mut(kind) {
                    target.extend_from_slice(values);
                }
            }
        }

        Ok((Self { channels }, counts))
    }
}

impl TryFrom<ChannelMap> for ObservableSeries {
    type Error = PropError;

    fn try_from(channels: ChannelMap) -> Result<Self, Self::Error> {
        Self::new(channels)
    }
}

impl From<ObservableSeries> for ChannelMap {
    fn from(series: ObservableSeries) -> Self {
        series.channels
    }
}

fn check_lengths(channels: &ChannelMap) -> Result<(), PropError> {
    let mut iter = channels.iter();
    let Some((reference_kind, reference)) = iter.next() else {
        return Ok(());
    };
    for (kind, values) in iter {
        if values.len() != reference.len() {
            return Err(PropError::Validation(
                ErrorInfo::new("channel_length", "observable channels differ in length")
                    .with_context(reference_kind.to_string(), reference.len())
                    .with_context(kind.to_string(), values.len()),
            ));
        }
    }
    Ok(())
}

fn format_kinds(kinds: impl Iterator<Item = ObservableKind>) -> String {
    kinds.map(|kind| kind.to_string()).collect::<Vec<_>>().join(",")
}
