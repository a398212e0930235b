use std::collections::BTreeMap;

use propstat_core::errors::{ErrorInfo, PropError};
use propstat_series::{ObservableKind, ObservableSeries};
use serde::{Deserialize, Serialize};

type SeriesMap = BTreeMap<String, Vec<f64>>;

/// Equal-length numeric series addressed by name.
///
/// This is both the input of the estimator and the argument handed to the
/// aggregation function on every trial, with the same names in both places.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "SeriesMap", into = "SeriesMap")]
pub struct NamedSeries {
    series: SeriesMap,
}

impl NamedSeries {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a collection from `(name, values)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> Result<Self, PropError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut named = Self::new();
        for (name, values) in pairs {
            named.insert(name, values)?;
        }
        Ok(named)
    }

    /// Extracts observable channels under caller chosen names.
    pub fn from_observables(
        source: &ObservableSeries,
        picks: &[(&str, ObservableKind)],
    ) -> Result<Self, PropError> {
        let mut named = Self::new();
        for (name, kind) in picks {
            named.insert(*name, source.require(*kind)?.to_vec())?;
        }
        Ok(named)
    }

    /// Adds a series; its length must match the series already present.
    pub fn insert(&mut self, name: impl Into<String>, values: Vec<f64>) -> Result<(), PropError> {
        let name = name.into();
        if self.series.contains_key(&name) {
            return Err(
                PropError::validation("duplicate_series", "series name supplied more than once")
                    .with_context("name", name),
            );
        }
        if let Some((reference, existing)) = self.series.iter().next() {
            if existing.len() != values.len() {
                return Err(PropError::Validation(
                    ErrorInfo::new("length_mismatch", "named series differ in length")
                        .with_context(reference.clone(), existing.len())
                        .with_context(name, values.len()),
                ));
            }
        }
        self.series.insert(name, values);
        Ok(())
    }

    /// Values stored under `name`.
    ///
    /// Asking for a name that was never supplied fails and lists the names
    /// that are available.
    pub fn get(&self, name: &str) -> Result<&[f64], PropError> {
        self.series.get(name).map(Vec::as_slice).ok_or_else(|| {
            PropError::missing_channel("unknown_series", "no series supplied under this name")
                .with_context("name", name)
                .with_context("available", self.names().collect::<Vec<_>>().join(","))
        })
    }

    /// Series names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.series.keys().map(String::as_str)
    }

    /// Number of named series.
    pub fn series_count(&self) -> usize {
        self.series.len()
    }

    /// True when no series has been supplied.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Common length of every series, `None` when the collection is empty.
    pub fn frame_count(&self) -> Option<usize> {
        self.series.values().next().map(Vec::len)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&String, &Vec<f64>)> + '_ {
        self.series.iter()
    }

    pub(crate) fn from_validated(series: SeriesMap) -> Self {
        Self { series }
    }
}

impl TryFrom<SeriesMap> for NamedSeries {
    type Error = PropError;

    fn try_from(series: SeriesMap) -> Result<Self, Self::Error> {
        Self::from_pairs(series)
    }
}

impl From<NamedSeries> for SeriesMap {
    fn from(named: NamedSeries) -> Self {
        named.series
    }
}
