//! Stratified bootstrap over named series.
//!
//! Every trial draws, independently for each group, `floor(count · r)` local
//! indices with replacement and writes the selected frames back into the
//! group's own slots of a full-length buffer. The same draw is applied to
//! every named series so frames stay aligned across series. When a group
//! draws fewer indices than it has slots the drawn frames are repeated
//! cyclically over the span; groups whose draw would be empty are rejected
//! before any trial runs.
//!
//! The cyclic fill weights the `k` drawn frames evenly only when `k` divides
//! the group size. Otherwise the first `count % k` draws occupy one extra slot
//! each: a group of 3 drawing 2 frames `[a, b]` analyses `[a, b, a]`.
//!
//! Trial `t` uses substream `t` of the master seed, so the outcome is the same
//! whether trials run inline or on a thread pool. A failing aggregate aborts
//! the estimate with the error of the lowest-numbered failing trial on both
//! paths.

use std::ops::Range;

use propstat_core::errors::{ErrorInfo, PropError};
use propstat_core::rng::RngHandle;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::named::NamedSeries;
use crate::options::BootstrapOptions;
use crate::partition::GroupPartition;

/// Point estimate and resampling uncertainty.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapResult {
    /// Aggregate evaluated once on the unresampled data.
    pub estimate: f64,
    /// Population standard deviation of the per-trial aggregates.
    pub uncertainty: f64,
    /// Number of trials the uncertainty was computed from.
    pub iterations: usize,
}

impl From<BootstrapResult> for (f64, f64) {
    fn from(result: BootstrapResult) -> Self {
        (result.estimate, result.uncertainty)
    }
}

/// Reusable bootstrap configuration: options plus an optional partition.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimator {
    options: BootstrapOptions,
    partition: Option<GroupPartition>,
}

#[derive(Debug, Clone)]
struct GroupPlan {
    span: Range<usize>,
    draw: usize,
}

impl Estimator {
    /// Creates an estimator after validating `options`.
    pub fn new(options: BootstrapOptions) -> Result<Self, PropError> {
        options.validate()?;
        Ok(Self {
            options,
            partition: None,
        })
    }

    /// Resamples within the groups of `partition` instead of over all frames.
    pub fn with_partition(mut self, partition: GroupPartition) -> Self {
        self.partition = Some(partition);
        self
    }

    /// Options in effect.
    pub fn options(&self) -> &BootstrapOptions {
        &self.options
    }

    /// Partition in effect, if one was supplied.
    pub fn partition(&self) -> Option<&GroupPartition> {
        self.partition.as_ref()
    }

    /// Runs the bootstrap.
    ///
    /// `aggregate` receives the resampled series under the same names as
    /// `data`; its first error aborts the estimate. The estimate itself is
    /// `aggregate(data)` evaluated once after the trials.
    pub fn estimate<F, T>(
        &self,
        data: &NamedSeries,
        aggregate: F,
    ) -> Result<BootstrapResult, PropError>
    where
        F: Fn(&NamedSeries) -> Result<T, PropError> + Sync,
        T: Into<f64>,
    {
        let plan = self.plan(data)?;
        debug!(
            iterations = self.options.iterations,
            groups = plan.len(),
            series = data.series_count(),
            "starting bootstrap"
        );

        let trial = |index: usize| -> Result<f64, PropError> {
            let resampled = resample(data, &plan, self.options.seed, index as u64);
            aggregate(&resampled)
                .map(Into::into)
                .map_err(|err| err.with_context("trial", index))
        };

        let trials: Vec<f64> = if self.options.concurrency > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(self.options.concurrency)
                .build()
                .map_err(|err| {
                    PropError::Config(ErrorInfo::new("thread_pool", err.to_string()))
                })?;
            let outcomes: Vec<Result<f64, PropError>> = pool.install(|| {
                (0..self.options.iterations)
                    .into_par_iter()
                    .map(trial)
                    .collect()
            });
            outcomes.into_iter().collect::<Result<Vec<_>, _>>()?
        } else {
            (0..self.options.iterations)
                .map(trial)
                .collect::<Result<Vec<_>, _>>()?
        };

        let estimate: f64 = aggregate(data)?.into();
        let uncertainty = population_std(&trials);
        debug!(estimate, uncertainty, "bootstrap finished");

        Ok(BootstrapResult {
            estimate,
            uncertainty,
            iterations: trials.len(),
        })
    }

    fn plan(&self, data: &NamedSeries) -> Result<Vec<GroupPlan>, PropError> {
        let frames = data
            .frame_count()
            .ok_or_else(|| PropError::validation("no_data", "there is no data to bootstrap"))?;
        let partition = match &self.partition {
            Some(partition) => partition.clone(),
            None => GroupPartition::single(frames)?,
        };
        partition.check_total(frames)?;

        let fraction = self.options.relative_sample_size;
        partition
            .spans()
            .enumerate()
            .map(|(group, span)| {
                let count = span.len();
                let draw = ((count as f64 * fraction).floor() as usize).min(count);
                if draw == 0 {
                    return Err(PropError::Validation(
                        ErrorInfo::new(
                            "empty_group_draw",
                            "relative sample size leaves a group with nothing to draw",
                        )
                        .with_context("group", group)
                        .with_context("count", count)
                        .with_context("relative_sample_size", fraction)
                        .with_hint("raise the relative sample size or merge small groups"),
                    ));
                }
                Ok(GroupPlan { span, draw })
            })
            .collect()
    }
}

/// Convenience wrapper around [`Estimator`] for one-off estimates.
pub fn bootstrap<F, T>(
    data: &NamedSeries,
    aggregate: F,
    options: &BootstrapOptions,
    partition: Option<&GroupPartition>,
) -> Result<BootstrapResult, PropError>
where
    F: Fn(&NamedSeries) -> Result<T, PropError> + Sync,
    T: Into<f64>,
{
    let mut estimator = Estimator::new(options.clone())?;
    if let Some(partition) = partition {
        estimator = estimator.with_partition(partition.clone());
    }
    estimator.estimate(data, aggregate)
}

fn resample(data: &NamedSeries, plan: &[GroupPlan], seed: u64, trial: u64) -> NamedSeries {
    let mut rng = RngHandle::substream(seed, trial);
    let draws: Vec<Vec<usize>> = plan
        .iter()
        .map(|group| {
            (0..group.draw)
                .map(|_| rng.index_below(group.span.len()))
                .collect()
        })
        .collect();

    let series = data
        .iter()
        .map(|(name, values)| {
            let mut out = vec![0.0; values.len()];
            for (group, draw) in plan.iter().zip(&draws) {
                let local = &values[group.span.clone()];
                for (slot, target) in out[group.span.clone()].iter_mut().enumerate() {
                    *target = local[draw[slot % draw.len()]];
                }
            }
            (name.clone(), out)
        })
        .collect();
    NamedSeries::from_validated(series)
}

fn population_std(values: &[f64]) -> f64 {
    if values.is_empty() {
        return f64::NAN;
    }
    let len = values.len() as f64;
    let mean = values.iter().sum::<f64>() / len;
    let variance = values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / len;
    variance.sqrt()
}
