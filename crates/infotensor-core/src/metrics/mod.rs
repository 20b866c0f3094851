//! Information-theoretic metrics over [`ProbabilityTensor`]s.
//!
//! Base metrics (entropy, mutual information, divergences, Fisher
//! information, surprise, multi-information) are computed on marginals of a
//! single tensor. The decay-time and integration metrics treat one axis as
//! time and apply the base metrics slice by slice.
//!
//! [`ProbabilityTensor`]: crate::ProbabilityTensor

pub mod decay;
pub mod divergence;
pub mod entropy;
pub mod fisher;
pub mod integration;
pub mod multi_information;
pub mod mutual_information;
pub mod surprise;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::label::Label;
use crate::numeric::check_fraction;
use crate::tensor::ProbabilityTensor;

/// Sub-sampling fractions for the expensive metrics.
///
/// Each fraction lies in (0, 1]; 1 disables sampling along that dimension.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingPlan {
    /// Fraction of the target variables kept.
    pub variables: f64,
    /// Fraction of the time bins kept (always in ascending order).
    pub time: f64,
    /// Fraction of the value bins kept per variable.
    pub values: f64,
}

impl Default for SamplingPlan {
    fn default() -> Self {
        Self {
            variables: 1.0,
            time: 1.0,
            values: 1.0,
        }
    }
}

impl SamplingPlan {
    /// Reject fractions outside (0, 1].
    pub fn validate(&self) -> Result<()> {
        check_fraction(self.variables)?;
        check_fraction(self.time)?;
        check_fraction(self.values)?;
        Ok(())
    }
}

/// Resolve a time selector to exactly one axis.
pub(crate) fn time_axis(pdf: &ProbabilityTensor, time: &str) -> Result<usize> {
    match pdf.resolve(&[time])?.as_slice() {
        [axis] => Ok(*axis),
        axes => Err(Error::InvalidParameter(format!(
            "time selector '{time}' must address one axis, found {}",
            axes.len()
        ))),
    }
}

/// Axis positions of `labels` in `pdf`, skipping labels it no longer has.
pub(crate) fn surviving_axes(pdf: &ProbabilityTensor, labels: &[Label]) -> Vec<usize> {
    labels
        .iter()
        .filter_map(|l| pdf.labels().iter().position(|own| own == l))
        .collect()
}

/// Single time bin of `pdf`, renormalized. A slice without mass is
/// returned as is (all-zero), so every metric on it evaluates to 0.
pub(crate) fn time_slice(pdf: &ProbabilityTensor, time: usize, bin: usize) -> Result<ProbabilityTensor> {
    let name = pdf.labels()[time].to_string();
    let mut slice = pdf.filter_to(&[name], &[[bin]])?;
    if slice.total_mass() > 0.0 {
        slice.normalize()?;
    }
    Ok(slice)
}
