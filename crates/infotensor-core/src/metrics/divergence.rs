//! Divergences between the marginals of two tensors.
//!
//! Labels are paired positionally: the `i`-th label addressed in `P` is
//! compared with the `i`-th label addressed in `Q`. Paired marginals must
//! have the same number of bins. Keys read `"<p label>||<q label>"`.

use ndarray::Array1;

use crate::error::{Error, Result};
use crate::numeric::{LogBase, zero_non_finite, zero_substituted_sum};
use crate::output::MetricOutput;
use crate::tensor::ProbabilityTensor;

/// Kullback-Leibler divergence `D(P || Q) = Σ p log(p / q)` per label pair.
///
/// Terms with a zero or unbounded ratio contribute 0. Only one-way
/// marginals are compared; to compare a joint of several labels, collapse
/// them first with [`ProbabilityTensor::join_dimensions`] on both tensors.
pub fn kullback_leibler<A: AsRef<str>, B: AsRef<str>>(
    p: &ProbabilityTensor,
    q: &ProbabilityTensor,
    labels_p: &[A],
    labels_q: &[B],
    base: LogBase,
) -> Result<MetricOutput> {
    log::debug!("kullback-leibler divergence ({base})");
    paired_marginals(p, q, labels_p, labels_q, |mp, mq| {
        zero_substituted_sum(
            mp.iter()
                .zip(mq.iter())
                .map(|(&a, &b)| a * zero_non_finite(base.log(a / b))),
        )
    })
}

/// Hellinger distance `(1/√2) · √Σ(√p − √q)²` per label pair.
pub fn hellinger_distance<A: AsRef<str>, B: AsRef<str>>(
    p: &ProbabilityTensor,
    q: &ProbabilityTensor,
    labels_p: &[A],
    labels_q: &[B],
) -> Result<MetricOutput> {
    log::debug!("hellinger distance");
    paired_marginals(p, q, labels_p, labels_q, |mp, mq| {
        let sum: f64 = mp
            .iter()
            .zip(mq.iter())
            .map(|(&a, &b)| (a.sqrt() - b.sqrt()).powi(2))
            .sum();
        sum.sqrt() / std::f64::consts::SQRT_2
    })
}

fn paired_marginals<A, B, F>(
    p: &ProbabilityTensor,
    q: &ProbabilityTensor,
    labels_p: &[A],
    labels_q: &[B],
    measure: F,
) -> Result<MetricOutput>
where
    A: AsRef<str>,
    B: AsRef<str>,
    F: Fn(&Array1<f64>, &Array1<f64>) -> f64,
{
    let axes_p = p.resolve(labels_p)?;
    let axes_q = q.resolve(labels_q)?;
    if axes_p.len() != axes_q.len() {
        return Err(Error::LengthMismatch {
            what: "paired labels of Q",
            expected: axes_p.len(),
            got: axes_q.len(),
        });
    }
    let mut entries = Vec::with_capacity(axes_p.len());
    for (&ap, &aq) in axes_p.iter().zip(&axes_q) {
        let mp = p.marginal(ap)?;
        let mq = q.marginal(aq)?;
        let (left, right) = (p.labels()[ap].to_string(), q.labels()[aq].to_string());
        if mp.len() != mq.len() {
            return Err(Error::BinMismatch {
                left,
                left_bins: mp.len(),
                right,
                right_bins: mq.len(),
            });
        }
        entries.push((format!("{left}||{right}"), measure(&mp, &mq)));
    }
    Ok(MetricOutput::vector(entries))
}
