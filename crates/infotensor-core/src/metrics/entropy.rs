//! Shannon, joint and conditional entropy.

use crate::error::Result;
use crate::numeric::{LogBase, shannon_sum, zero_substituted_sum};
use crate::output::MetricOutput;
use crate::tensor::ProbabilityTensor;

/// Shannon entropy of the marginal of every label `variables` addresses.
///
/// With `normalize` each entropy is divided by `log_b(bins)`, mapping it into
/// [0, 1]. A single-bin marginal has entropy 0 either way.
pub fn shannon<S: AsRef<str>>(
    pdf: &ProbabilityTensor,
    variables: &[S],
    base: LogBase,
    normalize: bool,
) -> Result<MetricOutput> {
    let axes = pdf.resolve(variables)?;
    log::debug!("shannon entropy over {} labels ({base})", axes.len());
    let mut entries = Vec::with_capacity(axes.len());
    for axis in axes {
        let h = marginal_entropy(pdf, axis, base, normalize)?;
        entries.push((pdf.labels()[axis].to_string(), h));
    }
    Ok(MetricOutput::vector(entries))
}

/// Entropy of the marginal along `axis`.
pub fn marginal_entropy(
    pdf: &ProbabilityTensor,
    axis: usize,
    base: LogBase,
    normalize: bool,
) -> Result<f64> {
    let marginal = pdf.marginal(axis)?;
    let h = shannon_sum(marginal.iter(), base);
    if !normalize {
        return Ok(h);
    }
    let bins = marginal.len();
    Ok(if bins <= 1 {
        0.0
    } else {
        h / base.log(bins as f64)
    })
}

/// Entropy of the full joint distribution.
pub fn joint_entropy(pdf: &ProbabilityTensor, base: LogBase) -> f64 {
    shannon_sum(pdf.mass().iter(), base)
}

/// Conditional entropy `H(Y | X) = -Σ p(y, x) log p(y | x)` of every label
/// `variables` addresses, given the labels `condition` addresses.
///
/// A target that is itself part of the condition is left out of the
/// condition set for its own term, so `H(Y | Y, X)` is read as `H(Y | X)`.
/// With nothing left to condition on, the plain entropy is reported.
pub fn conditional_entropy<S: AsRef<str>, C: AsRef<str>>(
    pdf: &ProbabilityTensor,
    variables: &[S],
    condition: &[C],
    base: LogBase,
) -> Result<MetricOutput> {
    let targets = pdf.expand(variables)?;
    let given = pdf.expand(condition)?;
    log::debug!(
        "conditional entropy of {} labels given {} ({base})",
        targets.len(),
        given.len()
    );
    let mut entries = Vec::with_capacity(targets.len());
    for target in targets {
        let cond: Vec<String> = given
            .iter()
            .filter(|l| **l != target)
            .map(ToString::to_string)
            .collect();
        let value = if cond.is_empty() {
            let axis = pdf.axis_of(&target.to_string())?;
            marginal_entropy(pdf, axis, base, false)?
        } else {
            let mut kept = vec![target.to_string()];
            kept.extend(cond.iter().cloned());
            let joint = pdf.shrink_to(&kept)?;
            let conditional = joint.condition_on(&cond)?;
            -zero_substituted_sum(
                joint
                    .mass()
                    .iter()
                    .zip(conditional.mass().iter())
                    .map(|(&p, &c)| p * base.log(c)),
            )
        };
        entries.push((target.to_string(), value));
    }
    Ok(MetricOutput::vector(entries))
}
