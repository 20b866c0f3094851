//! Multi-information (total correlation) of a set of variables.

use ndarray::Array1;
use rand::Rng;

use crate::error::{Error, Result};
use crate::numeric::{LogBase, zero_substituted_sum};
use crate::tensor::ProbabilityTensor;

/// `Σ J(x) log(J(x) / Π_k m_k(x_k))` of the joint `J` over the addressed
/// variables against the product of its one-way marginals `m_k`.
///
/// A random `sample_variables` fraction of the variables is kept first, then
/// a `sample_values` fraction of each kept variable's bins. Both the joint
/// and the marginals come from the sampled, renormalized tensor. At least
/// two variables must be addressed.
pub fn multi_information<S, R>(
    pdf: &ProbabilityTensor,
    variables: &[S],
    sample_variables: f64,
    sample_values: f64,
    base: LogBase,
    rng: &mut R,
) -> Result<f64>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    let labels = pdf.expand(variables)?;
    if labels.len() < 2 {
        return Err(Error::NotEnoughLabels {
            what: "multi-information",
            needed: 2,
            got: labels.len(),
        });
    }
    let sampled = pdf.sample_variables(variables, sample_variables, rng)?;
    let kept: Vec<String> = labels
        .iter()
        .filter(|l| sampled.labels().contains(*l))
        .map(ToString::to_string)
        .collect();
    log::debug!(
        "multi-information over {}/{} variables ({base})",
        kept.len(),
        labels.len()
    );

    let joint = sampled.shrink_to(&kept)?;
    let joint = if sample_values < 1.0 {
        let fractions = vec![sample_values; kept.len()];
        joint.sample_values(&kept, &fractions, false, rng)?
    } else {
        let mut joint = joint;
        joint.normalize()?;
        joint
    };

    let marginals = (0..joint.rank())
        .map(|axis| joint.marginal(axis))
        .collect::<Result<Vec<Array1<f64>>>>()?;
    Ok(zero_substituted_sum(joint.mass().indexed_iter().map(
        |(index, &p)| {
            let independent: f64 = marginals
                .iter()
                .enumerate()
                .map(|(k, m)| m[index[k]])
                .product();
            p * base.log(p / independent)
        },
    )))
}
