//! Surprise (self-information) of individual outcomes.

use crate::error::{Error, Result};
use crate::numeric::{LogBase, zero_non_finite};
use crate::output::MetricOutput;
use crate::tensor::ProbabilityTensor;

/// `log_b(1 / p)` of the requested bins of every addressed marginal.
///
/// One row per label, one column per requested bin index. Impossible
/// outcomes (`p = 0`) report 0. Each bin index may be requested once.
pub fn surprise<S: AsRef<str>>(
    pdf: &ProbabilityTensor,
    variables: &[S],
    values: &[usize],
    base: LogBase,
) -> Result<MetricOutput> {
    if let Some((k, index)) = values
        .iter()
        .enumerate()
        .find(|&(k, v)| values[..k].contains(v))
    {
        return Err(Error::InvalidParameter(format!(
            "bin index {index} requested twice (position {k})"
        )));
    }
    let labels = pdf.expand(variables)?;
    let mut rows = Vec::with_capacity(labels.len());
    let mut matrix = Vec::with_capacity(labels.len());
    for label in labels {
        let name = label.to_string();
        let outcomes = pdf.shrink_values_to(&[&name], &[values])?;
        let line = outcomes
            .mass()
            .iter()
            .map(|&p| zero_non_finite(base.log(1.0 / p)))
            .collect();
        rows.push(name);
        matrix.push(line);
    }
    let columns = values.iter().map(ToString::to_string).collect();
    Ok(MetricOutput::matrix(rows, columns, matrix))
}
