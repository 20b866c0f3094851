//! Pairwise mutual information.

use ndarray::Axis;

use crate::error::Result;
use crate::metrics::entropy::{conditional_entropy, marginal_entropy};
use crate::numeric::{LogBase, shannon_sum, zero_substituted_sum};
use crate::output::MetricOutput;
use crate::tensor::ProbabilityTensor;

/// Mutual information for every pair in `a × b`.
///
/// Rows are the labels `a` addresses, columns the labels `b` addresses. A
/// label paired with itself reports its self-information `Σ p log(1/p)`.
pub fn mutual_information<A: AsRef<str>, B: AsRef<str>>(
    pdf: &ProbabilityTensor,
    a: &[A],
    b: &[B],
    base: LogBase,
) -> Result<MetricOutput> {
    let rows = pdf.resolve(a)?;
    let columns = pdf.resolve(b)?;
    log::debug!(
        "mutual information over {}x{} label pairs ({base})",
        rows.len(),
        columns.len()
    );
    let mut values = Vec::with_capacity(rows.len());
    for &row in &rows {
        let mut line = Vec::with_capacity(columns.len());
        for &column in &columns {
            line.push(pair_mutual_information(pdf, row, column, base)?);
        }
        values.push(line);
    }
    Ok(MetricOutput::matrix(
        axis_names(pdf, &rows),
        axis_names(pdf, &columns),
        values,
    ))
}

/// Mutual information between two axes of `pdf`.
///
/// Cells where the joint or the product of marginals vanishes contribute
/// nothing.
pub fn pair_mutual_information(
    pdf: &ProbabilityTensor,
    first: usize,
    second: usize,
    base: LogBase,
) -> Result<f64> {
    if first == second {
        return Ok(shannon_sum(pdf.marginal(first)?.iter(), base));
    }
    let joint = pdf.pair_marginal(first, second)?;
    let p_first = joint.sum_axis(Axis(1));
    let p_second = joint.sum_axis(Axis(0));
    Ok(zero_substituted_sum(joint.indexed_iter().map(|((i, j), &p)| {
        p * base.log(p / (p_first[i] * p_second[j]))
    })))
}

/// Mutual information for every pair in `a × b`, computed as
/// `H(a) - H(a | b)`.
pub fn mutual_information_entropies<A: AsRef<str>, B: AsRef<str>>(
    pdf: &ProbabilityTensor,
    a: &[A],
    b: &[B],
    base: LogBase,
) -> Result<MetricOutput> {
    let rows = pdf.resolve(a)?;
    let columns = pdf.resolve(b)?;
    let mut values = Vec::with_capacity(rows.len());
    for &row in &rows {
        let h = marginal_entropy(pdf, row, base, false)?;
        let name = pdf.labels()[row].to_string();
        let mut line = Vec::with_capacity(columns.len());
        for &column in &columns {
            if column == row {
                line.push(h);
                continue;
            }
            let given = pdf.labels()[column].to_string();
            let conditional = conditional_entropy(pdf, &[&name], &[&given], base)?;
            line.push(h - conditional.get(&name).unwrap_or(0.0));
        }
        values.push(line);
    }
    Ok(MetricOutput::matrix(
        axis_names(pdf, &rows),
        axis_names(pdf, &columns),
        values,
    ))
}

fn axis_names(pdf: &ProbabilityTensor, axes: &[usize]) -> Vec<String> {
    axes.iter().map(|&a| pdf.labels()[a].to_string()).collect()
}
