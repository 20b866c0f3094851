//! Fisher information along a discrete parameter axis.
//!
//! The addressed labels, in order, are the successive values of a parameter
//! (for example `S_1 .. S_n` sampled at increasing temperature). Each label
//! contributes one marginal; the derivative of the log marginal across the
//! parameter is taken by central differences.

use ndarray::Array2;

use crate::error::{Error, Result};
use crate::numeric::{LogBase, zero_non_finite};
use crate::output::MetricOutput;
use crate::tensor::ProbabilityTensor;

/// Fisher information per parameter value.
///
/// For parameter value `i`:
/// `F_i = dVal · Σ_v m_i(v) · ((log m_{i+1}(v) − log m_{i−1}(v)) / (2·dPar))²`.
///
/// Non-periodic parameters have no neighbour beyond the ends, so the first
/// and last values are dropped and at least three labels are needed.
/// Periodic parameters wrap around and keep every value.
pub fn fisher<S: AsRef<str>>(
    pdf: &ProbabilityTensor,
    variables: &[S],
    d_par: f64,
    d_val: f64,
    base: LogBase,
    periodic: bool,
) -> Result<MetricOutput> {
    if !d_par.is_finite() || d_par == 0.0 {
        return Err(Error::InvalidParameter(format!(
            "parameter increment must be finite and non-zero, got {d_par}"
        )));
    }
    let axes = pdf.resolve(variables)?;
    let needed = if periodic { 2 } else { 3 };
    if axes.len() < needed {
        return Err(Error::NotEnoughLabels {
            what: "fisher information",
            needed,
            got: axes.len(),
        });
    }
    let marginals = stacked_marginals(pdf, &axes)?;
    let n = axes.len();
    log::debug!("fisher information over {n} parameter values (periodic: {periodic})");

    let range = if periodic { 0..n } else { 1..n - 1 };
    let mut entries = Vec::with_capacity(range.len());
    for i in range {
        let next = (i + 1) % n;
        let prev = (i + n - 1) % n;
        let sum: f64 = marginals
            .row(i)
            .iter()
            .zip(marginals.row(next))
            .zip(marginals.row(prev))
            .map(|((&m, &up), &down)| {
                let slope = (base.log(up) - base.log(down)) / (2.0 * d_par);
                zero_non_finite(slope * slope * m)
            })
            .sum();
        entries.push((pdf.labels()[axes[i]].to_string(), sum * d_val));
    }
    Ok(MetricOutput::vector(entries))
}

/// One marginal per row, in addressing order. All must share a bin count.
fn stacked_marginals(pdf: &ProbabilityTensor, axes: &[usize]) -> Result<Array2<f64>> {
    let bins = pdf.shape()[axes[0]];
    let mut stacked = Array2::zeros((axes.len(), bins));
    for (row, &axis) in axes.iter().enumerate() {
        let marginal = pdf.marginal(axis)?;
        if marginal.len() != bins {
            return Err(Error::BinMismatch {
                left: pdf.labels()[axes[0]].to_string(),
                left_bins: bins,
                right: pdf.labels()[axis].to_string(),
                right_bins: marginal.len(),
            });
        }
        stacked.row_mut(row).assign(&marginal);
    }
    Ok(stacked)
}
