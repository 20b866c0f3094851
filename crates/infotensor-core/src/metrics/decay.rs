//! Information decay time (IDT).
//!
//! One axis of the tensor indexes time. A per-variable signal is computed on
//! every time slice and the decay time is the interpolated moment the signal
//! first drops below a target derived from its initial value. A signal that
//! never drops saturates at `len · dt`.

use std::borrow::Cow;

use rand::Rng;

use crate::error::{Error, Result};
use crate::metrics::entropy::marginal_entropy;
use crate::metrics::mutual_information::pair_mutual_information;
use crate::metrics::{surviving_axes, time_axis, time_slice};
use crate::numeric::{LogBase, check_fraction};
use crate::output::MetricOutput;
use crate::tensor::ProbabilityTensor;

/// First time `signal` falls strictly below `target`, scanning from `start`.
///
/// With the crossing at sample `t`, the bracket is `(t − 1, t)`; a bracket
/// reaching before the start of the signal reads 0 there. Positions are
/// counted from 1, so the crossing between samples 0 and 1 of `[1.0, 0.0]`
/// at target 0.5 lands at 1.5. A flat bracket returns its left end. Without
/// a crossing the result is `signal.len() · dt`.
pub fn crossing_time(signal: &[f64], target: f64, start: usize, dt: f64) -> f64 {
    let Some(t) = (start..signal.len()).find(|&t| signal[t] < target) else {
        return signal.len() as f64 * dt;
    };
    let h1 = if t == 0 { 0.0 } else { signal[t - 1] };
    let h2 = signal[t];
    // Bracket (t - 1, t) shifted to 1-based positions.
    let x1 = t as f64;
    let x2 = x1 + 1.0;
    if h2 == h1 {
        return x1 * dt;
    }
    (x1 + (x2 - x1) * (target - h1) / (h2 - h1)) * dt
}

/// System decay time: the normalized Shannon entropy of each variable per
/// time slice, crossing `max(h0 − epsilon, 0)`.
///
/// Keys are the labels `variables` addresses; the time axis itself is
/// skipped.
pub fn idt_system<S: AsRef<str>>(
    pdf: &ProbabilityTensor,
    time: &str,
    variables: &[S],
    epsilon: f64,
    dt: f64,
    base: LogBase,
) -> Result<MetricOutput> {
    let time = time_axis(pdf, time)?;
    let targets: Vec<usize> = pdf
        .resolve(variables)?
        .into_iter()
        .filter(|&a| a != time)
        .collect();
    let steps = pdf.shape()[time];
    log::debug!(
        "system idt of {} variables over {steps} time bins",
        targets.len()
    );

    let mut signals = vec![Vec::with_capacity(steps); targets.len()];
    for bin in 0..steps {
        let slice = time_slice(pdf, time, bin)?;
        for (signal, &axis) in signals.iter_mut().zip(&targets) {
            signal.push(marginal_entropy(&slice, axis, base, true)?);
        }
    }

    let entries = targets.iter().zip(&signals).map(|(&axis, signal)| {
        let target = (signal[0] - epsilon).max(0.0);
        (
            pdf.labels()[axis].to_string(),
            crossing_time(signal, target, 0, dt),
        )
    });
    Ok(MetricOutput::vector(entries.collect::<Vec<_>>()))
}

/// Individual decay time: how long each variable keeps half of its initial
/// self-information in some other sampled variable.
///
/// A `sample_n` fraction of the variables is kept, the initial value is each
/// kept variable's self-information at time 0, and then a `sample_t`
/// fraction of the time bins is kept in order. At every later sampled time
/// the signal is the largest mutual information between the variable and
/// any other kept variable. Saturation is `sampled bins · dt`, which is also
/// the result for a variable left without partners.
#[allow(clippy::too_many_arguments)]
pub fn idt_individual<S, R>(
    pdf: &ProbabilityTensor,
    time: &str,
    variables: &[S],
    dt: f64,
    sample_n: f64,
    sample_t: f64,
    base: LogBase,
    rng: &mut R,
) -> Result<MetricOutput>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    check_fraction(sample_t)?;
    let time_axis_before = time_axis(pdf, time)?;
    let labels: Vec<_> = pdf
        .expand(variables)?
        .into_iter()
        .filter(|l| *l != pdf.labels()[time_axis_before])
        .collect();
    if labels.is_empty() {
        return Err(Error::NotEnoughLabels {
            what: "individual idt",
            needed: 1,
            got: 0,
        });
    }
    let selectors: Vec<String> = labels.iter().map(ToString::to_string).collect();
    let sampled: Cow<'_, ProbabilityTensor> = pdf.sample_variables(&selectors, sample_n, rng)?;
    let time = time_axis(&sampled, time)?;
    let kept = surviving_axes(&sampled, &labels);

    let origin = time_slice(&sampled, time, 0)?;
    let initial = kept
        .iter()
        .map(|&axis| pair_mutual_information(&origin, axis, axis, base))
        .collect::<Result<Vec<_>>>()?;

    let time_name = sampled.labels()[time].to_string();
    let series = sampled.sample_values(&[&time_name], &[sample_t], true, rng)?;
    let steps = series.shape()[time];
    log::debug!(
        "individual idt of {} variables over {steps} sampled time bins",
        kept.len()
    );

    let mut signals: Vec<Vec<f64>> = initial.iter().map(|&h| vec![h]).collect();
    if kept.len() > 1 {
        for bin in 1..steps {
            let slice = time_slice(&series, time, bin)?;
            for (signal, &i) in signals.iter_mut().zip(&kept) {
                let mut best = f64::NEG_INFINITY;
                for &j in kept.iter().filter(|&&j| j != i) {
                    best = best.max(pair_mutual_information(&slice, i, j, base)?);
                }
                signal.push(best);
            }
        }
    }

    let entries = kept.iter().zip(&signals).map(|(&axis, signal)| {
        let idt = if kept.len() > 1 {
            crossing_time(signal, signal[0] / 2.0, 1, dt)
        } else {
            steps as f64 * dt
        };
        (sampled.labels()[axis].to_string(), idt)
    });
    Ok(MetricOutput::vector(entries.collect::<Vec<_>>()))
}
