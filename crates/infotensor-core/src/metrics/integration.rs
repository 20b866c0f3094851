//! Information integration.
//!
//! For a state variable `i` the integration at a time slice is the
//! information `i` shares with the rest of the state taken as a whole, minus
//! the information it shares with each other variable separately:
//!
//! `Φ_i = I(S_i ; S_rest) − Σ_{j≠i} I(S_i ; S_j)`
//!
//! Positive values mean the rest of the state carries information about
//! `S_i` only jointly; negative values mean the pairwise terms overlap.
//!
//! The joint of the rest of the state stands in for the initial state and
//! is read from the same time slice as `S_i`.

use rand::Rng;
use rand::seq::index;

use crate::error::{Error, Result};
use crate::label::Label;
use crate::metrics::mutual_information::pair_mutual_information;
use crate::metrics::{SamplingPlan, surviving_axes, time_axis, time_slice};
use crate::numeric::LogBase;
use crate::output::MetricOutput;
use crate::tensor::{ProbabilityTensor, sample_size};

/// Name of the composite axis the remaining state is joined into.
const REST_LABEL: &str = "initial_state";

/// Integration of every sampled state variable at every sampled time bin.
///
/// Rows are time bin indices of the input (ascending), columns the sampled
/// state labels. `plan.values` sub-samples the state's value bins once,
/// before the time slices are taken. A state with a single variable has
/// nothing to integrate with and reports 0.
pub fn information_integration<S, R>(
    pdf: &ProbabilityTensor,
    time: &str,
    state: &[S],
    plan: &SamplingPlan,
    base: LogBase,
    rng: &mut R,
) -> Result<MetricOutput>
where
    S: AsRef<str>,
    R: Rng + ?Sized,
{
    plan.validate()?;
    let time_before = time_axis(pdf, time)?;
    let labels: Vec<Label> = pdf
        .expand(state)?
        .into_iter()
        .filter(|l| *l != pdf.labels()[time_before])
        .collect();
    let selectors: Vec<String> = labels.iter().map(ToString::to_string).collect();

    let sampled = pdf.sample_variables(&selectors, plan.variables, rng)?;
    let kept_labels: Vec<Label> = surviving_axes(&sampled, &labels)
        .into_iter()
        .map(|axis| sampled.labels()[axis].clone())
        .collect();
    let kept_names: Vec<String> = kept_labels.iter().map(ToString::to_string).collect();
    let sampled = if plan.values < 1.0 {
        let fractions = vec![plan.values; kept_names.len()];
        sampled.sample_values(&kept_names, &fractions, false, rng)?
    } else {
        sampled.into_owned()
    };

    let time = time_axis(&sampled, time)?;
    let steps = sampled.shape()[time];
    let mut bins = index::sample(rng, steps, sample_size(steps, plan.time)).into_vec();
    bins.sort_unstable();
    log::debug!(
        "information integration of {} variables over {}/{steps} time bins",
        kept_labels.len(),
        bins.len()
    );

    let kept = surviving_axes(&sampled, &kept_labels);
    let rest = rest_label(&sampled);
    let mut values = Vec::with_capacity(bins.len());
    for &bin in &bins {
        let slice = time_slice(&sampled, time, bin)?;
        let mut row = Vec::with_capacity(kept.len());
        for &i in &kept {
            row.push(integration_at(&slice, i, &kept, &rest, base)?);
        }
        values.push(row);
    }
    Ok(MetricOutput::matrix(
        bins.iter().map(ToString::to_string).collect(),
        kept_names,
        values,
    ))
}

fn integration_at(
    slice: &ProbabilityTensor,
    target: usize,
    state: &[usize],
    rest: &Label,
    base: LogBase,
) -> Result<f64> {
    let others: Vec<String> = state
        .iter()
        .filter(|&&j| j != target)
        .map(|&j| slice.labels()[j].to_string())
        .collect();
    if others.is_empty() {
        return Ok(0.0);
    }
    let target_label = &slice.labels()[target];
    let joined = slice.join_dimensions(&others, rest.clone())?;
    let whole = pair_mutual_information(
        &joined,
        axis_of_label(&joined, target_label)?,
        axis_of_label(&joined, rest)?,
        base,
    )?;
    let mut pairwise = 0.0;
    for &j in state.iter().filter(|&&j| j != target) {
        pairwise += pair_mutual_information(slice, target, j, base)?;
    }
    Ok(whole - pairwise)
}

fn axis_of_label(pdf: &ProbabilityTensor, label: &Label) -> Result<usize> {
    pdf.labels()
        .iter()
        .position(|l| l == label)
        .ok_or_else(|| Error::UnknownLabel(label.to_string()))
}

/// A composite label no axis of `pdf` already uses.
fn rest_label(pdf: &ProbabilityTensor) -> Label {
    let mut name = REST_LABEL.to_string();
    while pdf.labels().iter().any(|l| l.to_string() == name) {
        name.push('\'');
    }
    Label::from(name)
}
