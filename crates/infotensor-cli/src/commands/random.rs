use infotensor_core::ProbabilityTensor;
use ndarray::{ArrayD, IxDyn};

use super::{TensorDocument, fail, make_rng, split_list, write_json};

pub struct RandomCommandConfig<'a> {
    pub labels: &'a str,
    pub shape: &'a str,
    pub seed: Option<u64>,
    pub output_path: &'a str,
}

pub fn run(cfg: RandomCommandConfig<'_>) {
    let pdf = random_tensor(cfg.labels, cfg.shape, cfg.seed).unwrap_or_else(|e| fail(&e));
    match write_json(cfg.output_path, &TensorDocument::from_tensor(&pdf)) {
        Ok(()) => println!(
            "Random tensor {:?} with shape {:?} written to {}",
            pdf.label_names(),
            pdf.shape(),
            cfg.output_path
        ),
        Err(e) => fail(&e),
    }
}

/// A tensor with strictly positive random mass summing to 1.
pub fn random_tensor(
    labels: &str,
    shape: &str,
    seed: Option<u64>,
) -> Result<ProbabilityTensor, String> {
    let labels = split_list(labels);
    let shape = split_list(shape)
        .into_iter()
        .map(|s| {
            s.parse::<usize>()
                .map_err(|e| format!("Invalid axis size {s:?}: {e}"))
        })
        .collect::<Result<Vec<usize>, String>>()?;
    let mut pdf = ProbabilityTensor::new(ArrayD::zeros(IxDyn(&shape)), labels, false)
        .map_err(|e| e.to_string())?;
    pdf.randomize(&mut make_rng(seed));
    Ok(pdf)
}
