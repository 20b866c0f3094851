use infotensor_core::{MetricArg, MetricOutput, ProbabilityTensor, evaluate};

use super::{fail, load_tensor, make_rng, parse_arg, render, write_json};

pub struct EvalCommandConfig<'a> {
    pub metric: &'a str,
    pub tensor_paths: &'a [String],
    pub args: &'a [String],
    pub seed: Option<u64>,
    pub output_path: Option<&'a str>,
}

pub fn run(cfg: EvalCommandConfig<'_>) {
    let tensors: Vec<ProbabilityTensor> = cfg
        .tensor_paths
        .iter()
        .map(|path| load_tensor(path).unwrap_or_else(|e| fail(&e)))
        .collect();

    let result = evaluate_metric(cfg.metric, &tensors, cfg.args, cfg.seed)
        .unwrap_or_else(|e| fail(&e));

    println!("{}", cfg.metric);
    print!("{}", render(&result));

    if let Some(path) = cfg.output_path {
        let json = serde_json::json!({
            "metric": cfg.metric,
            "tensors": cfg.tensor_paths,
            "arguments": cfg.args,
            "seed": cfg.seed,
            "result": result,
        });
        match write_json(path, &json) {
            Ok(()) => println!("\nResults written to {path}"),
            Err(e) => eprintln!("\n{e}"),
        }
    }
}

/// Evaluate `metric` with the tensors as leading positional arguments,
/// followed by the parsed `raw_args`.
pub fn evaluate_metric(
    metric: &str,
    tensors: &[ProbabilityTensor],
    raw_args: &[String],
    seed: Option<u64>,
) -> Result<MetricOutput, String> {
    let mut args: Vec<MetricArg<'_>> = tensors.iter().map(MetricArg::Tensor).collect();
    args.extend(raw_args.iter().map(|raw| parse_arg(raw)));
    let mut rng = make_rng(seed);
    evaluate(metric, &args, &mut rng).map_err(|e| e.to_string())
}
