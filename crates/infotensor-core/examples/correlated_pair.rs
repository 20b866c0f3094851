//! Entropy and mutual information of two noisy copies of a coin.
//!
//! Builds P(A, B) where B copies A with a configurable flip probability and
//! prints the base metrics through the registry.
//!
//! Run: `cargo run --example correlated_pair`

use infotensor_core::{MetricOutput, ProbabilityTensor, all_metrics, evaluate};
use ndarray::arr2;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> infotensor_core::Result<()> {
    let flip = 0.1;
    let pdf = ProbabilityTensor::new(
        arr2(&[
            [0.5 * (1.0 - flip), 0.5 * flip],
            [0.5 * flip, 0.5 * (1.0 - flip)],
        ])
        .into_dyn(),
        ["A", "B"],
        true,
    )?;

    println!("Registered metrics: {}", all_metrics().len());

    let mut rng = StdRng::seed_from_u64(0);
    let calls: [(&str, Vec<infotensor_core::MetricArg<'_>>); 4] = [
        ("shannon", vec![(&pdf).into(), "A".into()]),
        ("joint_entropy", vec![(&pdf).into()]),
        ("conditional_entropy", vec![(&pdf).into(), "A".into(), "B".into()]),
        ("mutual_information", vec![(&pdf).into(), "A".into(), "B".into()]),
    ];
    for (name, args) in &calls {
        match evaluate(name, args, &mut rng)? {
            MetricOutput::Scalar { value } => println!("{name:>22}: {value:.4} bits"),
            MetricOutput::Vector { keys, values } => {
                for (k, v) in keys.iter().zip(&values) {
                    println!("{name:>22}: {k} = {v:.4} bits");
                }
            }
            MetricOutput::Matrix { rows, columns, values } => {
                for (r, line) in rows.iter().zip(&values) {
                    for (c, v) in columns.iter().zip(line) {
                        println!("{name:>22}: ({r}, {c}) = {v:.4} bits");
                    }
                }
            }
        }
    }
    Ok(())
}
