//! Information decay time of a population that forgets its initial state.
//!
//! Each variable `S_i` copies a shared coin until its own hold time and is
//! frozen at 0 afterwards. The system decay time recovers each hold time;
//! the individual decay time follows the longest-held partner.
//!
//! Run: `cargo run --example decay_series`

use infotensor_core::{LogBase, ProbabilityTensor, idt_individual, idt_system};
use ndarray::{ArrayD, IxDyn};
use rand::SeedableRng;
use rand::rngs::StdRng;

fn main() -> infotensor_core::Result<()> {
    let steps = 10;
    let holds = [2usize, 4, 7];

    let mut shape = vec![steps];
    shape.extend(std::iter::repeat_n(2, holds.len()));
    let mut mass = ArrayD::zeros(IxDyn(&shape));
    for (index, cell) in mass.indexed_iter_mut() {
        let t = index[0];
        let mut p = 0.0;
        for coin in 0..2 {
            let mut q = 0.5;
            for (v, &hold) in holds.iter().enumerate() {
                let expected = if t < hold { coin } else { 0 };
                if index[v + 1] != expected {
                    q = 0.0;
                }
            }
            p += q;
        }
        *cell = p / steps as f64;
    }
    let mut labels = vec!["t".to_string()];
    labels.extend((1..=holds.len()).map(|i| format!("S_{i}")));
    let pdf = ProbabilityTensor::new(mass, labels, true)?;

    let system = idt_system(&pdf, "t", &["S"], 0.1, 1.0, LogBase::Two)?;
    let mut rng = StdRng::seed_from_u64(0);
    let individual = idt_individual(&pdf, "t", &["S"], 1.0, 1.0, 1.0, LogBase::Two, &mut rng)?;

    println!("{:<6} {:>6} {:>10} {:>10}", "label", "hold", "system", "individual");
    for (i, hold) in holds.iter().enumerate() {
        let label = format!("S_{}", i + 1);
        println!(
            "{:<6} {:>6} {:>10.3} {:>10.3}",
            label,
            hold,
            system.get(&label).unwrap_or(f64::NAN),
            individual.get(&label).unwrap_or(f64::NAN),
        );
    }
    Ok(())
}
