use infotensor_core::LogBase;
use infotensor_core::metrics::entropy::{joint_entropy, marginal_entropy};

use super::{fail, load_tensor};

pub fn run(path: &str) {
    let pdf = load_tensor(path).unwrap_or_else(|e| fail(&e));

    println!("Tensor: {path}");
    println!(
        "  rank {}, {} cells, total mass {:.6}{}",
        pdf.rank(),
        pdf.mass().len(),
        pdf.total_mass(),
        if pdf.is_normalized() { "" } else { " (not normalized)" }
    );
    println!();
    println!("  {:<24} {:>6} {:>12} {:>12}", "Axis", "Bins", "H (bits)", "H / Hmax");
    println!("  {}", "-".repeat(57));
    for (axis, label) in pdf.labels().iter().enumerate() {
        let bins = pdf.shape()[axis];
        match (
            marginal_entropy(&pdf, axis, LogBase::Two, false),
            marginal_entropy(&pdf, axis, LogBase::Two, true),
        ) {
            (Ok(h), Ok(normalized)) => {
                println!("  {:<24} {bins:>6} {h:>12.6} {normalized:>12.6}", label.to_string())
            }
            (Err(e), _) | (_, Err(e)) => fail(&e.to_string()),
        }
    }
    println!();
    println!("  Joint entropy: {:.6} bits", joint_entropy(&pdf, LogBase::Two));
}
