use infotensor_core::all_metrics;

pub fn run() {
    let metrics = all_metrics();
    println!("{} registered metric(s):\n", metrics.len());
    for info in metrics {
        let arity = if info.min_args == info.max_args {
            format!("{}", info.min_args)
        } else {
            format!("{}-{}", info.min_args, info.max_args)
        };
        println!("  {:<30} [{arity:>3}] {}", info.name, info.description);
        println!("  {:<30}       ({})", "", info.signature);
    }
}
