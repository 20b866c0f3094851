//! # infotensor-core
//!
//! **Information theory on labeled joint-probability tensors.**
//!
//! `infotensor-core` holds a joint distribution over many discrete variables
//! as an N-dimensional [`ProbabilityTensor`] whose axes carry [`Label`]s, and
//! computes information-theoretic measures on it: entropies, mutual
//! information, divergences, Fisher information, surprise, multi-information,
//! information decay times and information integration.
//!
//! ## Quick Start
//!
//! ```
//! use infotensor_core::{LogBase, ProbabilityTensor, metrics::mutual_information};
//! use ndarray::arr2;
//!
//! // Two perfectly correlated fair coins.
//! let pdf = ProbabilityTensor::new(
//!     arr2(&[[0.5, 0.0], [0.0, 0.5]]).into_dyn(),
//!     ["A", "B"],
//!     true,
//! )?;
//!
//! let mi = mutual_information::mutual_information(&pdf, &["A"], &["B"], LogBase::Two)?;
//! assert!((mi.cell("A", "B").unwrap() - 1.0).abs() < 1e-12);
//! # Ok::<(), infotensor_core::Error>(())
//! ```
//!
//! ## Architecture
//!
//! Tensor algebra → Metrics → Registry
//!
//! - [`tensor`]: slicing, marginalization, conditioning, joins, sampling.
//! - [`metrics`]: one module per measure, each returning a [`MetricOutput`].
//! - [`registry`]: name-based dispatch with positional arity checks, used by
//!   the command line front end.
//!
//! Labels follow a group convention: `"X"` addresses every `X_<n>` axis, so
//! one selector can name a whole population of variables.
//!
//! Sampling metrics take an explicit [`rand::Rng`] handle. Seed it (for
//! example with `StdRng::seed_from_u64`) for reproducible results.

pub mod error;
pub mod label;
pub mod metrics;
pub mod numeric;
pub mod output;
pub mod registry;
pub mod tensor;

pub use error::{Error, Result};
pub use label::{Label, expand_base_labels};
pub use metrics::SamplingPlan;
pub use metrics::decay::{crossing_time, idt_individual, idt_system};
pub use metrics::integration::information_integration;
pub use numeric::{LogBase, NORMALIZATION_TOLERANCE, zero_non_finite};
pub use output::MetricOutput;
pub use registry::{MetricArg, MetricInfo, all_metrics, evaluate, find_metric};
pub use tensor::ProbabilityTensor;

/// Library version (from Cargo.toml).
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
